//! Schema check command handler

use super::utils::load_validator;
use crate::cli::{CheckArgs, OutputFormat};
use crate::config::Config;
use crate::error::Result;
use crate::output::OutputWriter;
use serde_json::json;
use tracing::instrument;

/// Compile a schema without validating anything against it
#[instrument(skip(config, output), fields(schema = %args.schema.display()))]
pub fn handle_check(args: CheckArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let (path, _validator) = load_validator(&args.schema, config)?;

    if output.format() == OutputFormat::Human {
        output.success(&format!("✓ Schema {} is valid", path.display()))
    } else {
        output.data(&json!({
            "schema": path.display().to_string(),
            "valid": true,
        }))
    }
}
