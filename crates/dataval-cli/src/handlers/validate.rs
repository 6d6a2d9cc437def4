//! Validation command handler

use super::utils::{load_document, load_validator, write_document};
use crate::cli::ValidateArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use tracing::{debug, info, instrument, warn};

/// Handle the validate command
#[instrument(
    skip(config, output),
    fields(input = %args.input.display(), schema = %args.schema.display())
)]
pub fn handle_validate(
    args: ValidateArgs,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    let _timer = Timer::with_details(
        "validate_command",
        &format!("input: {}", args.input.display()),
    );

    let (schema_path, validator) = load_validator(&args.schema, config)?;
    output.info(&format!(
        "Validating {} against {}",
        args.input.display(),
        schema_path.display()
    ))?;

    let document = load_document(&args.input)?;

    let result = {
        let _validation_timer = Timer::new("document_validation");
        validator.validate(&document)
    };

    match result {
        Ok(canonical) => {
            info!("Document is valid");
            match &args.save_to {
                Some(path) => {
                    write_document(path, &canonical)?;
                    debug!(path = %path.display(), "Canonical document written");
                    output.success(&format!("✓ Canonical document saved to {}", path.display()))?;
                }
                None => output.data(&canonical)?,
            }
            Ok(())
        }
        Err(report) => {
            warn!(errors = report.len(), "Document rejected");
            output.error_report(&report)?;
            Err(Error::ValidationFailed {
                count: report.len(),
            })
        }
    }
}
