//! Shared utilities for command handlers

use crate::config::{Config, FileFormat};
use crate::error::{Error, Result};
use dataval_core::Validator;
use serde_json::Value;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Path argument meaning "read standard input"
const STDIN: &str = "-";

/// Read a JSON, YAML or TOML document into a JSON value
pub fn load_document(path: &Path) -> Result<Value> {
    if path == Path::new(STDIN) {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content)?;
        debug!(bytes = content.len(), "Read document from stdin");
        return parse_untyped(&content);
    }

    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path)?;
    debug!(path = %path.display(), bytes = content.len(), "Read document");
    parse_document(path, &content)
}

/// Parse `content` with the encoding named by the extension of `path`
pub fn parse_document(path: &Path, content: &str) -> Result<Value> {
    let invalid = |expected: &str| Error::InvalidFormat {
        path: path.to_path_buf(),
        expected: expected.to_string(),
    };

    match FileFormat::from_path(path) {
        Some(FileFormat::Json) => serde_json::from_str(content).map_err(|_| invalid("JSON")),
        Some(FileFormat::Yaml) => serde_yaml::from_str(content).map_err(|_| invalid("YAML")),
        Some(FileFormat::Toml) => toml::from_str(content).map_err(|_| invalid("TOML")),
        None => Err(invalid("JSON, YAML or TOML")),
    }
}

/// Stdin has no extension: JSON first, YAML as its superset otherwise
fn parse_untyped(content: &str) -> Result<Value> {
    match serde_json::from_str(content) {
        Ok(value) => Ok(value),
        Err(_) => Ok(serde_yaml::from_str(content)?),
    }
}

/// Write a document, encoded by the extension of `path` (JSON by default)
pub fn write_document(path: &Path, value: &Value) -> Result<()> {
    let content = match FileFormat::from_path(path) {
        Some(FileFormat::Yaml) => serde_yaml::to_string(value)?,
        Some(FileFormat::Toml) => toml::to_string_pretty(value)
            .map_err(|e| Error::other(format!("Cannot encode {} as TOML: {}", path.display(), e)))?,
        Some(FileFormat::Json) | None => serde_json::to_string_pretty(value)? + "\n",
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

/// Resolve, read and compile a schema
pub fn load_validator(schema: &Path, config: &Config) -> Result<(PathBuf, Validator)> {
    let path = config.resolve_schema(schema)?;
    let document = load_document(&path)?;

    let validator = Validator::compile(&document).map_err(|report| Error::InvalidSchema {
        path: path.clone(),
        report,
    })?;
    debug!(schema = %path.display(), "Schema compiled");

    Ok((path, validator))
}
