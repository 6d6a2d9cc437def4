//! Configuration management for the CLI
//!
//! This module handles loading configuration from:
//! - Default values
//! - Configuration files (YAML/JSON/TOML)
//! - Command-line arguments

use crate::cli::OutputFormat;
use crate::error::{Error, Result};
use crate::logging::LogFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Extensions tried when resolving a bare schema name
const SCHEMA_EXTENSIONS: [&str; 4] = ["json", "yaml", "yml", "toml"];

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LogSettings,

    /// Directory searched for schemas given by name
    pub schemas_dir: Option<PathBuf>,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format
    pub format: OutputFormat,

    /// Use colored output by default
    pub color: bool,
}

/// Logging section of the configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Log level used when no `-v` flag is given
    pub level: Option<String>,

    /// Log format (compact, full, json)
    pub format: Option<LogFormat>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Human,
            color: true,
        }
    }
}

/// Supported document encodings, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Yaml,
    Toml,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|s| s.to_str())? {
            "json" => Some(FileFormat::Json),
            "yaml" | "yml" => Some(FileFormat::Yaml),
            "toml" => Some(FileFormat::Toml),
            _ => None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;

        let config = match FileFormat::from_path(path) {
            Some(FileFormat::Yaml) => serde_yaml::from_str(&content)?,
            Some(FileFormat::Toml) => toml::from_str(&content)?,
            Some(FileFormat::Json) | None => serde_json::from_str(&content)?,
        };

        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        eprintln!("Warning: Failed to load config from {}: {}", path.display(), e);
                    }
                }
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        if let Some(path) = file {
            Self::from_file(path)
        } else {
            Self::load()
        }
    }

    /// Get default configuration file paths to check
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".dataval.yaml"),
            PathBuf::from(".dataval.json"),
            PathBuf::from(".dataval.toml"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            let dataval_dir = config_dir.join("dataval");
            paths.push(dataval_dir.join("config.yaml"));
            paths.push(dataval_dir.join("config.json"));
            paths.push(dataval_dir.join("config.toml"));
        }

        paths
    }

    /// Locate a schema given either as a path or as a name inside `schemas_dir`
    pub fn resolve_schema(&self, schema: &Path) -> Result<PathBuf> {
        if schema.is_file() {
            return Ok(schema.to_path_buf());
        }

        if let Some(dir) = &self.schemas_dir {
            let mut candidates = vec![dir.join(schema)];
            candidates.extend(
                SCHEMA_EXTENSIONS
                    .iter()
                    .map(|ext| dir.join(schema).with_extension(ext)),
            );
            if let Some(found) = candidates.into_iter().find(|p| p.is_file()) {
                return Ok(found);
            }
        }

        Err(Error::FileNotFound {
            path: schema.to_path_buf(),
        })
    }
}
