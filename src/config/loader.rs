//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::RedirectConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML or JSON file.
///
/// The format follows the file extension; anything other than `.json`
/// is read as TOML.
pub fn load_config(path: &Path) -> Result<RedirectConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config = parse_config(&content, format_of(path)?)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    tracing::debug!(
        path = %path.display(),
        redirects = config.redirects.len(),
        "Configuration parsed"
    );
    Ok(config)
}

/// Supported on-disk formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

fn format_of(path: &Path) -> Result<ConfigFormat, ConfigError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Ok(ConfigFormat::Json),
        Some("toml") | None => Ok(ConfigFormat::Toml),
        Some(other) => Err(ConfigError::UnsupportedFormat(other.to_string())),
    }
}

/// Parse configuration text without touching the filesystem.
pub fn parse_config(content: &str, format: ConfigFormat) -> Result<RedirectConfig, ConfigError> {
    Ok(match format {
        ConfigFormat::Toml => toml::from_str(content)?,
        ConfigFormat::Json => serde_json::from_str(content)?,
    })
}
