//! Domain error types

use thiserror::Error;

/// Error when parsing a duration string
#[derive(Debug, Clone, Error)]
#[error("Invalid duration format: \"{input}\". Expected format: <number>s, <number>m, or <number>m<number>s (e.g., 5s, 1m, 1m30s)")]
pub struct DurationParseError {
    pub input: String,
}

/// Error when an unknown quality preset is provided
#[derive(Debug, Clone, Error)]
#[error("Invalid quality preset: \"{input}\". Valid presets are: high, low")]
pub struct InvalidPresetError {
    pub input: String,
}

/// Error when a recording location is empty
#[derive(Debug, Clone, Error)]
#[error("Recording location cannot be empty")]
pub struct EmptyLocationError;

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}
