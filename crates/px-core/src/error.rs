//! Error types for px-core

use thiserror::Error;

/// Core error type for px
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Migration type name does not carry a Propel migration code
    #[error("[E001] Not a Propel migration: '{type_name}' does not match PropelMigration_<digits>")]
    InvalidMigration { type_name: String },

    /// E002: Direction outside {up, down}
    #[error("[E002] Invalid migration direction '{value}': expected 'up' or 'down'")]
    InvalidDirection { value: String },

    /// E003: File system error with path context
    #[error("[E003] File system error at '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// E004: Configuration file not found
    #[error("[E004] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E005: Invalid configuration value
    #[error("[E005] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E006: YAML parse error (config or migration definition)
    #[error("[E006] YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// E007: Malformed migration definition file
    #[error("[E007] Invalid migration definition {path}: {message}")]
    DefinitionInvalid { path: String, message: String },

    /// E008: In-memory file system lock poisoned
    #[error("[E008] File system state poisoned: {0}")]
    StatePoisoned(String),

    /// E009: Schema id unusable as a single directory name
    #[error("[E009] Invalid schema id '{value}': {reason}")]
    InvalidSchema { value: String, reason: &'static str },
}

impl CoreError {
    /// Wrap an `std::io::Error` with the path that produced it.
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        CoreError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
