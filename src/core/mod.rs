use std::path::Path;

use thiserror::Error;

/// Errors produced outside of the overlay service itself, mostly while
/// bootstrapping (configuration files, logging setup).
#[derive(Error, Debug)]
pub enum LoopdeckError {
    /// Configuration value was present but unusable.
    #[error("configuration error: {0}")]
    Config(String),

    /// Underlying filesystem operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed as TOML.
    #[error("failed to parse TOML at '{location}': {details}")]
    TomlParseError {
        /// Location of TOML being parsed (file path or "string")
        location: String,
        /// Parse error details
        details: String,
    },
}

/// A specialized `Result` type for Loopdeck operations.
pub type Result<T> = std::result::Result<T, LoopdeckError>;

impl LoopdeckError {
    /// Creates a TOML parsing error with optional file path context.
    pub fn toml_parse(error: impl std::fmt::Display, path: Option<&Path>) -> Self {
        let location = match path {
            Some(p) => {
                let clean_path = p.canonicalize().unwrap_or_else(|_| p.to_path_buf());
                clean_path.to_string_lossy().to_string()
            }
            None => "string".to_string(),
        };

        LoopdeckError::TomlParseError {
            location,
            details: error.to_string(),
        }
    }
}
