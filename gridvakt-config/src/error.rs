//! Error types for configuration loading and validation

use std::path::PathBuf;
use thiserror::Error;
use validator::ValidationErrors;

/// Unified configuration error type.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File not found error.
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    /// Configuration validation error.
    #[error("Invalid configuration:\n{}", render_validation_errors(.0))]
    Validation(#[source] ValidationErrors),

    /// Figment parsing error.
    #[error("Configuration parsing error: {0}")]
    Parsing(#[from] figment::Error),

    /// I/O error.
    #[error("Configuration I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ValidationErrors> for ConfigError {
    fn from(errors: ValidationErrors) -> Self {
        ConfigError::Validation(errors)
    }
}

fn render_validation_errors(errors: &ValidationErrors) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    for (field, field_errors) in errors.field_errors() {
        let _ = writeln!(out, "Field '{field}':");
        for error in field_errors {
            match &error.message {
                Some(message) => {
                    let _ = writeln!(out, "  - {message}");
                }
                None => {
                    let _ = writeln!(out, "  - {}", error.code);
                }
            }
        }
    }
    out
}
