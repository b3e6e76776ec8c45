/// Structured error types for catalogctl-core.
///
/// Uses `thiserror` so library consumers can match on variants.
/// The binary crate (catalogctl-cli) wraps these in `anyhow` with context.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for catalogctl-core operations
#[derive(Error, Debug)]
pub enum CatalogError {
    /// I/O operation failed
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// JSON parsing or serialization failed
    #[error("JSON error at {context}: {source}")]
    Json {
        context: String,
        source: serde_json::Error,
    },

    /// TOML config could not be parsed
    #[error("Invalid config file {path:?}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Value is not one of the allowed variants of an enumeration
    #[error("Invalid {kind} '{value}' (expected one of: {expected})")]
    InvalidVariant {
        kind: &'static str,
        value: String,
        expected: &'static str,
    },

    /// Required field missing or empty
    #[error("Missing required field '{field}' in {context}")]
    MissingField { field: String, context: String },

    /// Filter field name is not a plain identifier path
    #[error("Invalid filter field '{field}'")]
    InvalidFilterField { field: String },

    /// Configuration error
    #[error("Configuration error: {reason}")]
    Config { reason: String },
}

/// Result type alias for catalogctl-core operations
pub type Result<T> = std::result::Result<T, CatalogError>;

impl CatalogError {
    /// Create a JSON error with context
    pub fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            context: context.into(),
            source,
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>, context: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
            context: context.into(),
        }
    }

    /// Create a configuration error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CatalogError::missing_field("id", "component entry");
        assert_eq!(
            err.to_string(),
            "Missing required field 'id' in component entry"
        );

        let err = CatalogError::InvalidVariant {
            kind: "category",
            value: "widget".into(),
            expected: "input, display",
        };
        assert!(err.to_string().contains("'widget'"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
        let err: CatalogError = io_err.into();
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}
