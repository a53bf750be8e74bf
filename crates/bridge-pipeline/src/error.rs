//! Error types for configuration and message decoding.
//!
//! Translation itself never fails; these errors only surface while loading
//! configuration or when a caller asks for strict decoding of host messages.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Bridge error type
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Config file could not be read
    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Config file is not valid TOML for [`crate::TranslatorConfig`]
    #[error("invalid config TOML: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A config value failed validation
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },

    /// Host message is not valid JSON
    #[error("message is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Host message has the wrong shape
    #[error("malformed message: {0}")]
    Message(String),
}

/// Specialized Result type for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;

impl BridgeError {
    /// Create a validation error
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }

    /// Create a message shape error
    pub fn message(msg: impl Into<String>) -> Self {
        Self::Message(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_display() {
        let err = BridgeError::invalid("id_field", "must not be empty");
        assert_eq!(
            err.to_string(),
            "invalid config value for `id_field`: must not be empty"
        );
    }

    #[test]
    fn test_json_error_converts() {
        let err: BridgeError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, BridgeError::Json(_)));
    }
}
