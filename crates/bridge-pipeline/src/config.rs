//! Translator configuration
//!
//! Loaded from TOML. Every key is optional; missing keys take the defaults
//! below.
//!
//! ```toml
//! id_field = "id"
//! version_field = "_version_"
//! default_field = "*"
//! default_facet_limit = 100
//! response_content_type = "application/json; charset=utf-8"
//! ```

use crate::error::{BridgeError, BridgeResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Settings shared by every translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    /// Identifier field, never wrapped into an array
    pub id_field: String,
    /// Per-document version attribute added to legacy documents
    pub version_field: String,
    /// Field for fieldless query leaves when the request has no `df`
    pub default_field: String,
    /// `facet.limit` when the request does not set one
    pub default_facet_limit: u32,
    /// Content type written onto translated responses
    pub response_content_type: String,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            id_field: "id".to_string(),
            version_field: "_version_".to_string(),
            default_field: bridge_query::ALL_FIELDS.to_string(),
            default_facet_limit: 100,
            response_content_type: "application/json; charset=utf-8".to_string(),
        }
    }
}

impl TranslatorConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(input: &str) -> BridgeResult<Self> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> BridgeResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| BridgeError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&raw)?;
        debug!(path = %path.display(), "loaded translator config");
        Ok(config)
    }

    pub fn validate(&self) -> BridgeResult<()> {
        if self.id_field.trim().is_empty() {
            return Err(BridgeError::invalid("id_field", "must not be empty"));
        }
        if self.default_field.trim().is_empty() {
            return Err(BridgeError::invalid("default_field", "must not be empty"));
        }
        if self.default_facet_limit == 0 {
            return Err(BridgeError::invalid(
                "default_facet_limit",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}
