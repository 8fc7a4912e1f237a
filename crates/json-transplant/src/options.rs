//! Converter configuration.

use serde::{Deserialize, Serialize};

use crate::comparer::ComparerKind;
use crate::error::TransplantError;

/// Options for building a [`TransplantConverter`](crate::TransplantConverter).
///
/// Every key is optional; missing keys take their default.
///
/// ```toml
/// comparer = "Ordinal"
/// cache_descriptors = false
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransplantOptions {
    /// How field and property names are matched. Case-insensitive by default.
    pub comparer: ComparerKind,
    /// Keep resolved descriptors per type for the converter's lifetime.
    pub cache_descriptors: bool,
}

impl Default for TransplantOptions {
    fn default() -> Self {
        Self {
            comparer: ComparerKind::OrdinalIgnoreCase,
            cache_descriptors: true,
        }
    }
}

impl TransplantOptions {
    pub fn from_json_str(text: &str) -> Result<Self, TransplantError> {
        serde_json::from_str(text).map_err(|e| TransplantError::InvalidOptions {
            format: "JSON",
            message: e.to_string(),
        })
    }

    pub fn from_toml_str(text: &str) -> Result<Self, TransplantError> {
        toml::from_str(text).map_err(|e| TransplantError::InvalidOptions {
            format: "TOML",
            message: e.to_string(),
        })
    }

    pub fn with_comparer(mut self, comparer: ComparerKind) -> Self {
        self.comparer = comparer;
        self
    }

    pub fn with_cache(mut self, cache_descriptors: bool) -> Self {
        self.cache_descriptors = cache_descriptors;
        self
    }
}
