//! Decoder configuration
//!
//! Strict decoding is the default: an unrecognized record type is a hard
//! error. Callers that need forward compatibility with newer producers can
//! opt into lenient mode, where unknown records are skipped and reported in
//! the decode result instead.
//!
//! Settings can be built in code or loaded from TOML.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading a decoder configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// TOML text could not be parsed into a configuration
    #[error("Failed to parse decode config: {0}")]
    Parse(String),
}

/// Decoder settings
///
/// # Example
///
/// ```toml
/// # Skip records with unrecognized type tags instead of failing
/// lenient = false
///
/// # Reject headers declaring a payload larger than this (bytes)
/// # max_payload_size = 67108864
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    /// Tolerate unrecognized type tags by skipping those records
    pub lenient: bool,
    /// Upper bound on the declared payload size, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_payload_size: Option<u64>,
}

impl DecodeConfig {
    /// Strict decoding with no payload limit
    pub fn strict() -> Self {
        Self::default()
    }

    /// Set lenient mode
    pub fn lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }

    /// Set the payload size limit
    pub fn max_payload_size(mut self, limit: u64) -> Self {
        self.max_payload_size = Some(limit);
        self
    }

    /// Parse a configuration from TOML text
    ///
    /// Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize this configuration to TOML
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Commented default configuration
    pub fn default_toml() -> &'static str {
        r#"# HVF decoder configuration
#
# Skip records with unrecognized type tags instead of failing (default: false).
# Skipped records are listed in the decode result.
lenient = false

# Reject headers declaring a payload larger than this many bytes.
# Unset means no limit beyond the length of the input.
# max_payload_size = 67108864
"#
    }
}
