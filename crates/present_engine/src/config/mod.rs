//! Configuration parsing
//!
//! Settings come from compiled-in defaults. Callers that hold settings as
//! TOML or RON text can parse them through [`Config`]; nothing here touches
//! the filesystem.

pub use serde::{Deserialize, Serialize};

/// Settings that can be parsed from TOML or RON text
///
/// Missing fields fall back to `Default` when the implementor opts into
/// `#[serde(default)]`.
pub trait Config: for<'de> Deserialize<'de> + Default {
    /// Parse from TOML text
    fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(format!("TOML: {e}")))
    }

    /// Parse from RON text
    fn from_ron_str(contents: &str) -> Result<Self, ConfigError> {
        ron::from_str(contents).map_err(|e| ConfigError::Parse(format!("RON: {e}")))
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// Text could not be parsed into settings
    #[error("Parse error: {0}")]
    Parse(String),

    /// Values parsed but are not usable
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
