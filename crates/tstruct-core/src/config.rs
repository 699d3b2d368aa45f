//! # Struct Configuration
//!
//! Per-type settings. Configuration is plain data so embedding applications
//! can load it alongside their own settings:
//!
//! ```json
//! { "input_mode": "strict" }
//! ```

use serde::{Deserialize, Serialize};

/// How a struct type treats the top level of its input mapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// Keys outside the schema are dropped silently.
    #[default]
    Permissive,
    /// Keys outside the schema reject the whole input.
    Strict,
}

/// Settings applied to a struct type at definition time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructConfig {
    pub input_mode: InputMode,
}

impl StructConfig {
    /// Configuration for a type that rejects unexpected keys.
    pub fn strict() -> Self {
        Self {
            input_mode: InputMode::Strict,
        }
    }

    /// Parse configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_permissive() {
        assert_eq!(StructConfig::default().input_mode, InputMode::Permissive);
    }

    #[test]
    fn test_parse_strict() {
        let config = StructConfig::from_json(r#"{"input_mode": "strict"}"#).unwrap();
        assert_eq!(config, StructConfig::strict());
    }

    #[test]
    fn test_parse_empty_object() {
        let config = StructConfig::from_json("{}").unwrap();
        assert_eq!(config, StructConfig::default());
    }

    #[test]
    fn test_reject_unknown_mode() {
        assert!(StructConfig::from_json(r#"{"input_mode": "lenient"}"#).is_err());
    }
}
