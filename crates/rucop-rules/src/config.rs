//! Cop configuration loaded from YAML
//!
//! The configuration file mirrors the cop names: one section per cop,
//! each with an `Enabled` flag and cop-specific keys. A missing file or
//! section means the built-in defaults.

use serde::Deserialize;
use thiserror::Error;

/// Default expected order for controller actions.
pub const DEFAULT_EXPECTED_ORDER: &[&str] =
    &["index", "show", "new", "edit", "create", "update", "destroy"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Settings for the action-order cop.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActionOrderConfig {
    #[serde(rename = "Enabled", default = "default_true")]
    pub enabled: bool,
    #[serde(rename = "ExpectedOrder", default = "default_expected_order")]
    pub expected_order: Vec<String>,
}

impl Default for ActionOrderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            expected_order: default_expected_order(),
        }
    }
}

/// Settings for the presence-simplification cop.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PresenceConfig {
    #[serde(rename = "Enabled", default = "default_true")]
    pub enabled: bool,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Top-level configuration covering all cops.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(rename = "ActionOrder", default)]
    pub action_order: ActionOrderConfig,
    #[serde(rename = "Presence", default)]
    pub presence: PresenceConfig,
}

impl Config {
    /// Parse configuration from YAML text. Empty input yields the
    /// defaults.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }
}

fn default_true() -> bool {
    true
}

fn default_expected_order() -> Vec<String> {
    DEFAULT_EXPECTED_ORDER.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_defaults() {
        let config = Config::from_yaml("").unwrap();
        assert!(config.action_order.enabled);
        assert!(config.presence.enabled);
        assert_eq!(config.action_order.expected_order, default_expected_order());
    }

    #[test]
    fn test_custom_expected_order() {
        let yaml = r#"
ActionOrder:
  ExpectedOrder:
    - index
    - edit
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert!(config.action_order.enabled);
        assert_eq!(config.action_order.expected_order, vec!["index", "edit"]);
    }

    #[test]
    fn test_disable_cop() {
        let yaml = r#"
Presence:
  Enabled: false
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert!(!config.presence.enabled);
        assert!(config.action_order.enabled);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let yaml = r#"
Bogus:
  Enabled: true
"#;
        assert!(Config::from_yaml(yaml).is_err());
    }
}
