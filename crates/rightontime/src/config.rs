//! Configuration management for rightontime.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Directory name under the platform config dir.
const APP_DIR_NAME: &str = "rightontime";

/// Prefix for environment overrides.
const ENV_PREFIX: &str = "RIGHTONTIME_";

/// Exact length of an employee id prefix.
pub const ID_PREFIX_LEN: usize = 4;

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `RIGHTONTIME_`, `__` between
///    section and key, e.g. `RIGHTONTIME_IDENTITY__ID_PREFIX`)
/// 2. TOML config file at `~/.config/rightontime/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Identity derivation settings.
    pub identity: IdentityConfig,
    /// Initial record set settings.
    pub records: RecordsConfig,
}

/// Settings for deriving ids and names from credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Four-character prefix of every derived employee id.
    pub id_prefix: String,
    /// Returned when title-casing an empty string.
    pub title_placeholder: String,
    /// Returned when a credential yields no usable name at all.
    pub name_placeholder: String,
}

/// Settings for the records an engine starts with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordsConfig {
    /// Start with the built-in seed record.
    pub seed: bool,
    /// JSON file of additional records to load at startup.
    pub path: Option<PathBuf>,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            id_prefix: "EMP-".to_string(),
            title_placeholder: "Employee".to_string(),
            name_placeholder: "Colleague".to_string(),
        }
    }
}

impl Default for RecordsConfig {
    fn default() -> Self {
        Self {
            seed: true,
            path: None,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// A missing file is not an error; defaults and environment still apply.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(APP_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let prefix_len = self.identity.id_prefix.chars().count();
        if prefix_len != ID_PREFIX_LEN {
            return Err(Error::ConfigValidation {
                message: format!(
                    "id_prefix must be exactly {ID_PREFIX_LEN} characters, got {prefix_len} ({:?})",
                    self.identity.id_prefix
                ),
            });
        }

        if self.identity.title_placeholder.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "title_placeholder must not be empty".to_string(),
            });
        }

        if self.identity.name_placeholder.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "name_placeholder must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.identity.id_prefix, "EMP-");
        assert_eq!(config.identity.title_placeholder, "Employee");
        assert_eq!(config.identity.name_placeholder, "Colleague");
        assert!(config.records.seed);
        assert!(config.records.path.is_none());
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_short_prefix() {
        let mut config = Config::default();
        config.identity.id_prefix = "E-".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("id_prefix"));
    }

    #[test]
    fn test_validate_prefix_counts_chars_not_bytes() {
        let mut config = Config::default();
        config.identity.id_prefix = "ÉMP-".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_blank_placeholders() {
        let mut config = Config::default();
        config.identity.title_placeholder = "  ".to_string();
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("title_placeholder"));

        let mut config = Config::default();
        config.identity.name_placeholder = String::new();
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("name_placeholder"));
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("rightontime"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml"))).unwrap();
        assert_eq!(config.identity, IdentityConfig::default());
        assert_eq!(config.records, RecordsConfig::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = std::env::temp_dir().join(format!("rightontime-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(
            &path,
            "[identity]\nid_prefix = \"STF-\"\n\n[records]\nseed = false\n",
        )
        .unwrap();

        let config = Config::load_from(Some(path)).unwrap();
        assert_eq!(config.identity.id_prefix, "STF-");
        assert_eq!(config.identity.title_placeholder, "Employee");
        assert!(!config.records.seed);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_identity_config_deserialize_partial() {
        let json = r#"{"name_placeholder": "Staff"}"#;
        let identity: IdentityConfig = serde_json::from_str(json).unwrap();
        assert_eq!(identity.name_placeholder, "Staff");
        assert_eq!(identity.id_prefix, "EMP-");
    }

    #[test]
    fn test_config_serialize() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("id_prefix"));
        assert!(json.contains("seed"));
    }
}
