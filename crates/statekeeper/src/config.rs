//! Store configuration
//!
//! The only setting is the diagnostics mode. It is loaded from
//! `.statekeeper.toml` and can be overridden with `STATEKEEPER_ENV`.

use serde::{Deserialize, Serialize};
use std::{env, path::PathBuf};

const CONFIG_FILE: &str = ".statekeeper.toml";
const ENV_VAR: &str = "STATEKEEPER_ENV";

/// Whether diagnostic warnings are emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Development,
    Production,
}

impl Mode {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "production" | "prod" => Some(Mode::Production),
            "development" | "dev" => Some(Mode::Development),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub mode: Mode,
}

impl StoreConfig {
    pub fn production() -> Self {
        Self {
            mode: Mode::Production,
        }
    }

    pub fn development() -> Self {
        Self {
            mode: Mode::Development,
        }
    }

    pub fn diagnostics_enabled(&self) -> bool {
        self.mode == Mode::Development
    }

    /// Load config from CWD first, then home directory, or use defaults.
    /// `STATEKEEPER_ENV` takes precedence over the file.
    pub fn load() -> Self {
        let mut config = match load_config_file() {
            Some(content) => match Self::from_toml_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!("Failed to parse {}: {}", CONFIG_FILE, e);
                    Self::default()
                }
            },
            None => Self::default(),
        };

        if let Ok(value) = env::var(ENV_VAR) {
            match Mode::parse(&value) {
                Some(mode) => config.mode = mode,
                None => log::warn!("Ignoring unknown {} value {:?}", ENV_VAR, value),
            }
        }

        config
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

fn load_config_file() -> Option<String> {
    if let Ok(content) = std::fs::read_to_string(CONFIG_FILE) {
        log::debug!("Loaded config from {}", CONFIG_FILE);
        return Some(content);
    }

    let home_config = env::var_os("HOME").map(|home| PathBuf::from(home).join(CONFIG_FILE))?;
    let content = std::fs::read_to_string(&home_config).ok()?;
    log::debug!("Loaded config from {}", home_config.display());
    Some(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_development() {
        let config = StoreConfig::default();
        assert_eq!(config.mode, Mode::Development);
        assert!(config.diagnostics_enabled());
    }

    #[test]
    fn test_config_deserialize() {
        let config = StoreConfig::from_toml_str(r#"mode = "production""#).unwrap();
        assert_eq!(config, StoreConfig::production());
        assert!(!config.diagnostics_enabled());
    }

    #[test]
    fn test_config_deserialize_empty() {
        let config = StoreConfig::from_toml_str("").unwrap();
        assert_eq!(config.mode, Mode::Development);
    }

    #[test]
    fn test_config_rejects_unknown_mode() {
        assert!(StoreConfig::from_toml_str(r#"mode = "staging""#).is_err());
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!(Mode::parse(" Production "), Some(Mode::Production));
        assert_eq!(Mode::parse("dev"), Some(Mode::Development));
        assert_eq!(Mode::parse("test"), None);
    }
}
