// src/config.rs

//! Reporter configuration
//!
//! A small TOML file can override where the external tool and its pkglist
//! live and how strictly output is parsed. Every key is optional; missing
//! keys fall back to the stock Slackware locations.

use crate::error::{Error, Result};
use crate::status::ParseMode;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default location of the system-wide config file
pub const DEFAULT_CONFIG_PATH: &str = "/etc/slackstat.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Path to the external package tool executable
    pub tool_path: PathBuf,

    /// Path to the tool's pkglist file (latest-version lookups)
    pub pkglist_path: PathBuf,

    /// How to treat malformed tool output lines
    pub parse_mode: ParseMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tool_path: PathBuf::from("/usr/sbin/slackpkg"),
            pkglist_path: PathBuf::from("/var/lib/slackpkg/pkglist"),
            parse_mode: ParseMode::Strict,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            Error::Configuration(format!("Invalid config file {}: {}", path.display(), e))
        })?;

        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load from an explicit path, or from the system config if present,
    /// or fall back to defaults.
    ///
    /// An explicit path that cannot be read is an error; a missing system
    /// config is not.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let system = Path::new(DEFAULT_CONFIG_PATH);
                if system.exists() {
                    Self::load(system)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.tool_path, PathBuf::from("/usr/sbin/slackpkg"));
        assert_eq!(config.pkglist_path, PathBuf::from("/var/lib/slackpkg/pkglist"));
        assert_eq!(config.parse_mode, ParseMode::Strict);
    }

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(
            r#"
            tool_path = "/usr/local/sbin/slackpkg"
            pkglist_path = "/tmp/pkglist"
            parse_mode = "lenient"
            "#,
        )
        .unwrap();

        assert_eq!(config.tool_path, PathBuf::from("/usr/local/sbin/slackpkg"));
        assert_eq!(config.pkglist_path, PathBuf::from("/tmp/pkglist"));
        assert_eq!(config.parse_mode, ParseMode::Lenient);
    }

    #[test]
    fn test_missing_keys_fall_back_to_defaults() {
        let config: Config = toml::from_str(r#"parse_mode = "lenient""#).unwrap();

        assert_eq!(config.tool_path, PathBuf::from("/usr/sbin/slackpkg"));
        assert_eq!(config.parse_mode, ParseMode::Lenient);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let result: std::result::Result<Config, _> = toml::from_str(r#"tool = "/bin/true""#);
        assert!(result.is_err());
    }
}
