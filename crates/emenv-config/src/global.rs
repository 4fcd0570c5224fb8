//! Global Configuration (~/.emenv/config.toml)
//!
//! Handles user-level configuration stored in `~/.emenv/config.toml`.

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Global user configuration from ~/.emenv/config.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct GlobalConfig {
    /// Built-in archive registration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<SourcesConfig>,

    /// Package-level defaults
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packages: Option<PackagesConfig>,

    /// HTTP client settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<NetworkConfig>,

    /// Filesystem locations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths: Option<PathsConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SourcesConfig {
    /// Register melpa-stable, melpa, gnu and org before reading the manifest
    #[serde(skip_serializing_if = "Option::is_none")]
    pub builtin: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PackagesConfig {
    /// Names supplied by the editor itself
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provided: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct NetworkConfig {
    /// Request timeout in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct PathsConfig {
    /// Where archives, packages and generated files live
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_dir: Option<PathBuf>,
}

impl GlobalConfig {
    /// Load global configuration from a file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
            file: path.to_path_buf(),
            error: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the global configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(network) = &self.network {
            if network.timeout == Some(0) {
                return Err(ConfigError::InvalidValue {
                    field: "network.timeout".to_string(),
                    reason: "must be at least 1 second".to_string(),
                });
            }
            if let Some(agent) = &network.user_agent {
                if agent.trim().is_empty() {
                    return Err(ConfigError::InvalidValue {
                        field: "network.user-agent".to_string(),
                        reason: "must not be empty".to_string(),
                    });
                }
            }
        }

        if let Some(names) = self.packages.as_ref().and_then(|p| p.provided.as_ref()) {
            if let Some(bad) = names.iter().find(|n| !is_valid_package_name(n)) {
                return Err(ConfigError::InvalidValue {
                    field: "packages.provided".to_string(),
                    reason: format!("'{}' is not a package name", bad),
                });
            }
        }

        Ok(())
    }

    /// Get the global config file path (~/.emenv/config.toml)
    pub fn global_config_path() -> ConfigResult<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
        Ok(home.join(".emenv").join("config.toml"))
    }

    pub fn builtin_sources(&self) -> Option<bool> {
        self.sources.as_ref().and_then(|s| s.builtin)
    }

    pub fn provided(&self) -> Option<&[String]> {
        self.packages
            .as_ref()
            .and_then(|p| p.provided.as_deref())
    }

    pub fn timeout(&self) -> Option<u64> {
        self.network.as_ref().and_then(|n| n.timeout)
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.network.as_ref().and_then(|n| n.user_agent.as_deref())
    }

    pub fn state_dir(&self) -> Option<&Path> {
        self.paths.as_ref().and_then(|p| p.state_dir.as_deref())
    }
}

/// Non-empty and free of characters that end a symbol in a manifest
fn is_valid_package_name(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '(' | ')' | '[' | ']' | '"' | ';'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_global_config() {
        let toml = r#"
[sources]
builtin = false
"#;

        let config: GlobalConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.builtin_sources(), Some(false));
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn test_parse_full_global_config() {
        let toml = r#"
[sources]
builtin = true

[packages]
provided = ["emacs", "cl-lib", "seq"]

[network]
timeout = 30
user-agent = "emenv-test/1.0"

[paths]
state-dir = "/var/cache/emenv"
"#;

        let config: GlobalConfig = toml::from_str(toml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.provided().unwrap().len(), 3);
        assert_eq!(config.timeout(), Some(30));
        assert_eq!(config.user_agent(), Some("emenv-test/1.0"));
        assert_eq!(config.state_dir(), Some(Path::new("/var/cache/emenv")));
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let toml = r#"
[network]
proxy = "http://localhost:3128"
"#;
        assert!(toml::from_str::<GlobalConfig>(toml).is_err());
    }

    #[test]
    fn test_zero_timeout_invalid() {
        let config = GlobalConfig {
            network: Some(NetworkConfig {
                timeout: Some(0),
                user_agent: None,
            }),
            ..Default::default()
        };

        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "network.timeout"
        ));
    }

    #[test]
    fn test_provided_names_validated() {
        let config = GlobalConfig {
            packages: Some(PackagesConfig {
                provided: Some(vec!["emacs".to_string(), "cl lib".to_string()]),
            }),
            ..Default::default()
        };

        assert!(config.validate().is_err());
    }
}
