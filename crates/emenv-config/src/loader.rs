//! Configuration Loader
//!
//! Resolves the effective settings from defaults, the global config file and
//! environment variables.

use crate::global::GlobalConfig;
use crate::{ConfigError, ConfigResult};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming an alternative global config file
pub const GLOBAL_CONFIG_ENV: &str = "EMENV_GLOBAL_CONFIG";

/// Default state directory, relative to the working directory
pub const DEFAULT_STATE_DIR: &str = ".emenv";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration loader
///
/// Precedence, lowest first:
/// 1. Built-in defaults
/// 2. Global config file
/// 3. Environment variables (EMENV_*)
pub struct ConfigLoader {
    /// Explicit global config path; otherwise `EMENV_GLOBAL_CONFIG` or ~/.emenv/config.toml
    global_config_path: Option<PathBuf>,
}

/// Effective settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub state_dir: PathBuf,
    /// Register the well-known archives before reading the manifest
    pub builtin_sources: bool,
    /// Replacement for the built-in provided list
    pub provided: Option<Vec<String>>,
    pub timeout: Duration,
    pub user_agent: String,
    /// Global config file that was read, if any
    pub global_config: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
            builtin_sources: true,
            provided: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: format!("emenv/{}", env!("CARGO_PKG_VERSION")),
            global_config: None,
        }
    }
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            global_config_path: None,
        }
    }

    /// Read the global config from `path` instead of the default location
    pub fn with_global_config(path: impl Into<PathBuf>) -> Self {
        Self {
            global_config_path: Some(path.into()),
        }
    }

    /// Load effective settings
    pub fn load(&self) -> ConfigResult<Settings> {
        let path = self.global_config_path()?;
        let mut settings = Settings::default();

        // Global config is optional - if it doesn't exist, use defaults
        if path.exists() {
            let global = GlobalConfig::load_from_file(&path)?;
            apply_global(&mut settings, &global);
            settings.global_config = Some(path);
        }

        apply_env_overrides(&mut settings)?;
        Ok(settings)
    }

    fn global_config_path(&self) -> ConfigResult<PathBuf> {
        if let Some(path) = &self.global_config_path {
            return Ok(path.clone());
        }
        match env::var_os(GLOBAL_CONFIG_ENV) {
            Some(path) if !path.is_empty() => Ok(PathBuf::from(path)),
            _ => GlobalConfig::global_config_path(),
        }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_global(settings: &mut Settings, global: &GlobalConfig) {
    if let Some(builtin) = global.builtin_sources() {
        settings.builtin_sources = builtin;
    }
    if let Some(provided) = global.provided() {
        settings.provided = Some(provided.to_vec());
    }
    if let Some(timeout) = global.timeout() {
        settings.timeout = Duration::from_secs(timeout);
    }
    if let Some(agent) = global.user_agent() {
        settings.user_agent = agent.to_string();
    }
    if let Some(dir) = global.state_dir() {
        settings.state_dir = dir.to_path_buf();
    }
}

/// Environment variables follow the pattern EMENV_<KEY>
fn apply_env_overrides(settings: &mut Settings) -> ConfigResult<()> {
    if let Some(dir) = env::var_os("EMENV_STATE_DIR").filter(|d| !d.is_empty()) {
        settings.state_dir = PathBuf::from(dir);
    }

    if let Ok(value) = env::var("EMENV_NO_BUILTIN_SOURCES") {
        if is_truthy(&value) {
            settings.builtin_sources = false;
        }
    }

    if let Ok(value) = env::var("EMENV_TIMEOUT") {
        let secs = value
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|s| *s > 0)
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "EMENV_TIMEOUT".to_string(),
                reason: format!("expected a positive number of seconds, got '{}'", value),
            })?;
        settings.timeout = Duration::from_secs(secs);
    }

    Ok(())
}

fn is_truthy(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes")
}

impl Settings {
    /// State directory resolved against `base` when relative
    pub fn state_dir_in(&self, base: &Path) -> PathBuf {
        if self.state_dir.is_absolute() {
            self.state_dir.clone()
        } else {
            base.join(&self.state_dir)
        }
    }
}
