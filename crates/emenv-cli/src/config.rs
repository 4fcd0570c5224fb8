//! Per-run configuration
//!
//! Combines the effective settings (global config file and `EMENV_*`
//! variables) with the manifest named on the command line.

use anyhow::{Context, Result};
use emenv_config::{ConfigLoader, Settings};
use emenv_package::{FetchOptions, HttpFetcher, Manifest, ManifestDefaults, Store};
use std::env;
use std::path::{Path, PathBuf};

/// Everything a command needs to run
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub settings: Settings,
    pub manifest: Manifest,
    /// Absolute location of `.emenv/` (or its configured replacement)
    pub state_dir: PathBuf,
}

impl RunConfig {
    /// Load settings and the manifest relative to the working directory
    pub fn load(manifest_path: &Path) -> Result<Self> {
        let settings = ConfigLoader::new()
            .load()
            .context("Failed to load configuration")?;
        let cwd = env::current_dir().context("Failed to determine working directory")?;
        Self::from_settings(settings, manifest_path, &cwd)
    }

    pub fn from_settings(settings: Settings, manifest_path: &Path, base: &Path) -> Result<Self> {
        let defaults = manifest_defaults(&settings);
        let manifest = Manifest::from_file(manifest_path, &defaults)
            .with_context(|| format!("Failed to read manifest {}", manifest_path.display()))?;
        let state_dir = settings.state_dir_in(base);

        tracing::debug!(
            "manifest {} declares {} packages, state in {}",
            manifest_path.display(),
            manifest.packages.len(),
            state_dir.display()
        );

        Ok(Self {
            settings,
            manifest,
            state_dir,
        })
    }

    pub fn open_store(&self) -> Result<Store> {
        Store::open(&self.state_dir)
            .with_context(|| format!("Failed to open {}", self.state_dir.display()))
    }

    pub fn fetcher(&self) -> Result<HttpFetcher> {
        let options = FetchOptions {
            timeout: self.settings.timeout,
            user_agent: self.settings.user_agent.clone(),
        };
        HttpFetcher::new(&options).context("Failed to create HTTP client")
    }
}

/// Sources and provided names in effect before the manifest is read
pub fn manifest_defaults(settings: &Settings) -> ManifestDefaults {
    let defaults = if settings.builtin_sources {
        ManifestDefaults::builtin()
    } else {
        ManifestDefaults::empty()
    };
    match &settings.provided {
        Some(provided) => defaults.with_provided(provided.clone()),
        None => defaults,
    }
}
