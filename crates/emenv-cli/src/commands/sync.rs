//! Refresh archive indices (emenv sync)

use crate::config::RunConfig;
use anyhow::{Context, Result};

pub fn run(config: &RunConfig) -> Result<()> {
    let store = config.open_store()?;
    let fetcher = config.fetcher()?;

    for source in config.manifest.sources.values() {
        println!("syncing repository {} at {}", source.name, source.url);
        let spinner = super::spinner(format!("Fetching {}...", source.index_url()));
        let result = store
            .sync_source(&fetcher, source)
            .with_context(|| format!("Failed to sync {}", source.name));
        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }
        result?;
    }

    Ok(())
}
