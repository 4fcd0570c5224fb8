//! Install command (emenv install)

use crate::config::RunConfig;
use crate::prompt;
use anyhow::{Context, Result};
use colored::Colorize;

/// Arguments for the install command
#[derive(Debug, Clone, Default)]
pub struct InstallArgs {
    /// Skip the confirmation prompt
    pub assume_yes: bool,
}

/// Run the install command
pub fn run(config: &RunConfig, args: InstallArgs) -> Result<()> {
    let store = config.open_store()?;
    let fetcher = config.fetcher()?;

    let spinner = super::spinner("Loading repositories...");
    let repositories = store.load_repositories(&fetcher, &config.manifest.sources);
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let repositories = repositories.context("Failed to load repositories")?;

    let set = config
        .manifest
        .resolve(&repositories)
        .context("Failed to resolve packages")?;
    print!("{}", set.tree.render());

    let previous = store
        .load_installed()
        .context("Failed to read the install list")?;

    let installed = match previous {
        Some(previous) => {
            let plan = emenv_package::diff(&set, &previous);
            if plan.is_empty() {
                println!("nothing to do, bye.");
                return Ok(());
            }
            print!("{}", plan);
            if !confirmed(&args)? {
                return Ok(());
            }

            let spinner = super::spinner(format!("Applying {} changes...", plan.operation_count()));
            let result = store.apply(&fetcher, &plan);
            if let Some(pb) = spinner {
                pb.finish_and_clear();
            }
            result.context("Failed to apply changes")?;
            plan.upgrade.len() + plan.install.len()
        }
        None => {
            let count = set.fetchable().count();
            println!("{} {} to install", count, plural(count));
            if !confirmed(&args)? {
                return Ok(());
            }

            let spinner = super::spinner(format!("Installing {} {}...", count, plural(count)));
            let result = store.fetch_all(&fetcher, &set);
            if let Some(pb) = spinner {
                pb.finish_and_clear();
            }
            result.context("Failed to install packages")?
        }
    };

    store
        .write_state(&set)
        .context("Failed to write the install list")?;

    println!(
        "{} {} {} installed",
        "✓".green(),
        installed,
        plural(installed)
    );
    Ok(())
}

fn confirmed(args: &InstallArgs) -> Result<bool> {
    if args.assume_yes {
        return Ok(true);
    }
    prompt::confirm_stdin().context("Failed to read confirmation")
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        "package"
    } else {
        "packages"
    }
}
