use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod commands;
mod config;
mod prompt;

/// Emacs package environment manager.
///
/// Reads a manifest (the `Emenv` file), resolves the declared packages and
/// their dependencies against ELPA archives, and keeps a per-directory
/// package tree in `.emenv/` in step with it.
///
/// EXAMPLES:
///     emenv install              Resolve the manifest and apply the changes
///     emenv -y install           Same, without asking for confirmation
///     emenv sync                 Refresh every archive index
///     emenv -c ~/emacs/Emenv install
///
/// ENVIRONMENT VARIABLES:
///     EMENV_MANIFEST             Manifest path (same as --config)
///     EMENV_GLOBAL_CONFIG        Global config file (default ~/.emenv/config.toml)
///     EMENV_STATE_DIR            State directory (default .emenv)
///     EMENV_NO_BUILTIN_SOURCES   Set to '1' to skip the well-known archives
///     EMENV_TIMEOUT              HTTP timeout in seconds
#[derive(Parser)]
#[command(name = "emenv")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to the manifest
    #[arg(
        short = 'c',
        long = "config",
        global = true,
        default_value = "Emenv",
        env = "EMENV_MANIFEST"
    )]
    manifest: PathBuf,

    /// Assume yes at the confirmation prompt
    #[arg(short = 'y', long, global = true)]
    yes: bool,

    /// Print debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the index of every source
    ///
    /// Indices are cached under `.emenv/archives/` and reused by `install`
    /// until the next sync.
    Sync,

    /// Resolve the manifest and bring the package tree in line with it
    ///
    /// Prints the resolved tree and the planned changes, asks for
    /// confirmation, then deletes, upgrades and installs packages and
    /// rewrites `plist.el` and `load.el`.
    ///
    /// EXAMPLES:
    ///     emenv install       Interactive
    ///     emenv -y install    Non-interactive
    Install,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {:#}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
        tracing::debug!("Verbose mode enabled");
    }

    let config = config::RunConfig::load(&cli.manifest)?;

    match cli.command {
        Commands::Sync => commands::sync::run(&config),
        Commands::Install => commands::install::run(
            &config,
            commands::install::InstallArgs {
                assume_yes: cli.yes,
            },
        ),
    }
}
