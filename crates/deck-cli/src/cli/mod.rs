//! CLI entry and dispatch.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use deck_core::cluster::ImportKind;
use deck_core::config;

use crate::logging;

mod commands;

#[derive(Parser)]
#[command(name = "deck")]
#[command(version)]
#[command(about = "Terminal launcher for Minecraft clusters")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Inspect clusters
    Clusters {
        #[command(subcommand)]
        command: ClusterCommands,
    },
    /// Look at other launchers' instances
    Import {
        #[command(subcommand)]
        command: ImportCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

#[derive(clap::Subcommand)]
enum ClusterCommands {
    /// Lists clusters
    List,
}

#[derive(clap::Subcommand)]
enum ImportCommands {
    /// Lists importable instances of a launcher
    Scan {
        /// Launcher: prism, multimc, curseforge, modrinth or atlauncher
        #[arg(value_name = "LAUNCHER", value_parser = parse_import_kind)]
        kind: ImportKind,

        /// Launcher data directory (default: config override or usual location)
        #[arg(long, value_name = "DIR")]
        path: Option<PathBuf>,
    },
}

fn parse_import_kind(raw: &str) -> Result<ImportKind, String> {
    raw.parse()
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let Some(command) = cli.command else {
        // default to the launcher UI
        let config = load_config()?;
        let _guard = logging::init_file(&config.log_level)?;
        return commands::launcher::run(&config);
    };

    match command {
        // Works even when config.toml does not parse.
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        },
        Commands::Clusters { command } => {
            let config = load_config()?;
            logging::init_stderr(&config.log_level);
            match command {
                ClusterCommands::List => commands::clusters::list(&config).await,
            }
        }
        Commands::Import { command } => {
            let config = load_config()?;
            logging::init_stderr(&config.log_level);
            match command {
                ImportCommands::Scan { kind, path } => {
                    commands::import::scan(&config, kind, path).await
                }
            }
        }
    }
}

fn load_config() -> Result<config::Config> {
    config::Config::load().context("load config")
}
