use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use slotwatch_infrastructure::SlotwatchPaths;

mod commands;

use commands::SearchArgs;

#[derive(Parser)]
#[command(name = "slotwatch")]
#[command(about = "Slotwatch - watch visa appointment availability", long_about = None)]
struct Cli {
    /// Use this directory instead of ~/.config/slotwatch
    #[arg(long, global = true, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search one month once and print the available dates
    Find {
        #[command(flatten)]
        search: SearchArgs,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search once, then keep polling and print every newly found date
    Watch {
        #[command(flatten)]
        search: SearchArgs,
    },
    /// List the known countries, consulates and visa types
    Locations,
    /// Manage configuration files
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a default config.toml and a secret.json template
    Init,
    /// Print the configuration file locations
    Path,
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("slotwatch=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let paths = SlotwatchPaths::new(cli.config_dir.as_deref());

    match cli.command {
        Commands::Find { search, json } => commands::find::run(paths, search, json).await?,
        Commands::Watch { search } => commands::watch::run(paths, search).await?,
        Commands::Locations => commands::locations::run(),
        Commands::Config { action } => match action {
            ConfigAction::Init => commands::config::init(&paths)?,
            ConfigAction::Path => commands::config::path(&paths)?,
        },
    }

    Ok(())
}
