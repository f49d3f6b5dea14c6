mod commands;
mod render;
mod source;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use blop_core::config::DEFAULT_CONFIG_PATH;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "blop")]
#[command(about = "Build the protest event listing, pages and calendar files from the submissions sheet")]
struct Cli {
    /// Log debug output from the build
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the site manifest, feed and calendar files
    Build {
        /// Config file to read
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,

        /// Read events from a local CSV export instead of the sheet URL
        #[arg(long)]
        csv_file: Option<PathBuf>,
    },
    /// Only generate calendar files
    Calendars {
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,

        #[arg(long)]
        csv_file: Option<PathBuf>,
    },
    /// Write a default config file
    Init {
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Build { config, csv_file } => {
            commands::build::run(&config, csv_file.as_deref()).await
        }
        Commands::Calendars { config, csv_file } => {
            commands::calendars::run(&config, csv_file.as_deref()).await
        }
        Commands::Init { config } => commands::init::run(&config),
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "blop=debug,blop_core=debug"
    } else {
        "blop=info,blop_core=info"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(fmt::layer().with_target(false))
        .init();
}
