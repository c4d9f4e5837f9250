//! Pathfinder CLI - declarative control of a Pathfinder rover
//!
//! Reads the declared movement plan from a TOML file, keeps the tracked plan
//! in a JSON state file, and drives the provider's lifecycle calls. The read
//! only subcommands run the matching status probe.

mod commands;
mod config;
mod declared;
mod output;
mod state;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pathfinder_core::Diagnostics;
use pathfinder_provider::Provider;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::Config;
use crate::output::{OutputContext, OutputFormat};
use crate::state::StateFile;

#[derive(Parser)]
#[command(name = "pathfinder")]
#[command(author, version, about = "Pathfinder rover control CLI")]
#[command(propagate_version = true)]
struct Cli {
    /// Device base address
    #[arg(short, long, env = "PATHFINDER_ADDRESS")]
    address: Option<String>,

    /// API key sent as a bearer token
    #[arg(long, env = "PATHFINDER_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Configuration file path
    #[arg(short, long, env = "PATHFINDER_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Minimal output (for scripting)
    #[arg(short, long)]
    quiet: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Files used by the movement subcommands
#[derive(Args)]
struct Workspace {
    /// Declared configuration
    #[arg(short, long, default_value = "pathfinder.toml")]
    file: PathBuf,

    /// Tracked state
    #[arg(short, long, default_value = "pathfinder.state.json")]
    state: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Show device identity, versions and features
    Device,

    /// Show the battery charge level
    Battery,

    /// List networks seen by the device
    Wifi,

    /// Check device health
    Health,

    /// Check whether the device is ready
    Ready,

    /// Check whether the device refuses new movement
    Lock,

    /// Show the change `apply` would make
    Plan(Workspace),

    /// Converge the device on the declared movement plan
    Apply(Workspace),

    /// Confirm the tracked movement plan still exists
    Refresh(Workspace),

    /// Remove the tracked movement plan from the device
    Destroy(Workspace),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Load config file
    let config = if let Some(config_path) = &cli.config {
        Config::load_from(config_path)?
    } else {
        Config::load().unwrap_or_default()
    };

    // Merge CLI args with config
    let merged = config.merge_with_args(
        cli.address.as_deref(),
        cli.api_key.as_deref(),
        cli.output,
        cli.no_color,
    );

    let ctx = OutputContext::new(merged.output, merged.no_color, cli.quiet);
    let connect = || {
        Provider::from_config(&merged.provider).context("Failed to configure device connection")
    };

    let diagnostics: Diagnostics = match &cli.command {
        Commands::Device => commands::device(&connect()?, &ctx).await?,
        Commands::Battery => commands::battery(&connect()?, &ctx).await?,
        Commands::Wifi => commands::wifi(&connect()?, &ctx).await?,
        Commands::Health => commands::health(&connect()?, &ctx).await?,
        Commands::Ready => commands::ready(&connect()?, &ctx).await?,
        Commands::Lock => commands::lock(&connect()?, &ctx).await?,

        Commands::Plan(ws) => commands::plan(&ws.file, &StateFile::new(&ws.state), &ctx)?,
        Commands::Apply(ws) => {
            commands::apply(&connect()?, &ws.file, &StateFile::new(&ws.state), &ctx).await?
        }
        Commands::Refresh(ws) => {
            commands::refresh(&connect()?, &StateFile::new(&ws.state), &ctx).await?
        }
        Commands::Destroy(ws) => {
            commands::destroy(&connect()?, &StateFile::new(&ws.state), &ctx).await?
        }
    };

    ctx.diagnostics(&diagnostics);
    if diagnostics.has_error() {
        std::process::exit(1);
    }

    Ok(())
}
