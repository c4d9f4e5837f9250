//! Pathfinder rover simulator
//!
//! Serves the rover control API from memory for local development.
//!
//! # Usage
//!
//! ```bash
//! ./pathfinder-mock --port 8080
//! ./pathfinder-mock --config config/rover.toml --api-key s3cret
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use pathfinder_mock::{create_router, DeviceState, MockConfig};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "pathfinder-mock")]
#[command(about = "Simulated Pathfinder rover for development and tests")]
struct Args {
    /// Listen port
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Listen address
    #[arg(long, default_value = "127.0.0.1")]
    bind: std::net::IpAddr,

    /// Configuration file path (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Require this bearer key on every request (overrides the config file)
    #[arg(long, env = "PATHFINDER_API_KEY")]
    api_key: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if args.verbose {
            EnvFilter::new("pathfinder_mock=debug,tower_http=debug")
        } else {
            EnvFilter::new("pathfinder_mock=info")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let mut config = match &args.config {
        Some(path) => {
            info!(config = %path.display(), "Loading simulator config");
            MockConfig::load(path).context("Failed to load config")?
        }
        None => MockConfig::default(),
    };
    if args.api_key.is_some() {
        config.api_key = args.api_key.clone();
    }

    info!(
        device = %config.device.name,
        networks = config.wifi.len(),
        auth = config.api_key.is_some(),
        "Starting Pathfinder simulator"
    );

    let app = create_router(DeviceState::new(config));

    let addr = SocketAddr::new(args.bind, args.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    info!("Simulator stopped");
    Ok(())
}
