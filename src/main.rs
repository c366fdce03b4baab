//! api-guard: a standalone guarded echo server.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client ──▶ listener ──▶ TraceLayer ──▶ guard middleware ──▶ downstream
//!                                            │      │
//!                                            │      └─ sliding window store
//!                                            │           ▲
//!                                            │           └─ sweeper task
//!                                            └─ audit sink (console, file)
//!                                                 ▲
//!                                                 └─ log retention task
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use api_guard::config::{load_config, ServerConfig};
use api_guard::http::{echo_router, HttpServer};
use api_guard::lifecycle::shutdown_signal;
use api_guard::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "api-guard")]
#[command(about = "Request gatekeeping in front of an HTTP handler", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability.log_level);
    tracing::info!("api-guard v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config, echo_router())?;
    server.run(listener, shutdown_signal()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
