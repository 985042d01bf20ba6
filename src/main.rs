//! CORS relay gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!     Browser request
//!     ──────────────▶ request id → trace → origin gate → CORS → relay handler
//!                                                                  │
//!                                                                  ▼
//!                                          allowlist ← target normalization
//!                                              │
//!                                              ▼
//!     Browser response                   upstream client (reqwest)
//!     ◀────────────── CORS headers ◀──── streamed body ◀──────── Upstream API
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use cors_relay::config::{load_config, override_bind, RelayConfig};
use cors_relay::lifecycle::startup;
use cors_relay::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "cors-relay")]
#[command(about = "Allowlisted CORS forwarding gateway", long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address
    #[arg(short, long)]
    bind: Option<String>,

    /// Validate the configuration and exit
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path).map_err(|e| format!("failed to load {}: {e}", path.display())),
        None => Ok(RelayConfig::default()),
    };

    let config = config.and_then(|config| match args.bind {
        Some(bind) => override_bind(config, bind).map_err(|e| format!("invalid --bind: {e}")),
        None => Ok(config),
    });

    let config = match config {
        Ok(config) => config,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };

    if args.check {
        println!("configuration ok");
        return ExitCode::SUCCESS;
    }

    init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        path = %config.relay.path,
        allowed_origin = %config.relay.allowed_origin,
        "cors-relay starting"
    );

    match startup::run(config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "cors-relay failed");
            ExitCode::FAILURE
        }
    }
}
