//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize subsystems from a validated configuration
//! - Start background tasks (metrics exporter, signal watcher)
//! - Bind the listener and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when ready)

use std::net::SocketAddr;

use metrics_exporter_prometheus::BuildError;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::RelayConfig;
use crate::http::server::ServerError;
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::metrics;

/// Fatal startup or serving failure.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Server(#[from] ServerError),
    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),
    #[error("failed to install metrics exporter: {0}")]
    Metrics(#[from] BuildError),
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Start the relay and serve until a stop signal arrives.
pub async fn run(config: RelayConfig) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        let address = &config.observability.metrics_address;
        let addr = address
            .parse::<SocketAddr>()
            .map_err(|_| StartupError::MetricsAddress(address.clone()))?;
        metrics::init_metrics(addr)?;
    }

    let server = HttpServer::new(config)?;

    let address = server.config().listener.bind_address.clone();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_watcher(shutdown);

    server.run(listener, server_shutdown).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bad_metrics_address_aborts_startup() {
        let mut config = RelayConfig::default();
        config.listener.bind_address = "127.0.0.1:0".to_string();
        config.observability.metrics_enabled = true;
        config.observability.metrics_address = "not-an-address".to_string();

        match run(config).await {
            Err(StartupError::MetricsAddress(address)) => assert_eq!(address, "not-an-address"),
            other => panic!("expected metrics address error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn second_metrics_recorder_is_an_error() {
        let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let _ = metrics::init_metrics(addr);
        assert!(metrics::init_metrics(addr).is_err());
    }
}
