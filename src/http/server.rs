//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the relay and status handlers
//! - Wire up middleware (request ID, tracing, panic capture, origin gate, CORS)
//! - Bind server to listener
//! - Hand requests to the relay engine
//! - Observability (metrics, correlation IDs)

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::{Body, Bytes},
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    http::{HeaderMap, Method, Request, StatusCode, Uri},
    middleware,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::admin;
use crate::config::RelayConfig;
use crate::http::middleware::origin_gate;
use crate::http::request::{request_id, InboundRequest, MakeRequestUuidV4, X_REQUEST_ID};
use crate::http::response::panic_response;
use crate::observability::metrics;
use crate::relay::engine::RelayEngine;
use crate::relay::error::RelayError;
use crate::relay::upstream::{ReqwestUpstream, UpstreamClient};
use crate::security::cors::cors_layer;
use crate::security::{AllowList, HeaderPolicy, HeaderPolicyError, OriginPolicy};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: RelayEngine,
    pub max_body_size: usize,
}

/// Failure to assemble the server from a configuration.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid header policy: {0}")]
    HeaderPolicy(#[from] HeaderPolicyError),
    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),
}

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RelayConfig) -> Result<Self, ServerError> {
        let upstream = Arc::new(ReqwestUpstream::from_config(&config.upstream)?);
        Self::with_upstream(config, upstream)
    }

    /// Create a server that dispatches through the given upstream client.
    pub fn with_upstream(
        config: RelayConfig,
        upstream: Arc<dyn UpstreamClient>,
    ) -> Result<Self, ServerError> {
        let allowlist = Arc::new(AllowList::new(config.relay.allowed_hosts.iter().cloned()));
        let headers = Arc::new(HeaderPolicy::from_config(&config.relay)?);
        let origins = Arc::new(OriginPolicy::new(config.relay.allowed_origin.clone()));

        tracing::info!(
            allowed_origin = %origins.local_origin(),
            forward_headers = ?headers.forwardable().iter().map(|h| h.as_str()).collect::<Vec<_>>(),
            allowed_hosts = ?allowlist.hosts().collect::<Vec<_>>(),
            "Relay policy loaded"
        );

        let state = AppState {
            engine: RelayEngine::new(allowlist, headers, upstream, config.relay.merge_extra_query),
            max_body_size: config.relay.max_body_size,
        };

        let router = Self::build_router(&config, state, origins);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &RelayConfig, state: AppState, origins: Arc<OriginPolicy>) -> Router {
        let mut router = Router::new().route(&config.relay.path, any(relay_handler));
        if config.status.enabled {
            router = router.merge(admin::status_router(&config.status.path));
        }

        router
            .with_state(state)
            .layer(cors_layer(origins.clone()))
            .layer(middleware::from_fn_with_state(origins, origin_gate))
            .layer(DefaultBodyLimit::max(config.relay.max_body_size))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(X_REQUEST_ID.clone(), MakeRequestUuidV4))
                    .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                        tracing::info_span!(
                            "request",
                            request_id = %request_id(req.headers()),
                            method = %req.method(),
                            path = %req.uri().path()
                        )
                    }))
                    .layer(PropagateRequestIdLayer::new(X_REQUEST_ID.clone()))
                    .layer(CatchPanicLayer::custom(panic_response)),
            )
    }

    /// Run the server, accepting connections on the given listener until
    /// the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            path = %self.config.relay.path,
            allowed_hosts = self.config.relay.allowed_hosts.len(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// The fully layered router.
    pub fn into_router(self) -> Router {
        self.router
    }
}

/// Relay endpoint handler.
async fn relay_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&headers);
    let method_str = method.to_string();

    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            let err = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                RelayError::PayloadTooLarge { limit: state.max_body_size }
            } else {
                RelayError::Internal(rejection.body_text())
            };
            return reject(err, &request_id, &method_str, start_time);
        }
    };

    let inbound = InboundRequest {
        method,
        uri,
        headers,
        body,
    };

    match state.engine.relay(inbound).await {
        Ok(response) => {
            metrics::record_request(
                &method_str,
                response.status().as_u16(),
                metrics::RELAYED,
                start_time,
            );
            response
        }
        Err(err) => reject(err, &request_id, &method_str, start_time),
    }
}

fn reject(err: RelayError, request_id: &str, method: &str, start_time: Instant) -> Response {
    match &err {
        RelayError::UpstreamUnreachable { .. } | RelayError::Internal(_) => {
            tracing::error!(
                request_id = %request_id,
                stage = %err.stage(),
                code = err.code(),
                error = %err,
                "Relay failed"
            );
        }
        _ => {
            tracing::warn!(
                request_id = %request_id,
                stage = %err.stage(),
                code = err.code(),
                error = %err,
                "Request rejected"
            );
        }
    }
    metrics::record_request(method, err.status().as_u16(), err.code(), start_time);
    err.into_response()
}
