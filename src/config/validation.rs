//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, body limit > 0)
//! - Check that allowlist entries are bare hostnames
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::HeaderName;
use thiserror::Error;
use url::Url;

use crate::config::schema::RelayConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid bind address '{0}'")]
    BindAddress(String),
    #[error("{field} must start with '/', got '{value}'")]
    Path { field: &'static str, value: String },
    #[error("relay.path and status.path are both '{0}'")]
    PathConflict(String),
    #[error("relay.allowed_hosts is empty")]
    EmptyAllowList,
    #[error("allowed host '{0}' must be a bare hostname (no scheme, port, path or wildcard)")]
    AllowedHost(String),
    #[error("allowed origin '{0}' is not an http(s) origin")]
    AllowedOrigin(String),
    #[error("invalid forward header name '{0}'")]
    ForwardHeader(String),
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),
}

/// Validate a deserialized configuration, collecting every problem.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    let relay = &config.relay;
    if !relay.path.starts_with('/') {
        errors.push(ValidationError::Path { field: "relay.path", value: relay.path.clone() });
    }
    if config.status.enabled {
        if !config.status.path.starts_with('/') {
            errors.push(ValidationError::Path {
                field: "status.path",
                value: config.status.path.clone(),
            });
        }
        if config.status.path == relay.path {
            errors.push(ValidationError::PathConflict(relay.path.clone()));
        }
    }

    if relay.allowed_hosts.is_empty() {
        errors.push(ValidationError::EmptyAllowList);
    }
    for host in &relay.allowed_hosts {
        if !is_bare_hostname(host) {
            errors.push(ValidationError::AllowedHost(host.clone()));
        }
    }

    if !is_http_origin(&relay.allowed_origin) {
        errors.push(ValidationError::AllowedOrigin(relay.allowed_origin.clone()));
    }

    for name in &relay.forward_headers {
        if HeaderName::from_bytes(name.as_bytes()).is_err() {
            errors.push(ValidationError::ForwardHeader(name.clone()));
        }
    }

    if relay.max_body_size == 0 {
        errors.push(ValidationError::Zero("relay.max_body_size"));
    }
    if config.upstream.connect_timeout_secs == 0 {
        errors.push(ValidationError::Zero("upstream.connect_timeout_secs"));
    }
    if config.upstream.request_timeout_secs == Some(0) {
        errors.push(ValidationError::Zero("upstream.request_timeout_secs"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// A hostname survives a round trip through URL parsing unchanged.
fn is_bare_hostname(host: &str) -> bool {
    if host.is_empty() || host.contains(['*', '/', ':', '@', '?', '#']) {
        return false;
    }
    Url::parse(&format!("https://{host}/"))
        .ok()
        .and_then(|u| u.host_str().map(|h| h == host))
        .unwrap_or(false)
}

/// `scheme://host[:port]` with nothing after the authority.
fn is_http_origin(origin: &str) -> bool {
    match Url::parse(origin) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https")
                && url.host_str().is_some()
                && url.origin().ascii_serialization() == origin
        }
        Err(_) => false,
    }
}
