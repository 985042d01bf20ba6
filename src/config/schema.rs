//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Relay endpoint policy: allowlists, header policy, body limits.
    pub relay: RelayPolicyConfig,

    /// Upstream client settings.
    pub upstream: UpstreamConfig,

    /// Status endpoint settings.
    pub status: StatusConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// How the outbound `User-Agent` header is chosen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UserAgentPolicy {
    /// Forward the caller's `User-Agent`, falling back to the default identifier.
    #[default]
    Passthrough,
    /// Always send this value.
    Fixed(String),
}

/// Policy of the relay endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RelayPolicyConfig {
    /// Path the relay endpoint is mounted on.
    pub path: String,

    /// Upstream hostnames the relay may reach (exact match).
    pub allowed_hosts: Vec<String>,

    /// The one non-null origin allowed to call the relay.
    pub allowed_origin: String,

    /// Inbound headers copied to the upstream request when present.
    pub forward_headers: Vec<String>,

    /// Append query parameters other than `url` to the target URL.
    pub merge_extra_query: bool,

    /// Send `Accept: application/json` when the caller sent no `Accept`.
    pub default_accept: bool,

    /// Outbound `User-Agent` policy.
    pub user_agent: UserAgentPolicy,

    /// Maximum inbound body size in bytes.
    pub max_body_size: usize,
}

impl Default for RelayPolicyConfig {
    fn default() -> Self {
        Self {
            path: "/proxy".to_string(),
            allowed_hosts: [
                "api.shodan.io",
                "ipinfo.io",
                "safebrowsing.googleapis.com",
                "dns.google.com",
                "api.hudsonrock.com",
                "cavalier.hudsonrock.com",
                "internetdb.shodan.io",
                "api.greynoise.io",
                "urlscan.io",
                "proxy",
                "api.securitytrails.com",
                "urlhaus-api.abuse.ch",
            ]
            .iter()
            .map(|h| h.to_string())
            .collect(),
            allowed_origin: "http://localhost:3000".to_string(),
            forward_headers: vec!["api-key".into(), "key".into(), "apikey".into()],
            merge_extra_query: true,
            default_accept: true,
            user_agent: UserAgentPolicy::Passthrough,
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Upstream client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Skip TLS certificate validation for upstream calls.
    ///
    /// Some allowlisted hosts serve non-standard certificate chains; turning
    /// this off tightens the trust model at the cost of failing on those hosts.
    pub danger_accept_invalid_certs: bool,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Whole-exchange timeout in seconds, including the streamed body.
    pub request_timeout_secs: Option<u64>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            danger_accept_invalid_certs: true,
            connect_timeout_secs: 10,
            request_timeout_secs: None,
        }
    }
}

/// Status endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StatusConfig {
    /// Expose the status endpoint.
    pub enabled: bool,

    /// Path of the status endpoint.
    pub path: String,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/status".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
