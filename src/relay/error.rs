//! Relay failure taxonomy and its HTTP rendering.

use std::error::Error as StdError;
use std::fmt;

use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Boxed error from the upstream client or a body stream.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Pipeline stage a request had reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayStage {
    Received,
    OriginChecked,
    UrlNormalized,
    AllowlistChecked,
    Dispatched,
}

impl fmt::Display for RelayStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RelayStage::Received => "received",
            RelayStage::OriginChecked => "origin_checked",
            RelayStage::UrlNormalized => "url_normalized",
            RelayStage::AllowlistChecked => "allowlist_checked",
            RelayStage::Dispatched => "dispatched",
        };
        f.write_str(name)
    }
}

/// Everything that can stop a request from being relayed.
///
/// Upstream 4xx/5xx answers are not errors: they are relayed as-is.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("No target URL provided")]
    MissingTarget,

    #[error("Invalid URL format: {url}")]
    InvalidUrl { url: String },

    #[error("Target domain not in allow list: {host}")]
    DomainNotAllowed { host: String },

    #[error("Origin not allowed by CORS policy: {origin}")]
    OriginRejected { origin: String },

    #[error("Request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("Upstream request to {url} failed: {}", error_chain(.source))]
    UpstreamUnreachable {
        url: String,
        method: Method,
        #[source]
        source: BoxError,
    },

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl RelayError {
    /// Stable machine-readable code used in error bodies and metrics.
    pub fn code(&self) -> &'static str {
        match self {
            RelayError::MissingTarget => "missing_target",
            RelayError::InvalidUrl { .. } => "invalid_url",
            RelayError::DomainNotAllowed { .. } => "domain_not_allowed",
            RelayError::OriginRejected { .. } => "origin_rejected",
            RelayError::PayloadTooLarge { .. } => "payload_too_large",
            RelayError::UpstreamUnreachable { .. } => "upstream_unreachable",
            RelayError::Internal(_) => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MissingTarget | RelayError::InvalidUrl { .. } => StatusCode::BAD_REQUEST,
            RelayError::DomainNotAllowed { .. } | RelayError::OriginRejected { .. } => {
                StatusCode::FORBIDDEN
            }
            RelayError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            RelayError::UpstreamUnreachable { .. } | RelayError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// The last stage the request completed before failing.
    pub fn stage(&self) -> RelayStage {
        match self {
            RelayError::OriginRejected { .. } => RelayStage::Received,
            RelayError::MissingTarget
            | RelayError::InvalidUrl { .. }
            | RelayError::PayloadTooLarge { .. } => RelayStage::OriginChecked,
            RelayError::DomainNotAllowed { .. } => RelayStage::UrlNormalized,
            RelayError::UpstreamUnreachable { .. } => RelayStage::Dispatched,
            RelayError::Internal(_) => RelayStage::Dispatched,
        }
    }
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<RequestInfo>,
}

/// The relayed request, echoed back for diagnostics.
#[derive(Debug, Serialize)]
pub struct RequestInfo {
    pub url: String,
    pub method: String,
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let request = match &self {
            RelayError::UpstreamUnreachable { url, method, .. } => Some(RequestInfo {
                url: url.clone(),
                method: method.to_string(),
            }),
            _ => None,
        };
        let body = ErrorBody {
            error: self.code(),
            message: self.to_string(),
            request,
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Render an error and its causes as `outer: inner: root`.
pub fn error_chain(err: &BoxError) -> String {
    let err: &(dyn StdError + 'static) = &**err;
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.ends_with(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
