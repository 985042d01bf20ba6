//! Origin gate middleware.
//! Decides whether the caller may use the relay at all.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::observability::metrics;
use crate::relay::error::RelayError;
use crate::security::OriginPolicy;

pub async fn origin_gate(
    State(policy): State<Arc<OriginPolicy>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let header_value = req.headers().get(header::ORIGIN);
    let decision = policy.decide_header(header_value);
    let origin = header_value.map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());

    metrics::record_origin_decision(decision.as_str());

    if decision.is_allowed() {
        tracing::debug!(origin = ?origin, decision = decision.as_str(), "Origin checked");
        return next.run(req).await;
    }

    let origin = origin.unwrap_or_default();
    tracing::warn!(origin = %origin, decision = decision.as_str(), "CORS rejected origin");
    RelayError::OriginRejected { origin }.into_response()
}
