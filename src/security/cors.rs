//! CORS response headers.
//!
//! Runs after the origin gate, so every origin it sees has already been
//! allowed. It answers preflight requests and stamps access-control headers
//! onto relayed responses, overwriting any the upstream sent.

use std::sync::Arc;

use axum::http::Method;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};

use crate::security::origin::OriginPolicy;

pub const ALLOWED_METHODS: [Method; 6] = [
    Method::GET,
    Method::HEAD,
    Method::PUT,
    Method::PATCH,
    Method::POST,
    Method::DELETE,
];

/// Build the CORS layer for an origin policy.
pub fn cors_layer(policy: Arc<OriginPolicy>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |origin, _| {
            policy.decide_header(Some(origin)).is_allowed()
        }))
        .allow_methods(ALLOWED_METHODS)
        .allow_headers(AllowHeaders::mirror_request())
}
