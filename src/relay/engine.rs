//! Relay engine.
//!
//! Drives one inbound request through the pipeline:
//!
//! ```text
//! OriginChecked → UrlNormalized → AllowlistChecked → Dispatched → Relayed
//!       │               │                │               │
//!       └── MissingTarget / InvalidUrl   └ DomainNotAllowed └ UpstreamUnreachable
//! ```
//!
//! The origin gate runs before the engine as middleware. Every failure before
//! `Dispatched` is decided locally, without touching the upstream client.

use std::sync::Arc;

use axum::body::Body;
use axum::http::Method;
use axum::response::Response;
use futures_util::TryStreamExt;

use crate::http::request::InboundRequest;
use crate::relay::error::{error_chain, RelayError, RelayStage};
use crate::relay::target::{normalize_target, NormalizedTarget};
use crate::relay::upstream::{UpstreamClient, UpstreamRequest};
use crate::security::{AllowList, HeaderPolicy};

/// Validates, dispatches and relays requests.
#[derive(Clone)]
pub struct RelayEngine {
    allowlist: Arc<AllowList>,
    headers: Arc<HeaderPolicy>,
    upstream: Arc<dyn UpstreamClient>,
    merge_extra_query: bool,
}

impl RelayEngine {
    pub fn new(
        allowlist: Arc<AllowList>,
        headers: Arc<HeaderPolicy>,
        upstream: Arc<dyn UpstreamClient>,
        merge_extra_query: bool,
    ) -> Self {
        Self {
            allowlist,
            headers,
            upstream,
            merge_extra_query,
        }
    }

    pub fn allowlist(&self) -> &AllowList {
        &self.allowlist
    }

    /// Validate the inbound request and build the upstream request.
    pub fn prepare(&self, inbound: &InboundRequest) -> Result<UpstreamRequest, RelayError> {
        let query = inbound.query();
        let raw = inbound.raw_target(&query).ok_or(RelayError::MissingTarget)?;

        let extra: &[(String, String)] = if self.merge_extra_query { &query.extra } else { &[] };
        let NormalizedTarget { url, host } = normalize_target(&raw, extra)?;
        tracing::trace!(stage = %RelayStage::UrlNormalized, url = %url, "Target normalized");

        self.allowlist.check(&host)?;
        tracing::trace!(stage = %RelayStage::AllowlistChecked, host = %host, "Host allowed");

        let body = inbound.carries_body().then(|| inbound.body.clone());

        Ok(UpstreamRequest {
            method: inbound.method.clone(),
            url,
            headers: self.headers.outbound_headers(&inbound.headers),
            body,
        })
    }

    /// Run the full pipeline and produce the caller's response.
    pub async fn relay(&self, inbound: InboundRequest) -> Result<Response, RelayError> {
        let request = self.prepare(&inbound)?;
        let url = request.url.to_string();
        let method: Method = request.method.clone();

        tracing::info!(method = %method, url = %url, "Request validated");

        let upstream = self
            .upstream
            .dispatch(request)
            .await
            .map_err(|source| RelayError::UpstreamUnreachable {
                url: url.clone(),
                method: method.clone(),
                source,
            })?;

        tracing::info!(url = %url, status = upstream.status.as_u16(), "Response from upstream");

        let stream_url = url.clone();
        let body = upstream.body.inspect_err(move |err| {
            tracing::warn!(url = %stream_url, error = %error_chain(err), "Upstream body stream failed");
        });

        let mut response = Response::new(Body::from_stream(body));
        *response.status_mut() = upstream.status;
        *response.headers_mut() = self.headers.response_headers(upstream.headers);
        Ok(response)
    }
}
