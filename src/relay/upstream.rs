//! Upstream HTTP client.
//!
//! # Responsibilities
//! - Issue the outbound request built by the relay engine
//! - Hand back status, headers and a live body stream
//!
//! # Design Decisions
//! - `UpstreamClient` is the seam between the engine and the network, so the
//!   pipeline can be exercised without sockets
//! - Bodies are never buffered; dropping the stream closes the upstream
//!   connection
//! - Any HTTP status is a successful dispatch, only transport failures error

use std::time::Duration;

use axum::body::Bytes;
use axum::http::{HeaderMap, Method, StatusCode};
use futures_util::future::BoxFuture;
use futures_util::stream::BoxStream;
use futures_util::{FutureExt, StreamExt, TryStreamExt};
use url::Url;

use crate::config::UpstreamConfig;
use crate::relay::error::BoxError;

/// A request ready to be sent upstream.
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

/// Streamed upstream body.
pub type BodyStream = BoxStream<'static, Result<Bytes, BoxError>>;

/// Status, headers and live body of an upstream answer.
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: BodyStream,
}

impl std::fmt::Debug for UpstreamResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// Sends relayed requests to upstream hosts.
pub trait UpstreamClient: Send + Sync + 'static {
    /// Dispatch a request. Errors only when no response could be obtained.
    fn dispatch(&self, request: UpstreamRequest) -> BoxFuture<'_, Result<UpstreamResponse, BoxError>>;
}

/// `reqwest`-backed upstream client.
#[derive(Debug, Clone)]
pub struct ReqwestUpstream {
    client: reqwest::Client,
}

impl ReqwestUpstream {
    /// Build the client from the upstream section of the config.
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs));

        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        if config.danger_accept_invalid_certs {
            tracing::warn!(
                "danger_accept_invalid_certs is enabled: upstream TLS certificates are not validated"
            );
            builder = builder.danger_accept_invalid_certs(true);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl UpstreamClient for ReqwestUpstream {
    fn dispatch(&self, request: UpstreamRequest) -> BoxFuture<'_, Result<UpstreamResponse, BoxError>> {
        let mut builder = self
            .client
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        async move {
            let mut response = builder.send().await?;
            let status = response.status();
            let headers = std::mem::take(response.headers_mut());
            let body = response
                .bytes_stream()
                .map_err(|err| Box::new(err) as BoxError)
                .boxed();
            Ok::<_, BoxError>(UpstreamResponse { status, headers, body })
        }
        .boxed()
    }
}
