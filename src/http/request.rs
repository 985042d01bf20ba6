//! Request handling and transformation.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID v4)
//! - Capture the inbound request for the relay engine
//! - Extract the raw target from the `url` query parameter or body field
//! - Collect the remaining query parameters for merging
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Query wins over body, matching `req.query.url || req.body.url`
//! - An empty `url` value counts as absent

use axum::body::Bytes;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Method, Request, Uri};
use tower_http::request_id::{MakeRequestId, RequestId};
use url::form_urlencoded;
use uuid::Uuid;

/// Header carrying the request ID.
pub static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Name of the query parameter / body field holding the target.
const TARGET_FIELD: &str = "url";

/// Generates a UUID v4 request ID for requests that arrive without one.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Read the request ID set by the request ID layer.
pub fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

/// The parts of an inbound call the relay engine needs.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Query string split into the target and everything else.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InboundQuery {
    pub url: Option<String>,
    pub extra: Vec<(String, String)>,
}

impl InboundQuery {
    pub fn parse(query: Option<&str>) -> Self {
        let mut parsed = Self::default();
        let Some(query) = query else {
            return parsed;
        };

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            if key == TARGET_FIELD {
                if parsed.url.is_none() && !value.is_empty() {
                    parsed.url = Some(value.into_owned());
                }
            } else {
                parsed.extra.push((key.into_owned(), value.into_owned()));
            }
        }
        parsed
    }
}

impl InboundRequest {
    pub fn query(&self) -> InboundQuery {
        InboundQuery::parse(self.uri.query())
    }

    /// Whether the method's body is relayed upstream.
    pub fn carries_body(&self) -> bool {
        matches!(self.method, Method::POST | Method::PUT | Method::PATCH)
    }

    /// `url` field of a JSON object or form body.
    pub fn body_target(&self) -> Option<String> {
        if !self.carries_body() || self.body.is_empty() {
            return None;
        }

        let target = match self.media_type().as_deref() {
            Some("application/json") => serde_json::from_slice::<serde_json::Value>(&self.body)
                .ok()?
                .get(TARGET_FIELD)?
                .as_str()
                .map(str::to_string),
            Some("application/x-www-form-urlencoded") => form_urlencoded::parse(&self.body)
                .find(|(key, _)| key == TARGET_FIELD)
                .map(|(_, value)| value.into_owned()),
            _ => None,
        };
        target.filter(|t| !t.is_empty())
    }

    /// Raw target: the query parameter first, then the body field.
    pub fn raw_target(&self, query: &InboundQuery) -> Option<String> {
        query.url.clone().or_else(|| self.body_target())
    }

    fn media_type(&self) -> Option<String> {
        let value = self.headers.get(header::CONTENT_TYPE)?.to_str().ok()?;
        let essence = value.split(';').next()?.trim();
        Some(essence.to_ascii_lowercase())
    }
}
