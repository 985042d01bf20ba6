//! Caller origin policy.
//!
//! Guards who may use the relay at all. Independent from the upstream
//! allowlist, which guards what the relay may reach.

use axum::http::HeaderValue;

/// Outcome of checking a caller's declared origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OriginDecision {
    /// No `Origin` header (non-browser caller).
    AllowedAbsent,
    /// The opaque origin `null` (file://, sandboxed frames).
    AllowedNull,
    /// The configured local origin.
    AllowedLocal,
    Rejected,
}

impl OriginDecision {
    pub fn is_allowed(self) -> bool {
        !matches!(self, OriginDecision::Rejected)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OriginDecision::AllowedAbsent => "allowed_absent",
            OriginDecision::AllowedNull => "allowed_null",
            OriginDecision::AllowedLocal => "allowed_local",
            OriginDecision::Rejected => "rejected",
        }
    }
}

/// Allows an absent origin, the literal `null`, or one fixed local origin.
#[derive(Debug, Clone)]
pub struct OriginPolicy {
    local_origin: String,
}

impl OriginPolicy {
    pub fn new(local_origin: impl Into<String>) -> Self {
        Self {
            local_origin: local_origin.into(),
        }
    }

    pub fn local_origin(&self) -> &str {
        &self.local_origin
    }

    /// Decide on a raw `Origin` header value.
    ///
    /// A value that is not valid UTF-8 can never equal the local origin and
    /// is rejected.
    pub fn decide_header(&self, origin: Option<&HeaderValue>) -> OriginDecision {
        match origin {
            None => OriginDecision::AllowedAbsent,
            Some(value) => match value.to_str() {
                Ok(origin) => self.decide(Some(origin)),
                Err(_) => OriginDecision::Rejected,
            },
        }
    }

    pub fn decide(&self, origin: Option<&str>) -> OriginDecision {
        match origin {
            None => OriginDecision::AllowedAbsent,
            Some("null") => OriginDecision::AllowedNull,
            Some(o) if o == self.local_origin => OriginDecision::AllowedLocal,
            Some(_) => OriginDecision::Rejected,
        }
    }
}
