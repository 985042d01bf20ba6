//! Target URL normalization.
//!
//! Turns the raw `url` value supplied by the caller into an absolute URL
//! plus its parsed hostname, or rejects it before any upstream call.

use url::Url;

use crate::relay::error::RelayError;

/// An absolute target URL and the hostname the allowlist is checked against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTarget {
    pub url: Url,
    pub host: String,
}

/// Normalize a raw target string.
///
/// Leading slashes are trimmed, `https://` is prepended when no http(s)
/// scheme is present, and `extra_query` pairs are appended to the query
/// string in order.
pub fn normalize_target(
    raw: &str,
    extra_query: &[(String, String)],
) -> Result<NormalizedTarget, RelayError> {
    let trimmed = raw.trim_start_matches('/');
    let candidate = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let mut url = Url::parse(&candidate).map_err(|_| RelayError::InvalidUrl {
        url: candidate.clone(),
    })?;

    if !extra_query.is_empty() {
        url.query_pairs_mut().extend_pairs(extra_query);
    }

    let host = url
        .host_str()
        .ok_or_else(|| RelayError::InvalidUrl { url: candidate.clone() })?
        .to_string();

    Ok(NormalizedTarget { url, host })
}
