//! Header policy for relayed requests and responses.
//!
//! # Responsibilities
//! - Build the outbound header set from a fixed whitelist
//! - Apply defaults for `Content-Type` and `Accept`
//! - Pass upstream response headers back untouched
//!
//! # Design Decisions
//! - Whitelist, not blacklist: cookies, credentials and connection-level
//!   headers never leave the relay unless explicitly configured
//! - Forwarded names are the canonical lowercase `HeaderName`s

use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue, InvalidHeaderName};

use crate::config::{RelayPolicyConfig, UserAgentPolicy};

/// Identifier sent upstream when no caller `User-Agent` is available.
pub const DEFAULT_USER_AGENT: &str = "cors-proxy/1.0";

const DEFAULT_CONTENT_TYPE: HeaderValue =
    HeaderValue::from_static("application/x-www-form-urlencoded");
const DEFAULT_ACCEPT: HeaderValue = HeaderValue::from_static("application/json");

/// Decides which headers cross the relay in each direction.
#[derive(Debug, Clone)]
pub struct HeaderPolicy {
    user_agent: OutboundUserAgent,
    default_accept: bool,
    forwardable: Vec<HeaderName>,
}

#[derive(Debug, Clone)]
enum OutboundUserAgent {
    Passthrough,
    Fixed(HeaderValue),
}

impl HeaderPolicy {
    /// Build the policy from the relay section of the config.
    pub fn from_config(config: &RelayPolicyConfig) -> Result<Self, HeaderPolicyError> {
        let user_agent = match &config.user_agent {
            UserAgentPolicy::Passthrough => OutboundUserAgent::Passthrough,
            UserAgentPolicy::Fixed(value) => OutboundUserAgent::Fixed(
                HeaderValue::from_str(value)
                    .map_err(|_| HeaderPolicyError::UserAgent(value.clone()))?,
            ),
        };

        let forwardable = config
            .forward_headers
            .iter()
            .map(|name| {
                HeaderName::from_bytes(name.as_bytes())
                    .map_err(|source| HeaderPolicyError::HeaderName { name: name.clone(), source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            user_agent,
            default_accept: config.default_accept,
            forwardable,
        })
    }

    /// Headers for the upstream request, derived from the inbound ones.
    pub fn outbound_headers(&self, inbound: &HeaderMap) -> HeaderMap {
        let mut outbound = HeaderMap::new();

        let user_agent = match &self.user_agent {
            OutboundUserAgent::Passthrough => inbound
                .get(header::USER_AGENT)
                .cloned()
                .unwrap_or(HeaderValue::from_static(DEFAULT_USER_AGENT)),
            OutboundUserAgent::Fixed(value) => value.clone(),
        };
        outbound.insert(header::USER_AGENT, user_agent);

        outbound.insert(
            header::CONTENT_TYPE,
            inbound
                .get(header::CONTENT_TYPE)
                .cloned()
                .unwrap_or(DEFAULT_CONTENT_TYPE),
        );

        match inbound.get(header::ACCEPT) {
            Some(accept) => {
                outbound.insert(header::ACCEPT, accept.clone());
            }
            None if self.default_accept => {
                outbound.insert(header::ACCEPT, DEFAULT_ACCEPT);
            }
            None => {}
        }

        for name in &self.forwardable {
            if let Some(value) = inbound.get(name) {
                outbound.insert(name.clone(), value.clone());
            }
        }

        outbound
    }

    /// Headers relayed back to the caller: all of them, unchanged.
    pub fn response_headers(&self, upstream: HeaderMap) -> HeaderMap {
        upstream
    }

    pub fn forwardable(&self) -> &[HeaderName] {
        &self.forwardable
    }
}

/// Invalid header configuration.
#[derive(Debug, thiserror::Error)]
pub enum HeaderPolicyError {
    #[error("invalid forward header name '{name}'")]
    HeaderName {
        name: String,
        #[source]
        source: InvalidHeaderName,
    },
    #[error("invalid fixed user agent '{0}'")]
    UserAgent(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> HeaderPolicy {
        HeaderPolicy::from_config(&RelayPolicyConfig::default()).unwrap()
    }

    fn inbound(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (k, v) in pairs {
            headers.append(
                HeaderName::from_bytes(k.as_bytes()).unwrap(),
                HeaderValue::from_str(v).unwrap(),
            );
        }
        headers
    }

    #[test]
    fn defaults_when_caller_sends_nothing() {
        let out = policy().outbound_headers(&HeaderMap::new());
        assert_eq!(out.get(header::USER_AGENT).unwrap(), DEFAULT_USER_AGENT);
        assert_eq!(out.get(header::CONTENT_TYPE).unwrap(), "application/x-www-form-urlencoded");
        assert_eq!(out.get(header::ACCEPT).unwrap(), "application/json");
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn caller_values_win_over_defaults() {
        let out = policy().outbound_headers(&inbound(&[
            ("user-agent", "Mozilla/5.0"),
            ("content-type", "application/json"),
            ("accept", "text/html"),
        ]));
        assert_eq!(out.get(header::USER_AGENT).unwrap(), "Mozilla/5.0");
        assert_eq!(out.get(header::CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(out.get(header::ACCEPT).unwrap(), "text/html");
    }

    #[test]
    fn forwardable_headers_are_copied_case_insensitively() {
        let binding = policy();
        let names: Vec<&str> = binding.forwardable().iter().map(HeaderName::as_str).collect();
        assert_eq!(names, ["api-key", "key", "apikey"]);

        let out = policy().outbound_headers(&inbound(&[("APIKEY", "XYZ"), ("Api-Key", "abc")]));
        assert_eq!(out.get("apikey").unwrap(), "XYZ");
        assert_eq!(out.get("api-key").unwrap(), "abc");
        assert!(out.get("key").is_none());
    }

    #[test]
    fn unlisted_headers_are_dropped() {
        let out = policy().outbound_headers(&inbound(&[
            ("x-custom", "foo"),
            ("cookie", "session=1"),
            ("authorization", "Bearer t"),
            ("host", "localhost:3000"),
            ("origin", "null"),
        ]));
        for name in ["x-custom", "cookie", "authorization", "host", "origin"] {
            assert!(out.get(name).is_none(), "{name} leaked upstream");
        }
    }

    #[test]
    fn fixed_user_agent_ignores_caller() {
        let config = RelayPolicyConfig {
            user_agent: UserAgentPolicy::Fixed("relay/2.0".into()),
            ..Default::default()
        };
        let policy = HeaderPolicy::from_config(&config).unwrap();
        let out = policy.outbound_headers(&inbound(&[("user-agent", "Mozilla/5.0")]));
        assert_eq!(out.get(header::USER_AGENT).unwrap(), "relay/2.0");
    }

    #[test]
    fn default_accept_can_be_disabled() {
        let config = RelayPolicyConfig {
            default_accept: false,
            ..Default::default()
        };
        let policy = HeaderPolicy::from_config(&config).unwrap();
        assert!(policy.outbound_headers(&HeaderMap::new()).get(header::ACCEPT).is_none());
        let out = policy.outbound_headers(&inbound(&[("accept", "text/plain")]));
        assert_eq!(out.get(header::ACCEPT).unwrap(), "text/plain");
    }

    #[test]
    fn invalid_header_name_is_rejected() {
        let config = RelayPolicyConfig {
            forward_headers: vec!["bad header".into()],
            ..Default::default()
        };
        assert!(matches!(
            HeaderPolicy::from_config(&config),
            Err(HeaderPolicyError::HeaderName { .. })
        ));
    }

    #[test]
    fn response_headers_pass_through() {
        let upstream = inbound(&[("set-cookie", "a=1"), ("x-ratelimit", "10"), ("set-cookie", "b=2")]);
        let relayed = policy().response_headers(upstream.clone());
        assert_eq!(relayed, upstream);
        assert_eq!(relayed.get_all("set-cookie").iter().count(), 2);
    }
}
