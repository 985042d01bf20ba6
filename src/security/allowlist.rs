//! Upstream hostname allowlist.
//!
//! # Design Decisions
//! - Exact string equality against the parsed hostname, nothing else
//! - No subdomain, suffix or wildcard matching
//! - Built once from config and never mutated

use std::collections::BTreeSet;

use crate::relay::error::RelayError;

/// The closed set of upstream hostnames the relay may reach.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    hosts: BTreeSet<String>,
}

impl AllowList {
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hosts: hosts.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if `host` is exactly a member of the list.
    pub fn contains(&self, host: &str) -> bool {
        self.hosts.contains(host)
    }

    /// Gate a parsed hostname.
    pub fn check(&self, host: &str) -> Result<(), RelayError> {
        if self.contains(host) {
            Ok(())
        } else {
            Err(RelayError::DomainNotAllowed {
                host: host.to_string(),
            })
        }
    }

    /// Hosts in sorted order.
    pub fn hosts(&self) -> impl Iterator<Item = &str> {
        self.hosts.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}
