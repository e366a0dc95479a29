//! Core resolver client types and traits.
//!
//! This module defines the [`Lookup`] trait, the [`ResolverEndpoint`] it is
//! pointed at, and [`resolve`], which turns one bounded lookup into the
//! textual outcome reported for a resolver.

use crate::base::checkerror::LookupError;
use serde::{Deserialize, Serialize};
use std::{fmt, future::Future, net::Ipv4Addr, pin::Pin, sync::Arc, time::Duration};

/// Per-query timeout used when nothing else is configured.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(1);

/// Outcome text for a query that succeeded without any A record.
pub const NO_RESULTS: &str = "no results";

/// A DNS server to query, with the label it is reported under.
///
/// `address` is an IP address or hostname, queried on port 53 unless it
/// carries its own port (`"127.0.0.1:5353"`, `"[::1]:5353"`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolverEndpoint {
    pub name: String,
    pub address: String,
}

impl ResolverEndpoint {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }
}

impl fmt::Display for ResolverEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.address)
    }
}

/// Alias for the `Future` type returned by a [`Lookup`].
pub type Answering = Pin<Box<dyn Future<Output = Result<Vec<Ipv4Addr>, LookupError>> + Send>>;

/// One A-record query against one server.
///
/// Implementations perform a single exchange (no retries) and return the
/// A addresses in the order the server listed them. An empty vector means
/// the server answered without any A record.
///
/// Implementations need not bound their own wait; [`resolve`] does.
pub trait Lookup: Send + Sync {
    fn lookup(&self, domain: &str, server: &str) -> Answering;
}

impl<L: Lookup + ?Sized> Lookup for Arc<L> {
    fn lookup(&self, domain: &str, server: &str) -> Answering {
        (**self).lookup(domain, server)
    }
}

/// Query `server` for the A records of `domain`, waiting at most `timeout`.
///
/// Never fails: errors and timeouts come back as their description, an
/// empty answer as [`NO_RESULTS`], addresses joined with `", "`.
pub async fn resolve(lookup: &dyn Lookup, domain: &str, server: &str, timeout: Duration) -> String {
    let result = match tokio::time::timeout(timeout, lookup.lookup(domain, server)).await {
        Ok(result) => result,
        Err(_) => Err(LookupError::Timeout(timeout)),
    };

    match &result {
        Ok(addrs) => {
            tracing::debug!(domain = %domain, server = %server, count = addrs.len(), "lookup complete")
        }
        Err(e) => tracing::debug!(domain = %domain, server = %server, error = %e, "lookup failed"),
    }

    render(result)
}

/// Textual form of a lookup result.
pub fn render(result: Result<Vec<Ipv4Addr>, LookupError>) -> String {
    match result {
        Ok(addrs) if addrs.is_empty() => NO_RESULTS.to_string(),
        Ok(addrs) => addrs
            .iter()
            .map(Ipv4Addr::to_string)
            .collect::<Vec<_>>()
            .join(", "),
        Err(e) => e.to_string(),
    }
}
