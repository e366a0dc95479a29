//! Fan-out/fan-in over a resolver list.
//!
//! [`Checker::check_all`] queries every endpoint concurrently, one task per
//! endpoint, and returns only once every task has reported. Each task sends
//! its outcome over a channel sized to the batch; the collector is the only
//! owner of the result list, so no lock is involved.
//!
//! Per-resolver failures are data: they become that resolver's outcome text
//! and never fail the batch.

use crate::base::checkerror::LookupError;
use crate::dns::{resolve, Lookup, ResolverEndpoint, UdpLookup, DEFAULT_QUERY_TIMEOUT};
use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc, time::Duration, time::Instant};
use tokio::sync::mpsc;

/// What one resolver answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryOutcome {
    #[serde(rename = "server")]
    pub server_name: String,
    #[serde(rename = "response")]
    pub result_text: String,
}

/// Every resolver's answer for one domain.
///
/// `outcomes` holds exactly one entry per queried endpoint, in the order the
/// queries completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionResult {
    pub domain: String,
    #[serde(rename = "responses")]
    pub outcomes: Vec<QueryOutcome>,
}

impl ResolutionResult {
    /// Outcome reported under `server_name`, if any. With duplicate names
    /// the first completed one is returned.
    pub fn outcome_for(&self, server_name: &str) -> Option<&QueryOutcome> {
        self.outcomes.iter().find(|o| o.server_name == server_name)
    }
}

/// Concurrent resolver checker.
///
/// Cheap to clone; clones share the same [`Lookup`].
#[derive(Clone)]
pub struct Checker {
    lookup: Arc<dyn Lookup>,
    timeout: Duration,
}

impl Default for Checker {
    fn default() -> Self {
        Self::new(Arc::new(UdpLookup::new()))
    }
}

impl Checker {
    /// Create a checker over `lookup` with the default 1 second per-query
    /// timeout.
    pub fn new(lookup: Arc<dyn Lookup>) -> Self {
        Self {
            lookup,
            timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    /// Set the per-query timeout. Every resolver gets the full amount; there
    /// is no batch-wide limit.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Query every endpoint for `domain` concurrently and collect all
    /// outcomes.
    ///
    /// Must be called from within a Tokio runtime.
    pub async fn check_all(&self, domain: &str, endpoints: &[ResolverEndpoint]) -> ResolutionResult {
        if endpoints.is_empty() {
            tracing::debug!(domain = %domain, "no resolvers configured");
            return ResolutionResult {
                domain: domain.to_string(),
                outcomes: Vec::new(),
            };
        }

        let started = Instant::now();
        let (tx, mut rx) = mpsc::channel(endpoints.len());
        let shared_domain: Arc<str> = Arc::from(domain);

        for (index, endpoint) in endpoints.iter().cloned().enumerate() {
            let tx = tx.clone();
            let lookup = Arc::clone(&self.lookup);
            let domain = Arc::clone(&shared_domain);
            let timeout = self.timeout;

            tokio::spawn(async move {
                let result_text = resolve(lookup.as_ref(), &domain, &endpoint.address, timeout).await;
                let outcome = QueryOutcome {
                    server_name: endpoint.name,
                    result_text,
                };
                // Capacity equals the batch size, so this never waits.
                let _ = tx.send((index, outcome)).await;
            });
        }

        // The channel closes once the last task has sent or died.
        drop(tx);

        let mut reported = vec![false; endpoints.len()];
        let mut outcomes = Vec::with_capacity(endpoints.len());
        while let Some((index, outcome)) = rx.recv().await {
            reported[index] = true;
            outcomes.push(outcome);
        }

        for (endpoint, _) in endpoints.iter().zip(&reported).filter(|(_, done)| !**done) {
            tracing::warn!(domain = %domain, resolver = %endpoint, "query task ended without reporting");
            outcomes.push(QueryOutcome {
                server_name: endpoint.name.clone(),
                result_text: LookupError::Aborted.to_string(),
            });
        }

        tracing::info!(
            domain = %domain,
            resolvers = outcomes.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "check complete"
        );

        ResolutionResult {
            domain: domain.to_string(),
            outcomes,
        }
    }
}

impl fmt::Debug for Checker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Checker")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
