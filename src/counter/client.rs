//! Dedup-aware counter client
//!
//! One visit runs a small state machine against the backend:
//!
//! 1. Check the visitor marker `ip_{digest}`. A failed check (transport error,
//!    timeout, non-success status) counts as "not yet counted".
//! 2. Marker > 0: read the aggregate and return it unchanged.
//! 3. Otherwise: increment the marker and the aggregate concurrently and
//!    return the aggregate's new value. A failed marker increment is logged
//!    and otherwise ignored, so that address may be counted again later.
//!
//! Every backend call is attempted once and bounded by the client timeout.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::trait_def::{CounterBackend, CounterError, CounterKey, CounterResult};
use crate::config::CounterConfig;
use crate::visitor::VisitorDigest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitStatus {
    /// No marker was found, or the marker check failed
    NewVisitor,
    /// The marker reports at least one prior visit
    AlreadyCounted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisitOutcome {
    pub status: VisitStatus,
    pub count: u64,
}

#[derive(Clone)]
pub struct CounterClient {
    backend: Arc<dyn CounterBackend>,
    aggregate_key: CounterKey,
    timeout: Duration,
}

impl CounterClient {
    pub fn new(
        backend: Arc<dyn CounterBackend>,
        aggregate_key: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            backend,
            aggregate_key: CounterKey::named(aggregate_key),
            timeout,
        }
    }

    pub fn from_config(backend: Arc<dyn CounterBackend>, config: &CounterConfig) -> Self {
        Self::new(backend, config.aggregate_key.clone(), config.timeout())
    }

    pub fn aggregate_key(&self) -> &CounterKey {
        &self.aggregate_key
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn bounded<F>(&self, call: F) -> CounterResult<u64>
    where
        F: Future<Output = CounterResult<u64>>,
    {
        tokio::time::timeout(self.timeout, call)
            .await
            .unwrap_or_else(|_| Err(CounterError::Timeout(self.timeout)))
    }

    /// Read a key's current value
    pub async fn check_count(&self, key: &CounterKey) -> CounterResult<u64> {
        self.bounded(self.backend.read(key)).await
    }

    /// Increment a key and return its new value
    pub async fn increment(&self, key: &CounterKey) -> CounterResult<u64> {
        self.bounded(self.backend.increment(key)).await
    }

    /// Read the aggregate counter without modifying it
    pub async fn read_aggregate(&self) -> CounterResult<u64> {
        self.check_count(&self.aggregate_key).await
    }

    /// Decide whether a visitor has been counted before. Never fails.
    pub async fn visit_status(&self, digest: &VisitorDigest) -> VisitStatus {
        match self.check_count(&CounterKey::visitor(digest)).await {
            Ok(count) if count > 0 => VisitStatus::AlreadyCounted,
            Ok(_) => VisitStatus::NewVisitor,
            Err(err) => {
                debug!(visitor = %digest, error = %err, "visitor marker check failed, treating as new");
                VisitStatus::NewVisitor
            }
        }
    }

    /// Count a visit unless the visitor was already counted, returning the aggregate
    pub async fn increment_if_new(&self, digest: &VisitorDigest) -> CounterResult<VisitOutcome> {
        let status = self.visit_status(digest).await;

        let count = match status {
            VisitStatus::AlreadyCounted => self.read_aggregate().await?,
            VisitStatus::NewVisitor => {
                let marker = CounterKey::visitor(digest);
                let (marker_result, aggregate_result) =
                    tokio::join!(self.increment(&marker), self.increment(&self.aggregate_key));

                if let Err(err) = marker_result {
                    warn!(visitor = %digest, error = %err, "failed to record visitor marker");
                }
                aggregate_result?
            }
        };

        debug!(visitor = %digest, ?status, count, "visit resolved");
        Ok(VisitOutcome { status, count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::MemoryCounterBackend;

    fn client_with(backend: Arc<MemoryCounterBackend>) -> CounterClient {
        CounterClient::new(backend, "visits", Duration::from_secs(1))
    }

    #[tokio::test]
    async fn test_first_visit_increments_marker_and_aggregate() {
        let backend = Arc::new(MemoryCounterBackend::new());
        backend.set(&CounterKey::named("visits"), 10);
        let client = client_with(Arc::clone(&backend));
        let digest = VisitorDigest::from_address("203.0.113.5");

        let outcome = client.increment_if_new(&digest).await.unwrap();

        assert_eq!(
            outcome,
            VisitOutcome {
                status: VisitStatus::NewVisitor,
                count: 11
            }
        );
        assert_eq!(backend.read(&CounterKey::visitor(&digest)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_repeat_visit_reads_aggregate_unchanged() {
        let backend = Arc::new(MemoryCounterBackend::new());
        let client = client_with(Arc::clone(&backend));
        let digest = VisitorDigest::from_address("203.0.113.5");

        client.increment_if_new(&digest).await.unwrap();
        let repeat = client.increment_if_new(&digest).await.unwrap();

        assert_eq!(repeat.status, VisitStatus::AlreadyCounted);
        assert_eq!(repeat.count, 1);
        assert_eq!(backend.read(&CounterKey::visitor(&digest)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_distinct_visitors_each_count_once() {
        let backend = Arc::new(MemoryCounterBackend::new());
        let client = client_with(backend);

        for address in ["198.51.100.1", "198.51.100.2", "198.51.100.1"] {
            client
                .increment_if_new(&VisitorDigest::from_address(address))
                .await
                .unwrap();
        }

        assert_eq!(client.read_aggregate().await.unwrap(), 2);
    }
}
