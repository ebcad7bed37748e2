use async_trait::async_trait;
use dashmap::DashMap;

use super::trait_def::{CounterBackend, CounterKey, CounterResult};

/// In-process counter backend for local development
///
/// Keys that were never incremented read as 0. Values are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryCounterBackend {
    counts: DashMap<String, u64>,
}

impl MemoryCounterBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a key with a starting value
    pub fn set(&self, key: &CounterKey, value: u64) {
        self.counts.insert(key.as_str().to_string(), value);
    }
}

#[async_trait]
impl CounterBackend for MemoryCounterBackend {
    async fn read(&self, key: &CounterKey) -> CounterResult<u64> {
        Ok(self
            .counts
            .get(key.as_str())
            .map(|entry| *entry.value())
            .unwrap_or(0))
    }

    async fn increment(&self, key: &CounterKey) -> CounterResult<u64> {
        let mut entry = self.counts.entry(key.as_str().to_string()).or_insert(0);
        *entry += 1;
        Ok(*entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_reads_zero() {
        let backend = MemoryCounterBackend::new();
        assert_eq!(backend.read(&CounterKey::named("visits")).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_increment_returns_new_value() {
        let backend = MemoryCounterBackend::new();
        let key = CounterKey::named("visits");
        backend.set(&key, 41);

        assert_eq!(backend.increment(&key).await.unwrap(), 42);
        assert_eq!(backend.read(&key).await.unwrap(), 42);
    }
}
