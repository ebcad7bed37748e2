use async_trait::async_trait;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::visitor::VisitorDigest;

#[derive(Debug, Error)]
pub enum CounterError {
    #[error("counter request timed out after {0:?}")]
    Timeout(Duration),
    #[error("counter service returned status {0}")]
    Status(u16),
    #[error("counter service unreachable: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("counter response body is not JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CounterError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, CounterError::Timeout(_))
    }
}

pub type CounterResult<T> = Result<T, CounterError>;

/// Key within the counter namespace
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CounterKey(String);

impl CounterKey {
    pub const VISITOR_PREFIX: &'static str = "ip_";

    /// Per-visitor marker key, `ip_{digest}`
    pub fn visitor(digest: &VisitorDigest) -> Self {
        Self(format!("{}{}", Self::VISITOR_PREFIX, digest))
    }

    /// A fixed key such as the aggregate `visits` counter
    pub fn named(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CounterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Remote key-value counting service
#[async_trait]
pub trait CounterBackend: Send + Sync {
    /// Current value of a key
    async fn read(&self, key: &CounterKey) -> CounterResult<u64>;

    /// Increment a key by one and return its new value
    async fn increment(&self, key: &CounterKey) -> CounterResult<u64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visitor_key_format() {
        let digest = VisitorDigest::with_salt("ab", "c");
        assert_eq!(CounterKey::visitor(&digest).as_str(), "ip_ba7816bf8f01cfea");
    }

    #[test]
    fn test_timeout_is_distinguishable() {
        assert!(CounterError::Timeout(Duration::from_secs(10)).is_timeout());
        assert!(!CounterError::Status(503).is_timeout());
    }

    #[test]
    fn test_decode_error_names_non_json_body() {
        let err: CounterError = serde_json::from_slice::<serde_json::Value>(b"<html>")
            .unwrap_err()
            .into();
        assert!(err.to_string().starts_with("counter response body is not JSON"));
    }
}
