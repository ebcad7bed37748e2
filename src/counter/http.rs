use anyhow::Context;
use async_trait::async_trait;
use reqwest::{header, Client};
use std::time::Duration;
use tracing::debug;

use super::payload::CountPayload;
use super::trait_def::{CounterBackend, CounterError, CounterKey, CounterResult};
use crate::config::CounterConfig;

/// Counter backend talking to the hosted counter API
///
/// Reads are `GET {base}/{namespace}/{key}`, increments are
/// `GET {base}/{namespace}/{key}/up`.
#[derive(Clone)]
pub struct HttpCounterBackend {
    client: Client,
    base_url: String,
    namespace: String,
    timeout: Duration,
}

impl HttpCounterBackend {
    pub fn new(config: &CounterConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("visit-counter/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout())
            .build()
            .context("failed to build HTTP client for the counter service")?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            namespace: config.namespace.clone(),
            timeout: config.timeout(),
        })
    }

    fn key_url(&self, key: &CounterKey) -> String {
        format!("{}/{}/{}", self.base_url, self.namespace, key)
    }

    async fn fetch_count(&self, url: &str) -> CounterResult<u64> {
        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            debug!(%url, status = status.as_u16(), "counter service returned non-success status");
            return Err(CounterError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(|e| self.transport_error(e))?;
        Ok(CountPayload::from_slice(&body)?.count())
    }

    fn transport_error(&self, err: reqwest::Error) -> CounterError {
        if err.is_timeout() {
            CounterError::Timeout(self.timeout)
        } else {
            CounterError::Transport(err)
        }
    }
}

#[async_trait]
impl CounterBackend for HttpCounterBackend {
    async fn read(&self, key: &CounterKey) -> CounterResult<u64> {
        self.fetch_count(&self.key_url(key)).await
    }

    async fn increment(&self, key: &CounterKey) -> CounterResult<u64> {
        self.fetch_count(&format!("{}/up", self.key_url(key))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_url_layout() {
        let config = CounterConfig {
            api_base_url: "https://counter.example/v1/".to_string(),
            namespace: "site".to_string(),
            ..CounterConfig::default()
        };
        let backend = HttpCounterBackend::new(&config).unwrap();

        assert_eq!(
            backend.key_url(&CounterKey::named("visits")),
            "https://counter.example/v1/site/visits"
        );
    }
}
