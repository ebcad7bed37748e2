pub mod client;
pub mod http;
pub mod memory;
pub mod payload;
pub mod trait_def;

pub use client::{CounterClient, VisitOutcome, VisitStatus};
pub use http::HttpCounterBackend;
pub use memory::MemoryCounterBackend;
pub use payload::CountPayload;
pub use trait_def::{CounterBackend, CounterError, CounterKey, CounterResult};

use std::sync::Arc;

use crate::config::{CounterBackendKind, CounterConfig};

/// Build the backend selected by configuration
pub fn backend_from_config(config: &CounterConfig) -> anyhow::Result<Arc<dyn CounterBackend>> {
    Ok(match config.backend {
        CounterBackendKind::Http => Arc::new(HttpCounterBackend::new(config)?),
        CounterBackendKind::Memory => Arc::new(MemoryCounterBackend::new()),
    })
}
