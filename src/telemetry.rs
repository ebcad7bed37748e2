use std::sync::OnceLock;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};

const DEFAULT_FILTER: &str = "visit_counter=info,tower_http=info";

/// Records whether the global subscriber was installed by us
static TRACING: OnceLock<bool> = OnceLock::new();

/// Install the global tracing subscriber once per process
///
/// The first call installs the subscriber and returns `true`. Later calls are
/// skipped and return `false`, whatever configuration they pass.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let mut first_call = false;
    let installed = *TRACING.get_or_init(|| {
        first_call = true;
        install_subscriber(config.format)
    });

    if first_call && !installed {
        // Someone else owns the global subscriber (e.g. a test harness)
        tracing::debug!("global tracing subscriber already set, skipping");
    }
    first_call && installed
}

fn install_subscriber(format: LogFormat) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let registry = tracing_subscriber::registry().with(filter);
    let result = match format {
        LogFormat::Pretty => registry.with(fmt::layer()).try_init(),
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
    };
    result.is_ok()
}
