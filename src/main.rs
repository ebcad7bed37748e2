use anyhow::Result;
use std::net::SocketAddr;
use tracing::info;

use visit_counter::api;
use visit_counter::config::{Config, CounterBackendKind};
use visit_counter::counter::{self, CounterClient};
use visit_counter::telemetry;
use visit_counter::visitor;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    telemetry::init_tracing(&config.logging);
    info!("Loaded configuration ({:?})", config.environment);

    if !visitor::init_visitor_salt(config.visitor.salt.as_deref()) {
        tracing::warn!("Visitor salt was already initialized, keeping the existing value");
    }
    if config.visitor.salt.is_some() {
        info!("Using visitor salt from VISITOR_SALT");
    }

    // Initialize counter backend
    let backend = counter::backend_from_config(&config.counter)?;
    match config.counter.backend {
        CounterBackendKind::Http => info!(
            "Using counter service {} (namespace: {}, aggregate key: {})",
            config.counter.api_base_url, config.counter.namespace, config.counter.aggregate_key
        ),
        CounterBackendKind::Memory => {
            info!("Using in-memory counter backend, counts reset on restart")
        }
    }
    info!("Counter calls time out after {}s", config.counter.timeout_secs);

    let counter_client = CounterClient::from_config(backend, &config.counter);
    let app = api::create_app(counter_client, config.environment, &config.frontend);

    if let Some(ref static_dir) = config.frontend.static_dir {
        info!("Serving frontend from directory: {}", static_dir);
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Counter proxy listening on http://{}", addr);
    info!("   - GET http://{}/api/counter-increment", addr);
    info!("   - GET http://{}/api/counter", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Counter proxy stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
