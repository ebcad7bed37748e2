use axum::{
    http::{header, Method},
    middleware,
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::config::{Environment, FrontendConfig};
use crate::counter::CounterClient;

use super::handlers::{counter_increment, health_check, read_counter, AppState};
use super::middleware::method_gate;

const CORS_MAX_AGE: Duration = Duration::from_secs(86_400);

/// CORS policy of the counter endpoints. Every `OPTIONS` request is answered
/// here with 200 and an empty body.
pub fn counter_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(CORS_MAX_AGE)
}

pub fn create_api_router(counter: CounterClient, environment: Environment) -> Router {
    let state = Arc::new(AppState {
        counter,
        environment,
    });

    let counter_routes = Router::new()
        .route("/api/counter-increment", get(counter_increment))
        .route("/api/counter", get(read_counter))
        .layer(middleware::from_fn(method_gate))
        .layer(counter_cors_layer())
        .with_state(state);

    Router::new()
        .route("/health", get(health_check))
        .merge(counter_routes)
}

/// Full application: API routes, optional static frontend, request tracing
pub fn create_app(
    counter: CounterClient,
    environment: Environment,
    frontend: &FrontendConfig,
) -> Router {
    let mut app = create_api_router(counter, environment);

    if let Some(ref static_dir) = frontend.static_dir {
        app = app.fallback_service(ServeDir::new(static_dir));
    }

    app.layer(TraceLayer::new_for_http())
}
