use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

use super::error::ApiError;
use crate::config::Environment;
use crate::counter::CounterClient;
use crate::visitor::Visitor;

pub struct AppState {
    pub counter: CounterClient,
    pub environment: Environment,
}

impl AppState {
    /// Log the cause of a failed request outside production, then hand it back
    fn report(&self, err: ApiError) -> ApiError {
        if !self.environment.is_production() {
            if let ApiError::Internal(cause) = &err {
                error!(error = ?cause, "counter request failed");
            } else {
                error!(error = %err, "counter request failed");
            }
        }
        err
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: u64,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Count the calling visitor once and return the aggregate
pub async fn counter_increment(
    State(state): State<Arc<AppState>>,
    Visitor(digest): Visitor,
) -> Result<Json<CountResponse>, ApiError> {
    match state.counter.increment_if_new(&digest).await {
        Ok(outcome) => Ok(Json(CountResponse {
            count: outcome.count,
        })),
        Err(e) => Err(state.report(ApiError::from_increment(e))),
    }
}

/// Relay the aggregate without counting
pub async fn read_counter(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CountResponse>, ApiError> {
    match state.counter.read_aggregate().await {
        Ok(count) => Ok(Json(CountResponse { count })),
        Err(e) => Err(state.report(ApiError::from_read(e))),
    }
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
    })
}
