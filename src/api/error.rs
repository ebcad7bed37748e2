use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::counter::CounterError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Failures surfaced to counter endpoint callers
///
/// Upstream details never reach the response body; only the relayed status
/// code of a failed read does.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("counter service timed out")]
    Timeout,

    #[error("counter service returned {0}")]
    Upstream(StatusCode),

    #[error("internal error: {0}")]
    Internal(#[source] CounterError),
}

impl ApiError {
    /// Map a failure of the counting path. Upstream statuses are not relayed
    /// because several calls may have contributed.
    pub fn from_increment(err: CounterError) -> Self {
        match err {
            CounterError::Timeout(_) => ApiError::Timeout,
            other => ApiError::Internal(other),
        }
    }

    /// Map a failure of the single aggregate read, relaying upstream statuses
    pub fn from_read(err: CounterError) -> Self {
        match err {
            CounterError::Timeout(_) => ApiError::Timeout,
            CounterError::Status(code) => match StatusCode::from_u16(code) {
                Ok(status) => ApiError::Upstream(status),
                Err(_) => ApiError::Internal(CounterError::Status(code)),
            },
            other => ApiError::Internal(other),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Upstream(status) => *status,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = match &self {
            ApiError::Timeout => "Request timeout".to_string(),
            ApiError::Upstream(status) => format!("API error: {}", status.as_u16()),
            ApiError::Internal(_) => "Internal server error".to_string(),
        };

        (self.status(), Json(ErrorResponse { error })).into_response()
    }
}
