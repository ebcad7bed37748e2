use axum::{
    extract::Request,
    http::{header, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use super::error::ErrorResponse;

/// Reject every method except `GET` and `OPTIONS` with 405
pub async fn method_gate(request: Request, next: Next) -> Response {
    if matches!(*request.method(), Method::GET | Method::OPTIONS) {
        return next.run(request).await;
    }

    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "GET, OPTIONS")],
        Json(ErrorResponse {
            error: "Method not allowed".to_string(),
        }),
    )
        .into_response()
}
