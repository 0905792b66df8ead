use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use mercato_order::OrderError;

/// Boundary wrapper turning the domain error taxonomy into HTTP responses
pub struct ApiError(OrderError);

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            OrderError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            OrderError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{what} not found")),
            OrderError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            OrderError::PreconditionFailed(msg) => (StatusCode::PRECONDITION_FAILED, msg.clone()),
            OrderError::NotificationFailure(err) => {
                tracing::error!("Confirmation delivery failed: {}", err);
                (
                    StatusCode::BAD_GATEWAY,
                    "confirmation delivery failed".to_string(),
                )
            }
            OrderError::Internal(err) => {
                tracing::error!("Storage failure: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
