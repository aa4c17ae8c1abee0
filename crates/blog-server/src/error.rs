//! HTTP error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use blog_core::BlogError;
use serde_json::json;

/// Error returned by every handler
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "validation",
            message: message.into(),
        }
    }
}

impl From<BlogError> for ApiError {
    fn from(err: BlogError) -> Self {
        let (status, code) = match &err {
            BlogError::Validation(_) => (StatusCode::BAD_REQUEST, "validation"),
            BlogError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            BlogError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            BlogError::Database(_) | BlogError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal")
            }
        };

        let message = if err.is_internal() {
            tracing::error!("Request failed: {}", err);
            "Internal server error".to_string()
        } else {
            match err {
                BlogError::Validation(msg) | BlogError::Conflict(msg) => msg,
                other => other.to_string(),
            }
        };

        Self {
            status,
            code,
            message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.message,
            "code": self.code,
        }));
        (self.status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
