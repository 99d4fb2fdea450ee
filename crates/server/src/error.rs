//! Application error handling

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mymedi_core::{SchemaError, StaleGeneration};
use serde::Serialize;

use crate::ai::GeneratorError;

/// Application error type
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    Conflict(String),
    TooManyRequests(String),
    Upstream(String),
    Unavailable(String),
    Internal(String),
}

/// JSON error body: `{"error": {"code": ..., "message": ...}}`
#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

impl AppError {
    fn parts(self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg),
            AppError::TooManyRequests(msg) => {
                (StatusCode::TOO_MANY_REQUESTS, "rate_limited", msg)
            }
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, "upstream_error", msg),
            AppError::Unavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "unavailable", msg)
            }
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal", msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %message, "Request failed");
        }

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<SchemaError> for AppError {
    fn from(err: SchemaError) -> Self {
        AppError::Internal(format!("Schema error: {}", err))
    }
}

impl From<StaleGeneration> for AppError {
    fn from(err: StaleGeneration) -> Self {
        AppError::Conflict(format!("Superseded by a newer request: {}", err))
    }
}

impl From<GeneratorError> for AppError {
    fn from(err: GeneratorError) -> Self {
        AppError::Upstream(format!("Text generation failed: {}", err))
    }
}
