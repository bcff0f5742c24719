//! JSON error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bs_app::{AppError, ErrorCode};
use serde::Serialize;
use uuid::Uuid;

/// Error body: `{ success: false, error, code, request_id }`.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub success: bool,
    pub error: String,
    pub code: ErrorCode,
    pub request_id: Uuid,
}

impl ApiError {
    pub fn new(status: StatusCode, code: ErrorCode, error: impl Into<String>, request_id: Uuid) -> Self {
        Self {
            status,
            success: false,
            error: error.into(),
            code,
            request_id,
        }
    }

    pub fn bad_request(error: impl Into<String>, request_id: Uuid) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ErrorCode::InvalidInput, error, request_id)
    }

    /// Log the full error under `request_id` and keep only the sanitized
    /// message for the client.
    pub fn from_app(err: AppError, request_id: Uuid) -> Self {
        let status =
            StatusCode::from_u16(err.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(
                %request_id,
                code = err.code().as_str(),
                error = %err,
                diagnostic = err.diagnostic().unwrap_or_default(),
                "request failed"
            );
        } else {
            tracing::warn!(%request_id, code = err.code().as_str(), error = %err, "request rejected");
        }
        Self::new(status, err.code(), err.public_message(), request_id)
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self::from_app(err, Uuid::new_v4())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
