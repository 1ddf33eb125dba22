use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::core::models::UploadRejection;
use crate::global_constants::{ERROR_NOT_FOUND, ERROR_UPLOAD_FAILED};

/// Every failure a handler can answer with, rendered as `{"error": reason}`.
#[derive(Debug)]
pub enum ApiError {
    Rejected(UploadRejection),
    BadRequest(String),
    MalformedMultipart(MultipartError),
    NotFound,
    UploadFailed,
    Internal(String),
}

impl ApiError {
    fn status_and_reason(self) -> (StatusCode, String) {
        match self {
            ApiError::Rejected(rejection) => (StatusCode::BAD_REQUEST, rejection.reason().to_string()),
            ApiError::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason),
            ApiError::MalformedMultipart(error) => (error.status(), error.body_text()),
            ApiError::NotFound => (StatusCode::NOT_FOUND, ERROR_NOT_FOUND.to_string()),
            ApiError::UploadFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ERROR_UPLOAD_FAILED.to_string(),
            ),
            ApiError::Internal(reason) => (StatusCode::INTERNAL_SERVER_ERROR, reason),
        }
    }
}

impl From<UploadRejection> for ApiError {
    fn from(rejection: UploadRejection) -> Self {
        ApiError::Rejected(rejection)
    }
}

impl From<MultipartError> for ApiError {
    fn from(error: MultipartError) -> Self {
        ApiError::MalformedMultipart(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, reason) = self.status_and_reason();
        (status, Json(json!({ "error": reason }))).into_response()
    }
}
