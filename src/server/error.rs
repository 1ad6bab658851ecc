use crate::convert::ConvertError;
use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Errors a request handler can end in. Clients only ever see the short
/// message; the underlying cause is logged.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("File not provided.")]
    MissingFile,

    #[error("Failed to read upload.")]
    BadUpload(#[from] MultipartError),

    #[error("File conversion failed.")]
    Conversion(#[from] ConvertError),

    #[error("File conversion failed.")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingFile => StatusCode::BAD_REQUEST,
            // 400 for malformed bodies, 413 past the upload limit
            AppError::BadUpload(e) => e.status(),
            AppError::Conversion(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::MissingFile => tracing::debug!("upload without a file field"),
            AppError::BadUpload(e) => tracing::warn!("failed to read multipart upload: {}", e),
            AppError::Conversion(e) => tracing::error!("conversion failed: {}", e),
            AppError::Internal(msg) => tracing::error!("internal error: {}", msg),
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (self.status_code(), body).into_response()
    }
}
