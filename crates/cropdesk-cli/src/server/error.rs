//! API error types and handling.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

/// Body returned when an image file is not on disk.
pub const FILE_NOT_FOUND: &str = "File not found";

/// Body returned when a filename has no metadata record.
pub const UNKNOWN_IMAGE: &str = "Unknown image";

/// API error type. Every variant renders as a plain-text body.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from client.
    BadRequest(String),
    /// Error from the cropdesk library (persistence or I/O).
    Cropdesk(cropdesk::CropdeskError),
}

impl ApiError {
    pub fn file_not_found() -> Self {
        ApiError::NotFound(FILE_NOT_FOUND.to_string())
    }

    pub fn unknown_image() -> Self {
        ApiError::NotFound(UNKNOWN_IMAGE.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Cropdesk(e) => {
                error!(error = %e, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        };

        (status, message).into_response()
    }
}

impl From<cropdesk::CropdeskError> for ApiError {
    fn from(err: cropdesk::CropdeskError) -> Self {
        ApiError::Cropdesk(err)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Cropdesk(e) => write!(f, "Cropdesk error: {}", e),
        }
    }
}

impl std::error::Error for ApiError {}
