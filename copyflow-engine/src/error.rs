//! API error mapping

use crate::parser::ParseError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use copyflow_common::Error;
use serde_json::json;
use thiserror::Error as ThisError;

/// API error type
#[derive(Debug, ThisError)]
pub enum ApiError {
    /// Malformed request (bad uuid, bad body shape)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Content file parsing failure
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Engine error
    #[error(transparent)]
    Common(#[from] Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),

            ApiError::Parse(err) => {
                let (status, code) = match err {
                    ParseError::UnsupportedFormat(_) => {
                        (StatusCode::UNSUPPORTED_MEDIA_TYPE, "UNSUPPORTED_FORMAT")
                    }
                    ParseError::FileTooLarge { .. } => {
                        (StatusCode::PAYLOAD_TOO_LARGE, "FILE_TOO_LARGE")
                    }
                    ParseError::MissingDataRow => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "MISSING_DATA_ROW")
                    }
                    ParseError::Spreadsheet(_) => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_SPREADSHEET")
                    }
                };
                (status, code, err.to_string())
            }

            ApiError::Common(err) => match err {
                Error::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
                Error::NotAuthenticated => (
                    StatusCode::UNAUTHORIZED,
                    "NOT_AUTHENTICATED",
                    err.to_string(),
                ),
                Error::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string()),
                // Transient: the client should re-read the latest version and retry
                Error::VersionConflict { .. } => (
                    StatusCode::CONFLICT,
                    "VERSION_CONFLICT",
                    format!("{err}; re-read the latest version and retry"),
                ),
                Error::Database(_) | Error::Io(_) | Error::Config(_) | Error::Internal(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    err.to_string(),
                ),
            },
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
