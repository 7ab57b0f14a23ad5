//! Error types for the mobile shop server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::validation::ValidationError;

/// Error codes exposed in the `error` member of error envelopes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    MissingField,
    InvalidFormat,
    InvalidValue,
    InvalidDate,
    BadId,
    NotFound,
    Conflict,
    UploadFailed,
    MissingAssetData,
    StoreError,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "MissingField",
            ErrorCode::InvalidFormat => "InvalidFormat",
            ErrorCode::InvalidValue => "InvalidValue",
            ErrorCode::InvalidDate => "InvalidDate",
            ErrorCode::BadId => "BadId",
            ErrorCode::NotFound => "NotFound",
            ErrorCode::Conflict => "Conflict",
            ErrorCode::UploadFailed => "UploadFailed",
            ErrorCode::MissingAssetData => "MissingAssetData",
            ErrorCode::StoreError => "StoreError",
        }
    }
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Bad id: {0}")]
    BadId(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Missing asset data: {0}")]
    MissingAssetData(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation(e) => match e {
                ValidationError::MissingField { .. } => ErrorCode::MissingField,
                ValidationError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
                ValidationError::InvalidValue { .. } => ErrorCode::InvalidValue,
                ValidationError::InvalidDate { .. } => ErrorCode::InvalidDate,
            },
            AppError::BadId(_) => ErrorCode::BadId,
            AppError::NotFound(_) => ErrorCode::NotFound,
            AppError::Conflict(_) => ErrorCode::Conflict,
            AppError::UploadFailed(_) => ErrorCode::UploadFailed,
            AppError::MissingAssetData(_) => ErrorCode::MissingAssetData,
            AppError::Database(_) | AppError::Internal(_) => ErrorCode::StoreError,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadId(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::UploadFailed(_)
            | AppError::MissingAssetData(_)
            | AppError::Database(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Always "Error"
    pub status: &'static str,
    pub message: String,
    /// Always null
    #[schema(value_type = Option<Object>)]
    pub data: Option<()>,
    /// Machine-readable error code
    pub error: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        // Store and upload failures keep their raw message for the client.
        let message = match &self {
            AppError::Validation(e) => e.to_string(),
            AppError::BadId(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::UploadFailed(msg)
            | AppError::MissingAssetData(msg)
            | AppError::Internal(msg) => msg.clone(),
            AppError::Database(e) => e.to_string(),
        };

        if status.is_server_error() {
            tracing::error!(code = code.as_str(), "{}", message);
        }

        let body = Json(ErrorResponse {
            status: "Error",
            message,
            data: None,
            error: code.as_str(),
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let missing: AppError = ValidationError::missing("name").into();
        assert_eq!(missing.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(missing.code(), ErrorCode::MissingField);

        assert_eq!(AppError::BadId("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Conflict("x".into()).status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::MissingAssetData("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Database(sqlx::Error::RowNotFound).code(),
            ErrorCode::StoreError
        );
    }
}
