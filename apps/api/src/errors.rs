use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::backup::BackupError;
use crate::models::resume::SectionKey;
use crate::store::StoreError;
use crate::transfer::TransferError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Import rejected: {}", .0.join("; "))]
    ImportRejected(Vec<String>),

    #[error("Section mismatch: expected '{expected}', got '{found}'")]
    SectionMismatch {
        expected: SectionKey,
        found: SectionKey,
    },

    #[error("Backup rejected: {0}")]
    Backup(#[from] BackupError),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<TransferError> for AppError {
    fn from(err: TransferError) -> Self {
        match err {
            TransferError::SectionMismatch { expected, found } => {
                AppError::SectionMismatch { expected, found }
            }
            TransferError::Invalid(errors) => AppError::ImportRejected(errors),
            TransferError::Malformed(e) => AppError::ImportRejected(vec![e.to_string()]),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(format!("Invalid JSON body: {}", rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut details = None;
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::ImportRejected(errors) => {
                details = Some(errors.clone());
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "INVALID_IMPORT",
                    format!("Import data failed validation ({} problem(s))", errors.len()),
                )
            }
            AppError::SectionMismatch { expected, found } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "SECTION_MISMATCH",
                format!("Expected a '{expected}' section but the document contains '{found}'"),
            ),
            AppError::Backup(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INVALID_BACKUP",
                e.to_string(),
            ),
            AppError::Storage(e) => {
                tracing::error!("Storage error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let Some(details) = details {
            error["details"] = json!(details);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
