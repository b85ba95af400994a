use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::error::CatalogError;

/// Error type for HTTP handlers.
///
/// Domain failures arrive as [`CatalogError`], either directly or inside an
/// `anyhow::Error` from the catalog; anything else is an internal error.
/// Every variant renders as `{"error": message, "code": CODE}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Internal(anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<CatalogError>() {
            Ok(catalog) => AppError::Catalog(catalog),
            Err(other) => AppError::Internal(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Catalog(catalog) => match catalog {
                CatalogError::NotFound { .. } => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", catalog.to_string())
                }
                CatalogError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CatalogError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CatalogError::DirectoryNotFound(_) => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    "Directory not found".to_string(),
                ),
                CatalogError::NotADirectory(_) => (
                    StatusCode::BAD_REQUEST,
                    "BAD_REQUEST",
                    "Not a directory".to_string(),
                ),
            },
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Internal(err) => {
                tracing::error!(error = ?err, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use std::path::PathBuf;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_catalog_errors_map_to_statuses() {
        assert_eq!(
            status_of(CatalogError::album_not_found(3).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(CatalogError::Validation("Name required".into()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(CatalogError::Conflict("taken".into()).into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(CatalogError::DirectoryNotFound(PathBuf::from("/x")).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(CatalogError::NotADirectory(PathBuf::from("/x")).into()),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_anyhow_downcasts_through_context() {
        let err = anyhow::Error::from(CatalogError::photo_not_found(9)).context("loading photo");
        assert!(matches!(
            AppError::from(err),
            AppError::Catalog(CatalogError::NotFound { entity: "Photo", id: 9 })
        ));

        let other: anyhow::Result<()> = Err(anyhow::anyhow!("disk on fire")).context("scan");
        let err = AppError::from(other.unwrap_err());
        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(status_of(err), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
