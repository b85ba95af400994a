//! Domain errors shared by the catalog, the scanner and the HTTP layer.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
}

impl CatalogError {
    pub fn album_not_found(id: i64) -> Self {
        CatalogError::NotFound { entity: "Album", id }
    }

    pub fn photo_not_found(id: i64) -> Self {
        CatalogError::NotFound { entity: "Photo", id }
    }
}
