pub mod discovery;
pub mod metadata;

use anyhow::{anyhow, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::MutexGuard;

use crate::config::ScannerConfig;
use crate::db::{Database, NewPhoto, SharedDb};
use crate::error::CatalogError;

pub use discovery::{discover_images, DiscoveredImage};
pub use metadata::{extract_capture_metadata, CaptureMetadata};

#[derive(Debug, Clone, PartialEq)]
pub enum ScanProgress {
    Started { total_files: usize },
    Scanning { current: usize, total: usize, path: String },
    Completed { scanned: usize },
}

/// Outcome of importing one directory as an album.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportSummary {
    pub album_id: i64,
    pub album_name: String,
    pub photos_scanned: usize,
}

pub struct Scanner {
    extensions: Vec<String>,
}

impl Scanner {
    pub fn new(config: &ScannerConfig) -> Self {
        Self {
            extensions: config.image_extensions.clone(),
        }
    }

    /// Discover the images under `directory` and read their capture
    /// metadata. Touches no database, so callers can run it without
    /// holding the catalog lock.
    pub fn collect(
        &self,
        directory: &Path,
        progress: &mut dyn FnMut(ScanProgress),
    ) -> Result<Vec<NewPhoto>> {
        let images = discover_images(directory, &self.extensions)?;

        let total = images.len();
        progress(ScanProgress::Started { total_files: total });

        let mut photos = Vec::with_capacity(total);
        for (index, image) in images.into_iter().enumerate() {
            progress(ScanProgress::Scanning {
                current: index + 1,
                total,
                path: image.path.to_string_lossy().to_string(),
            });
            photos.push(self.scan_single_file(image));
        }

        progress(ScanProgress::Completed {
            scanned: photos.len(),
        });
        Ok(photos)
    }

    fn scan_single_file(&self, image: DiscoveredImage) -> NewPhoto {
        let capture = extract_capture_metadata(&image.path);
        let taken_at = capture
            .taken_at
            .or_else(|| metadata::file_modified_time(&image.path));

        let filename = image
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let title = image
            .path
            .file_stem()
            .map(|n| n.to_string_lossy().to_string());
        let file_path = std::fs::canonicalize(&image.path).unwrap_or(image.path);

        NewPhoto {
            file_path: file_path.to_string_lossy().to_string(),
            filename,
            day_label: image.day_label,
            user_title: title,
            created_at: taken_at,
            gps_lat: capture.gps_latitude,
            gps_lon: capture.gps_longitude,
        }
    }
}

/// Normalize a user-supplied directory path: trim whitespace and the quotes
/// a copied path often carries, then require an existing directory.
pub fn validate_album_dir(raw: &str) -> Result<PathBuf, CatalogError> {
    let trimmed = raw.trim().trim_matches('"');
    if trimmed.is_empty() {
        return Err(CatalogError::Validation("Path is required".to_string()));
    }

    let path = PathBuf::from(trimmed);
    if !path.is_dir() {
        return Err(CatalogError::DirectoryNotFound(path));
    }
    Ok(path)
}

pub(crate) fn lock(db: &SharedDb) -> Result<MutexGuard<'_, Database>> {
    db.lock().map_err(|_| anyhow!("Catalog lock poisoned"))
}

/// Import `directory` as an album, replacing whatever the album held before.
///
/// The album is named after the directory. An existing album of that name
/// is re-pointed at the directory and unarchived. The walk and EXIF reads
/// happen without the catalog lock; the replacement itself is one
/// transaction.
pub fn import_album(
    db: &SharedDb,
    scanner: &Scanner,
    directory: &Path,
    progress: &mut dyn FnMut(ScanProgress),
) -> Result<ImportSummary> {
    let resolved = std::fs::canonicalize(directory)
        .map_err(|_| CatalogError::DirectoryNotFound(directory.to_path_buf()))?;
    let album_name = resolved
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| resolved.to_string_lossy().to_string());

    let album = lock(db)?.upsert_album(&album_name, &resolved.to_string_lossy())?;
    tracing::info!(album_id = album.id, path = %resolved.display(), "Scanning album");

    let photos = scanner.collect(&resolved, progress)?;

    let photos_scanned = {
        let mut db = lock(db)?;
        let count = db.replace_album_photos(album.id, &photos)?;
        db.assign_default_thumbnail(album.id)?;
        count
    };

    tracing::info!(album_id = album.id, photos = photos_scanned, "Scan finished");
    Ok(ImportSummary {
        album_id: album.id,
        album_name: album.name,
        photos_scanned,
    })
}
