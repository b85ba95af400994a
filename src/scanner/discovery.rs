use anyhow::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::CatalogError;

/// An image file found under an album root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredImage {
    pub path: PathBuf,
    /// Parent directory relative to the album root, `/`-separated.
    /// `None` for files directly in the root.
    pub day_label: Option<String>,
}

pub fn is_image(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .map(|ext| extensions.iter().any(|e| e.to_lowercase() == ext))
        .unwrap_or(false)
}

fn day_label_for(root: &Path, path: &Path) -> Option<String> {
    let relative = path.parent()?.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Walk `root` and return every image in album order: files of the root
/// first, then each subdirectory in path order, files sorted by name within
/// a directory.
pub fn discover_images(root: &Path, extensions: &[String]) -> Result<Vec<DiscoveredImage>> {
    if !root.is_dir() {
        return Err(CatalogError::DirectoryNotFound(root.to_path_buf()).into());
    }

    let mut found: Vec<(PathBuf, DiscoveredImage)> = Vec::new();

    for entry in WalkDir::new(root).min_depth(1).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable entry");
                continue;
            }
        };

        let path = entry.path();
        if !path.is_file() || !is_image(path, extensions) {
            continue;
        }

        let parent = path
            .parent()
            .and_then(|p| p.strip_prefix(root).ok())
            .map(Path::to_path_buf)
            .unwrap_or_default();

        found.push((
            parent,
            DiscoveredImage {
                path: path.to_path_buf(),
                day_label: day_label_for(root, path),
            },
        ));
    }

    found.sort_by(|(dir_a, a), (dir_b, b)| {
        dir_a
            .cmp(dir_b)
            .then_with(|| a.path.file_name().cmp(&b.path.file_name()))
    });

    Ok(found.into_iter().map(|(_, image)| image).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::tempdir;

    fn extensions() -> Vec<String> {
        vec!["jpg".to_string(), "jpeg".to_string(), "png".to_string()]
    }

    #[test]
    fn test_is_image_ignores_case() {
        let exts = extensions();
        assert!(is_image(Path::new("a/IMG_0001.JPG"), &exts));
        assert!(is_image(Path::new("b.Png"), &exts));
        assert!(!is_image(Path::new("notes.txt"), &exts));
        assert!(!is_image(Path::new("jpg"), &exts));
    }

    #[test]
    fn test_discover_assigns_day_labels_in_album_order() {
        let dir = tempdir().unwrap();
        let root = dir.path();

        File::create(root.join("b.jpg")).unwrap();
        File::create(root.join("a.PNG")).unwrap();
        File::create(root.join("readme.txt")).unwrap();
        fs::create_dir_all(root.join("2024-05-02")).unwrap();
        fs::create_dir_all(root.join("2024-05-01/evening")).unwrap();
        File::create(root.join("2024-05-02/x.jpeg")).unwrap();
        File::create(root.join("2024-05-01/z.jpg")).unwrap();
        File::create(root.join("2024-05-01/y.jpg")).unwrap();
        File::create(root.join("2024-05-01/evening/w.jpg")).unwrap();

        let images = discover_images(root, &extensions()).unwrap();
        let summary: Vec<(String, Option<String>)> = images
            .iter()
            .map(|i| {
                (
                    i.path.file_name().unwrap().to_string_lossy().into_owned(),
                    i.day_label.clone(),
                )
            })
            .collect();

        assert_eq!(
            summary,
            vec![
                ("a.PNG".to_string(), None),
                ("b.jpg".to_string(), None),
                ("y.jpg".to_string(), Some("2024-05-01".to_string())),
                ("z.jpg".to_string(), Some("2024-05-01".to_string())),
                ("w.jpg".to_string(), Some("2024-05-01/evening".to_string())),
                ("x.jpeg".to_string(), Some("2024-05-02".to_string())),
            ]
        );
    }

    #[test]
    fn test_discover_missing_root() {
        let dir = tempdir().unwrap();
        let err = discover_images(&dir.path().join("absent"), &extensions()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CatalogError>(),
            Some(CatalogError::DirectoryNotFound(_))
        ));
    }
}
