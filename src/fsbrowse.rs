//! Directory listing for the "pick a folder" dialog.

use serde::Serialize;
use std::path::{Path, PathBuf, MAIN_SEPARATOR_STR};

use crate::error::CatalogError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirEntry {
    pub name: String,
    pub path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    pub cwd: String,
    /// `None` at the filesystem root.
    pub parent: Option<String>,
    pub separator: String,
    /// Drive roots on Windows, empty elsewhere.
    pub drives: Vec<String>,
    pub dirs: Vec<DirEntry>,
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from(MAIN_SEPARATOR_STR))
}

fn expand_tilde(path: &str) -> PathBuf {
    match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with(['/', '\\']) => {
            home_dir().join(rest.trim_start_matches(['/', '\\']))
        }
        _ => PathBuf::from(path),
    }
}

/// Resolve the requested directory. Empty requests and paths that cannot be
/// resolved land in the home directory; an existing non-directory is an
/// error.
fn resolve(requested: Option<&str>) -> Result<PathBuf, CatalogError> {
    let requested = requested.map(str::trim).unwrap_or_default();
    if requested.is_empty() {
        return Ok(home_dir());
    }

    match std::fs::canonicalize(expand_tilde(requested)) {
        Ok(path) if path.is_dir() => Ok(path),
        Ok(path) => Err(CatalogError::NotADirectory(path)),
        Err(_) => Ok(home_dir()),
    }
}

#[cfg(windows)]
fn list_drives() -> Vec<String> {
    ('A'..='Z')
        .map(|letter| format!("{letter}:/"))
        .filter(|root| Path::new(root).exists())
        .collect()
}

#[cfg(not(windows))]
fn list_drives() -> Vec<String> {
    Vec::new()
}

/// Visible child directories sorted case-insensitively. Entries that cannot
/// be inspected are skipped.
pub fn child_dirs(path: &Path) -> Vec<DirEntry> {
    let read_dir = match std::fs::read_dir(path) {
        Ok(rd) => rd,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Cannot list directory");
            return Vec::new();
        }
    };

    let mut dirs: Vec<DirEntry> = read_dir
        .flatten()
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') {
                return None;
            }
            let resolved = std::fs::canonicalize(entry.path()).ok()?;
            Some(DirEntry {
                name,
                path: resolved.to_string_lossy().to_string(),
            })
        })
        .collect();

    dirs.sort_by_key(|d| d.name.to_lowercase());
    dirs
}

pub fn list(requested: Option<&str>) -> Result<Listing, CatalogError> {
    let cwd = resolve(requested)?;
    let parent = cwd.parent().map(|p| p.to_string_lossy().to_string());

    Ok(Listing {
        cwd: cwd.to_string_lossy().to_string(),
        parent,
        separator: MAIN_SEPARATOR_STR.to_string(),
        drives: list_drives(),
        dirs: child_dirs(&cwd),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::tempdir;

    #[test]
    fn test_lists_visible_dirs_sorted() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("beta")).unwrap();
        fs::create_dir(dir.path().join("Alpha")).unwrap();
        fs::create_dir(dir.path().join(".hidden")).unwrap();
        File::create(dir.path().join("file.jpg")).unwrap();

        let listing = list(Some(&dir.path().to_string_lossy())).unwrap();
        let names: Vec<_> = listing.dirs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "beta"]);

        let canonical = fs::canonicalize(dir.path()).unwrap();
        assert_eq!(listing.cwd, canonical.to_string_lossy());
        assert_eq!(
            listing.parent.as_deref(),
            canonical.parent().map(|p| p.to_string_lossy()).as_deref()
        );
        assert_eq!(listing.dirs[0].path, canonical.join("Alpha").to_string_lossy());
    }

    #[test]
    fn test_empty_and_unresolvable_fall_back_to_home() {
        let home = home_dir().to_string_lossy().to_string();
        assert_eq!(list(None).unwrap().cwd, home);
        assert_eq!(list(Some("   ")).unwrap().cwd, home);
        assert_eq!(list(Some("/definitely/not/here/at/all")).unwrap().cwd, home);
    }

    #[test]
    fn test_file_is_rejected() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.jpg");
        File::create(&file).unwrap();
        assert!(matches!(
            list(Some(&file.to_string_lossy())),
            Err(CatalogError::NotADirectory(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_root_has_no_parent() {
        let listing = list(Some("/")).unwrap();
        assert_eq!(listing.cwd, "/");
        assert_eq!(listing.parent, None);
        assert!(listing.drives.is_empty());
    }

    #[test]
    fn test_expand_tilde() {
        assert_eq!(expand_tilde("~"), home_dir());
        assert_eq!(expand_tilde("~/Pictures"), home_dir().join("Pictures"));
        assert_eq!(expand_tilde("/tmp/~x"), PathBuf::from("/tmp/~x"));
    }
}
