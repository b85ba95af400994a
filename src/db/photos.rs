//! Photo rows: bulk replacement during scans, reads for the browse views,
//! and the user-editable text fields.

use anyhow::Result;
use chrono::NaiveDateTime;
use rusqlite::{params, OptionalExtension};
use serde::Serialize;

use super::{format_timestamp, parse_timestamp, Database};
use crate::error::CatalogError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Photo {
    pub id: i64,
    pub album_id: i64,
    pub file_path: String,
    pub filename: String,
    pub day_label: Option<String>,
    pub user_title: Option<String>,
    pub user_description: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub gps_lat: Option<f64>,
    pub gps_lon: Option<f64>,
}

/// A photo produced by the scanner, not yet stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPhoto {
    pub file_path: String,
    pub filename: String,
    pub day_label: Option<String>,
    pub user_title: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub gps_lat: Option<f64>,
    pub gps_lon: Option<f64>,
}

/// Partial update of the editable fields. The outer `None` leaves a field
/// alone; `Some(None)` or `Some(Some(""))` clears it.
#[derive(Debug, Clone, Default)]
pub struct PhotoTextUpdate {
    pub user_title: Option<Option<String>>,
    pub user_description: Option<Option<String>>,
}

const PHOTO_COLUMNS: &str = "id, album_id, file_path, filename, day_label, user_title, \
                             user_description, created_at, gps_lat, gps_lon";

fn row_to_photo(row: &rusqlite::Row) -> rusqlite::Result<Photo> {
    Ok(Photo {
        id: row.get(0)?,
        album_id: row.get(1)?,
        file_path: row.get(2)?,
        filename: row.get(3)?,
        day_label: row.get(4)?,
        user_title: row.get(5)?,
        user_description: row.get(6)?,
        created_at: parse_timestamp(row.get(7)?),
        gps_lat: row.get(8)?,
        gps_lon: row.get(9)?,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

impl Database {
    /// Drop every photo of the album and insert `photos` in their place.
    /// Runs in one transaction so readers never see a half-replaced album.
    pub fn replace_album_photos(&mut self, album_id: i64, photos: &[NewPhoto]) -> Result<usize> {
        let tx = self.conn.transaction()?;

        let removed = tx.execute("DELETE FROM photos WHERE album_id = ?", [album_id])?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO photos (
                    album_id, file_path, filename, day_label, user_title,
                    created_at, gps_lat, gps_lon
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )?;
            for photo in photos {
                stmt.execute(params![
                    album_id,
                    photo.file_path,
                    photo.filename,
                    photo.day_label,
                    photo.user_title,
                    photo.created_at.as_ref().map(format_timestamp),
                    photo.gps_lat,
                    photo.gps_lon,
                ])?;
            }
        }
        tx.commit()?;

        tracing::debug!(album_id, removed, inserted = photos.len(), "Album photos replaced");
        Ok(photos.len())
    }

    pub fn get_photo(&self, photo_id: i64) -> Result<Option<Photo>> {
        let photo = self
            .conn
            .query_row(
                &format!("SELECT {PHOTO_COLUMNS} FROM photos WHERE id = ?"),
                [photo_id],
                row_to_photo,
            )
            .optional()?;
        Ok(photo)
    }

    pub fn require_photo(&self, photo_id: i64) -> Result<Photo> {
        self.get_photo(photo_id)?
            .ok_or_else(|| CatalogError::photo_not_found(photo_id).into())
    }

    /// Photos of an album in viewing order, optionally limited to one day
    /// label. Photos without a capture time come first.
    pub fn list_album_photos(&self, album_id: i64, day_label: Option<&str>) -> Result<Vec<Photo>> {
        let photos = match day_label {
            Some(day) => {
                let mut stmt = self.conn.prepare(&format!(
                    "SELECT {PHOTO_COLUMNS} FROM photos WHERE album_id = ? AND day_label = ? \
                     ORDER BY created_at ASC, id ASC"
                ))?;
                let rows = stmt
                    .query_map(params![album_id, day], row_to_photo)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                rows
            }
            None => {
                let mut stmt = self.conn.prepare(&format!(
                    "SELECT {PHOTO_COLUMNS} FROM photos WHERE album_id = ? \
                     ORDER BY created_at ASC, id ASC"
                ))?;
                let rows = stmt
                    .query_map([album_id], row_to_photo)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                rows
            }
        };
        Ok(photos)
    }

    /// Distinct day labels of an album in ascending order.
    pub fn list_day_labels(&self, album_id: i64) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT day_label FROM photos \
             WHERE album_id = ? AND day_label IS NOT NULL AND day_label != '' \
             ORDER BY day_label ASC",
        )?;
        let labels = stmt
            .query_map([album_id], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(labels)
    }

    pub fn update_photo_text(&self, photo_id: i64, update: PhotoTextUpdate) -> Result<Photo> {
        let mut photo = self.require_photo(photo_id)?;

        if let Some(title) = update.user_title {
            photo.user_title = non_empty(title);
        }
        if let Some(description) = update.user_description {
            photo.user_description = non_empty(description);
        }

        self.conn.execute(
            "UPDATE photos SET user_title = ?, user_description = ? WHERE id = ?",
            params![photo.user_title, photo.user_description, photo_id],
        )?;
        Ok(photo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::memory_db;

    fn photo(name: &str, day: Option<&str>, taken: Option<&str>) -> NewPhoto {
        NewPhoto {
            file_path: format!("/trip/{name}"),
            filename: name.to_string(),
            day_label: day.map(str::to_string),
            user_title: Some(name.trim_end_matches(".jpg").to_string()),
            created_at: taken.map(|t| NaiveDateTime::parse_from_str(t, "%Y-%m-%dT%H:%M:%S").unwrap()),
            gps_lat: Some(48.5),
            gps_lon: Some(-3.25),
        }
    }

    #[test]
    fn test_replace_is_full_replace() {
        let mut db = memory_db();
        let album = db.upsert_album("trip", "/trip").unwrap();

        db.replace_album_photos(album.id, &[photo("a.jpg", None, None), photo("b.jpg", None, None)])
            .unwrap();
        db.replace_album_photos(album.id, &[photo("c.jpg", None, None)]).unwrap();

        let photos = db.list_album_photos(album.id, None).unwrap();
        assert_eq!(photos.len(), 1);
        assert_eq!(photos[0].filename, "c.jpg");
        assert_eq!(photos[0].gps_lat, Some(48.5));
        assert_eq!(photos[0].user_title.as_deref(), Some("c"));
    }

    #[test]
    fn test_replace_leaves_other_albums_alone() {
        let mut db = memory_db();
        let a = db.upsert_album("a", "/a").unwrap();
        let b = db.upsert_album("b", "/b").unwrap();
        db.replace_album_photos(a.id, &[photo("a.jpg", None, None)]).unwrap();
        db.replace_album_photos(b.id, &[photo("b.jpg", None, None)]).unwrap();
        db.replace_album_photos(a.id, &[]).unwrap();

        assert_eq!(db.count_photos(a.id).unwrap(), 0);
        assert_eq!(db.count_photos(b.id).unwrap(), 1);
    }

    #[test]
    fn test_ordering_and_day_filter() {
        let mut db = memory_db();
        let album = db.upsert_album("trip", "/trip").unwrap();
        db.replace_album_photos(
            album.id,
            &[
                photo("3.jpg", Some("day2"), Some("2024-05-02T09:00:00")),
                photo("2.jpg", Some("day1"), Some("2024-05-01T12:00:00")),
                photo("1.jpg", Some("day1"), Some("2024-05-01T08:00:00")),
                photo("0.jpg", None, None),
            ],
        )
        .unwrap();

        let all: Vec<_> = db
            .list_album_photos(album.id, None)
            .unwrap()
            .into_iter()
            .map(|p| p.filename)
            .collect();
        assert_eq!(all, vec!["0.jpg", "1.jpg", "2.jpg", "3.jpg"]);

        let day1: Vec<_> = db
            .list_album_photos(album.id, Some("day1"))
            .unwrap()
            .into_iter()
            .map(|p| p.filename)
            .collect();
        assert_eq!(day1, vec!["1.jpg", "2.jpg"]);

        assert_eq!(db.list_day_labels(album.id).unwrap(), vec!["day1", "day2"]);
    }

    #[test]
    fn test_update_photo_text() {
        let mut db = memory_db();
        let album = db.upsert_album("trip", "/trip").unwrap();
        db.replace_album_photos(album.id, &[photo("a.jpg", None, None)]).unwrap();
        let id = db.earliest_photo_id(album.id).unwrap().unwrap();

        let updated = db
            .update_photo_text(
                id,
                PhotoTextUpdate {
                    user_title: None,
                    user_description: Some(Some("Sunset".to_string())),
                },
            )
            .unwrap();
        assert_eq!(updated.user_title.as_deref(), Some("a"));
        assert_eq!(updated.user_description.as_deref(), Some("Sunset"));

        let cleared = db
            .update_photo_text(
                id,
                PhotoTextUpdate {
                    user_title: Some(Some(String::new())),
                    user_description: Some(None),
                },
            )
            .unwrap();
        assert_eq!(cleared.user_title, None);
        assert_eq!(cleared.user_description, None);
        assert_eq!(db.require_photo(id).unwrap(), cleared);
    }

    #[test]
    fn test_update_missing_photo() {
        let db = memory_db();
        let err = db
            .update_photo_text(7, PhotoTextUpdate::default())
            .unwrap_err()
            .downcast::<CatalogError>()
            .unwrap();
        assert!(matches!(err, CatalogError::NotFound { entity: "Photo", id: 7 }));
    }
}
