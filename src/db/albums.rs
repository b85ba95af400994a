//! Album rows and the queries that operate on them.

use anyhow::Result;
use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, ErrorCode, OptionalExtension};
use serde::Serialize;

use super::{format_timestamp, parse_timestamp, Database};
use crate::error::CatalogError;

/// An album: the catalog entry for one scanned source directory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Album {
    pub id: i64,
    pub name: String,
    pub path: String,
    /// UTC time the album was first created.
    pub created_at: Option<NaiveDateTime>,
    pub archived: bool,
    pub thumbnail_photo_id: Option<i64>,
}

const ALBUM_COLUMNS: &str = "id, name, path, created_at, archived, thumbnail_photo_id";

fn row_to_album(row: &rusqlite::Row) -> rusqlite::Result<Album> {
    Ok(Album {
        id: row.get(0)?,
        name: row.get(1)?,
        path: row.get(2)?,
        created_at: parse_timestamp(row.get(3)?),
        archived: row.get(4)?,
        thumbnail_photo_id: row.get(5)?,
    })
}

impl Database {
    pub fn get_album(&self, album_id: i64) -> Result<Option<Album>> {
        let album = self
            .conn
            .query_row(
                &format!("SELECT {ALBUM_COLUMNS} FROM albums WHERE id = ?"),
                [album_id],
                row_to_album,
            )
            .optional()?;
        Ok(album)
    }

    /// Like [`get_album`](Self::get_album) but a missing row is an error.
    pub fn require_album(&self, album_id: i64) -> Result<Album> {
        self.get_album(album_id)?
            .ok_or_else(|| CatalogError::album_not_found(album_id).into())
    }

    pub fn find_album_by_name(&self, name: &str) -> Result<Option<Album>> {
        let album = self
            .conn
            .query_row(
                &format!("SELECT {ALBUM_COLUMNS} FROM albums WHERE name = ?"),
                [name],
                row_to_album,
            )
            .optional()?;
        Ok(album)
    }

    /// Create the album, or point an existing album of the same name at
    /// `path` and bring it back from the archive.
    pub fn upsert_album(&self, name: &str, path: &str) -> Result<Album> {
        if let Some(existing) = self.find_album_by_name(name)? {
            self.conn.execute(
                "UPDATE albums SET path = ?, archived = 0 WHERE id = ?",
                params![path, existing.id],
            )?;
            return self.require_album(existing.id);
        }

        let created_at = format_timestamp(&Utc::now().naive_utc());
        self.conn.execute(
            "INSERT INTO albums (name, path, created_at, archived) VALUES (?, ?, ?, 0)",
            params![name, path, created_at],
        )?;
        self.require_album(self.conn.last_insert_rowid())
    }

    /// Non-archived albums, most recently created first.
    pub fn list_active_albums(&self) -> Result<Vec<Album>> {
        self.query_albums(&format!(
            "SELECT {ALBUM_COLUMNS} FROM albums WHERE archived = 0 ORDER BY created_at DESC, id DESC"
        ))
    }

    /// Non-archived albums in name order, for navigation.
    pub fn list_active_albums_by_name(&self) -> Result<Vec<Album>> {
        self.query_albums(&format!(
            "SELECT {ALBUM_COLUMNS} FROM albums WHERE archived = 0 ORDER BY name ASC"
        ))
    }

    fn query_albums(&self, sql: &str) -> Result<Vec<Album>> {
        let mut stmt = self.conn.prepare(sql)?;
        let albums = stmt
            .query_map([], row_to_album)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(albums)
    }

    pub fn archive_album(&self, album_id: i64) -> Result<()> {
        let updated = self
            .conn
            .execute("UPDATE albums SET archived = 1 WHERE id = ?", [album_id])?;
        if updated == 0 {
            return Err(CatalogError::album_not_found(album_id).into());
        }
        Ok(())
    }

    /// Hard delete. Photos go with the album through the cascading key.
    pub fn delete_album(&self, album_id: i64) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM albums WHERE id = ?", [album_id])?;
        if deleted == 0 {
            return Err(CatalogError::album_not_found(album_id).into());
        }
        Ok(())
    }

    pub fn rename_album(&self, album_id: i64, new_name: &str) -> Result<Album> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(CatalogError::Validation("Name required".to_string()).into());
        }

        let album = self.require_album(album_id)?;

        match self.conn.execute(
            "UPDATE albums SET name = ? WHERE id = ?",
            params![new_name, album_id],
        ) {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                return Err(CatalogError::Conflict("Album name already exists".to_string()).into());
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!(album_id, old = %album.name, new = %new_name, "Album renamed");
        self.require_album(album_id)
    }

    pub fn set_album_thumbnail(&self, album_id: i64, photo_id: i64) -> Result<()> {
        self.require_album(album_id)?;
        let photo = self
            .get_photo(photo_id)?
            .ok_or(CatalogError::photo_not_found(photo_id))?;
        if photo.album_id != album_id {
            return Err(
                CatalogError::Validation("Photo does not belong to this album".to_string()).into(),
            );
        }

        self.conn.execute(
            "UPDATE albums SET thumbnail_photo_id = ? WHERE id = ?",
            params![photo_id, album_id],
        )?;
        Ok(())
    }

    /// Point an album without a thumbnail at its earliest photo.
    /// Returns the thumbnail in effect afterwards.
    pub fn assign_default_thumbnail(&self, album_id: i64) -> Result<Option<i64>> {
        let album = self.require_album(album_id)?;
        if album.thumbnail_photo_id.is_some() {
            return Ok(album.thumbnail_photo_id);
        }

        let earliest = self.earliest_photo_id(album_id)?;
        if let Some(photo_id) = earliest {
            self.conn.execute(
                "UPDATE albums SET thumbnail_photo_id = ? WHERE id = ?",
                params![photo_id, album_id],
            )?;
        }
        Ok(earliest)
    }

    /// The photo shown on the album card: the chosen thumbnail, else the
    /// earliest photo.
    pub fn cover_photo_id(&self, album: &Album) -> Result<Option<i64>> {
        match album.thumbnail_photo_id {
            Some(id) => Ok(Some(id)),
            None => self.earliest_photo_id(album.id),
        }
    }

    pub fn earliest_photo_id(&self, album_id: i64) -> Result<Option<i64>> {
        let id = self
            .conn
            .query_row(
                "SELECT id FROM photos WHERE album_id = ? ORDER BY created_at ASC, id ASC LIMIT 1",
                [album_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    pub fn count_photos(&self, album_id: i64) -> Result<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM photos WHERE album_id = ?",
            [album_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
