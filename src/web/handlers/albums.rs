//! Album endpoints: listing, scanning a directory in, housekeeping, and the
//! day-grouped browse views.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::browse::{group_by_day, DayGroup};
use crate::db::Album;
use crate::scanner::{import_album, validate_album_dir, ImportSummary};
use crate::tasks::TaskId;
use crate::web::error::{AppError, AppResult};
use crate::web::extract::JsonBody;
use crate::web::handlers::{with_db, OkResponse};
use crate::web::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct AddAlbumRequest {
    #[serde(default)]
    pub path: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct RemoveAlbumRequest {
    pub mode: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RenameAlbumRequest {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ThumbnailRequest {
    pub photo_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SidebarParams {
    pub album_id: Option<i64>,
    pub photo_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct AlbumCard {
    #[serde(flatten)]
    pub album: Album,
    pub cover_photo_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct Sidebar {
    pub albums: Vec<Album>,
    pub current_album: Option<Album>,
    pub days: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TaskCreated {
    pub task_id: TaskId,
}

/// Which of `archived` / `deleted` applies after a remove.
#[derive(Debug, Default, Serialize)]
pub struct Removal {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct AlbumMeta {
    pub id: i64,
    pub name: String,
    pub created_at: Option<NaiveDateTime>,
    pub photo_count: i64,
    pub path: String,
}

#[derive(Debug, Serialize)]
pub struct AlbumHome {
    pub album: Album,
    pub day_labels: Vec<String>,
    pub photo_count: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GridMode {
    All,
    Day,
}

#[derive(Debug, Serialize)]
pub struct AlbumGrid {
    pub album: Album,
    pub mode: GridMode,
    pub groups: Vec<DayGroup>,
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// GET /api/albums
///
/// Active albums, newest first, each with the photo to show on its card.
pub async fn list_albums(State(state): State<AppState>) -> AppResult<Json<Vec<AlbumCard>>> {
    let cards = with_db(&state, |db| {
        let cards = db
            .list_active_albums()?
            .into_iter()
            .map(|album| {
                let cover_photo_id = db.cover_photo_id(&album)?;
                Ok(AlbumCard {
                    album,
                    cover_photo_id,
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(cards)
    })
    .await?;
    Ok(Json(cards))
}

/// GET /api/sidebar?album_id=&photo_id=
///
/// Albums by name, plus the day labels of the album being viewed (given
/// directly or through one of its photos).
pub async fn sidebar(
    State(state): State<AppState>,
    Query(params): Query<SidebarParams>,
) -> AppResult<Json<Sidebar>> {
    let sidebar = with_db(&state, move |db| {
        let albums = db.list_active_albums_by_name()?;

        let album_id = match (params.album_id, params.photo_id) {
            (Some(id), _) => Some(id),
            (None, Some(photo_id)) => db.get_photo(photo_id)?.map(|p| p.album_id),
            (None, None) => None,
        };

        let current_album = match album_id {
            Some(id) => db.get_album(id)?,
            None => None,
        };
        let days = match &current_album {
            Some(album) => db.list_day_labels(album.id)?,
            None => Vec::new(),
        };

        Ok(Sidebar {
            albums,
            current_album,
            days,
        })
    })
    .await?;
    Ok(Json(sidebar))
}

// ---------------------------------------------------------------------------
// Scanning
// ---------------------------------------------------------------------------

/// POST /api/albums/add
///
/// Scan a directory into an album and wait for the result.
pub async fn add_album(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<AddAlbumRequest>,
) -> AppResult<Json<OkResponse<ImportSummary>>> {
    let directory = validate_album_dir(&input.path)?;
    tracing::info!(path = %directory.display(), "Scan requested");

    let db = Arc::clone(&state.db);
    let scanner = Arc::clone(&state.scanner);
    let summary =
        tokio::task::spawn_blocking(move || import_album(&db, &scanner, &directory, &mut |_| {}))
            .await
            .map_err(anyhow::Error::from)??;

    Ok(Json(OkResponse::new(summary)))
}

/// POST /api/albums/add_async
///
/// Queue a scan and return its task id for polling.
pub async fn add_album_async(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<AddAlbumRequest>,
) -> AppResult<Json<TaskCreated>> {
    let directory = validate_album_dir(&input.path)?;

    let db = Arc::clone(&state.db);
    let scanner = Arc::clone(&state.scanner);
    let task_id = state.tasks.submit(move |reporter| {
        tracing::info!(path = %directory.display(), "Scan task started");
        import_album(&db, &scanner, &directory, &mut |event| reporter.scan_progress(event))
    });

    tracing::info!(%task_id, tracked = state.tasks.count(), "Scan task queued");
    Ok(Json(TaskCreated { task_id }))
}

// ---------------------------------------------------------------------------
// Housekeeping
// ---------------------------------------------------------------------------

/// POST /api/albums/{id}/remove
///
/// `archive` (the default) hides the album; `delete` drops it and its photos.
pub async fn remove_album(
    State(state): State<AppState>,
    Path(album_id): Path<i64>,
    JsonBody(input): JsonBody<RemoveAlbumRequest>,
) -> AppResult<Json<OkResponse<Removal>>> {
    let mode = input
        .mode
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| "archive".to_string())
        .to_lowercase();
    tracing::info!(album_id, %mode, "Remove album");

    let removal = with_db(&state, move |db| {
        db.require_album(album_id)?;

        match mode.as_str() {
            "archive" => {
                db.archive_album(album_id)?;
                Ok(Removal {
                    archived: Some(true),
                    ..Removal::default()
                })
            }
            "delete" => {
                db.delete_album(album_id)?;
                Ok(Removal {
                    deleted: Some(true),
                    ..Removal::default()
                })
            }
            _ => Err(AppError::BadRequest(
                "Invalid mode. Use 'archive' or 'delete'.".to_string(),
            )),
        }
    })
    .await?;

    Ok(Json(OkResponse::new(removal)))
}

#[derive(Debug, Serialize)]
pub struct Renamed {
    pub album_id: i64,
    pub name: String,
}

/// PATCH|POST /api/albums/{id}/rename
pub async fn rename_album(
    State(state): State<AppState>,
    Path(album_id): Path<i64>,
    JsonBody(input): JsonBody<RenameAlbumRequest>,
) -> AppResult<Json<OkResponse<Renamed>>> {
    let album = with_db(&state, move |db| Ok(db.rename_album(album_id, &input.name)?)).await?;
    Ok(Json(OkResponse::new(Renamed {
        album_id: album.id,
        name: album.name,
    })))
}

#[derive(Debug, Serialize)]
pub struct ThumbnailSet {
    pub thumbnail_photo_id: i64,
}

/// PATCH /api/albums/{id}/thumbnail
pub async fn set_thumbnail(
    State(state): State<AppState>,
    Path(album_id): Path<i64>,
    JsonBody(input): JsonBody<ThumbnailRequest>,
) -> AppResult<Json<OkResponse<ThumbnailSet>>> {
    let photo_id = with_db(&state, move |db| {
        db.require_album(album_id)?;

        let photo_id = input
            .photo_id
            .filter(|id| *id != 0)
            .ok_or_else(|| AppError::BadRequest("photo_id required".to_string()))?;
        db.set_album_thumbnail(album_id, photo_id)?;
        Ok(photo_id)
    })
    .await?;
    tracing::info!(album_id, photo_id, "Album thumbnail set");

    Ok(Json(OkResponse::new(ThumbnailSet {
        thumbnail_photo_id: photo_id,
    })))
}

// ---------------------------------------------------------------------------
// Browse views
// ---------------------------------------------------------------------------

/// GET /api/albums/{id}/meta
pub async fn album_meta(
    State(state): State<AppState>,
    Path(album_id): Path<i64>,
) -> AppResult<Json<AlbumMeta>> {
    let meta = with_db(&state, move |db| {
        let album = db.require_album(album_id)?;
        let photo_count = db.count_photos(album.id)?;

        Ok(AlbumMeta {
            id: album.id,
            name: album.name,
            created_at: album.created_at,
            photo_count,
            path: album.path,
        })
    })
    .await?;
    Ok(Json(meta))
}

/// GET /api/albums/{id}
pub async fn album_home(
    State(state): State<AppState>,
    Path(album_id): Path<i64>,
) -> AppResult<Json<AlbumHome>> {
    let home = with_db(&state, move |db| {
        let album = db.require_album(album_id)?;
        let day_labels = db.list_day_labels(album.id)?;
        let photo_count = db.count_photos(album.id)?;

        Ok(AlbumHome {
            album,
            day_labels,
            photo_count,
        })
    })
    .await?;
    Ok(Json(home))
}

/// GET /api/albums/{id}/all
///
/// Every photo, grouped by day label or capture date.
pub async fn album_all(
    State(state): State<AppState>,
    Path(album_id): Path<i64>,
) -> AppResult<Json<AlbumGrid>> {
    let (album, photos) = with_db(&state, move |db| {
        let album = db.require_album(album_id)?;
        let photos = db.list_album_photos(album.id, None)?;
        Ok((album, photos))
    })
    .await?;

    Ok(Json(AlbumGrid {
        album,
        mode: GridMode::All,
        groups: group_by_day(photos),
    }))
}

/// GET /api/albums/{id}/day/{*label}
///
/// The photos of one day label as a single group. Labels may contain `/`.
pub async fn album_day(
    State(state): State<AppState>,
    Path((album_id, label)): Path<(i64, String)>,
) -> AppResult<Json<AlbumGrid>> {
    let (album, photos, label) = with_db(&state, move |db| {
        let album = db.require_album(album_id)?;
        let photos = db.list_album_photos(album.id, Some(&label))?;
        Ok((album, photos, label))
    })
    .await?;

    Ok(Json(AlbumGrid {
        album,
        mode: GridMode::Day,
        groups: vec![DayGroup { key: label, photos }],
    }))
}
