//! Single-photo endpoints: the viewer with prev/next navigation, text edits,
//! and the raw file.

use std::path::PathBuf;

use axum::body::Body;
use axum::extract::{Path, Query, Request, State};
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::browse::{neighbours, ViewContext};
use crate::db::photos::PhotoTextUpdate;
use crate::db::{Album, Photo};
use crate::web::error::{AppError, AppResult};
use crate::web::extract::{double_option, JsonBody};
use crate::web::handlers::{with_db, OkResponse};
use crate::web::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PhotoViewParams {
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PhotoView {
    pub photo: Photo,
    pub album: Album,
    pub prev_id: Option<i64>,
    pub next_id: Option<i64>,
    pub context: String,
}

/// Body of a photo edit. An absent field is left alone; `null` or `""`
/// clears it.
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePhotoRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub user_title: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub user_description: Option<Option<String>>,
}

/// GET /api/photos/{id}?context=all|day:<label>
pub async fn photo_view(
    State(state): State<AppState>,
    Path(photo_id): Path<i64>,
    Query(params): Query<PhotoViewParams>,
) -> AppResult<Json<PhotoView>> {
    let context = ViewContext::parse(params.context.as_deref());

    let (photo, album, ids) = with_db(&state, move |db| {
        let photo = db.require_photo(photo_id)?;
        let album = db.require_album(photo.album_id)?;

        let ids: Vec<i64> = db
            .list_album_photos(album.id, context.day_label())?
            .iter()
            .map(|p| p.id)
            .collect();
        Ok((photo, album, ids))
    })
    .await?;
    let (prev_id, next_id) = neighbours(&ids, photo.id);

    Ok(Json(PhotoView {
        photo,
        album,
        prev_id,
        next_id,
        context: params.context.unwrap_or_else(|| "all".to_string()),
    }))
}

/// PATCH /api/photos/{id}
pub async fn update_photo(
    State(state): State<AppState>,
    Path(photo_id): Path<i64>,
    JsonBody(input): JsonBody<UpdatePhotoRequest>,
) -> AppResult<Json<OkResponse<serde_json::Map<String, serde_json::Value>>>> {
    tracing::info!(
        photo_id,
        title = input.user_title.is_some(),
        description = input.user_description.is_some(),
        "Update photo",
    );

    let update = PhotoTextUpdate {
        user_title: input.user_title,
        user_description: input.user_description,
    };
    with_db(&state, move |db| Ok(db.update_photo_text(photo_id, update)?)).await?;

    Ok(Json(OkResponse::new(serde_json::Map::new())))
}

/// GET /photo/raw/{id}
///
/// The original file bytes, with a content type guessed from the extension.
pub async fn raw_photo(
    State(state): State<AppState>,
    Path(photo_id): Path<i64>,
    request: Request,
) -> AppResult<Response> {
    let photo = with_db(&state, move |db| Ok(db.require_photo(photo_id)?)).await?;
    let path = PathBuf::from(&photo.file_path);
    if !path.is_file() {
        tracing::warn!(photo_id, path = %path.display(), "Photo file missing on disk");
        return Err(AppError::NotFound(format!("File for photo {photo_id} is missing")));
    }

    match ServeFile::new(&path).oneshot(request).await {
        Ok(response) => Ok(response.map(Body::new)),
        Err(never) => match never {},
    }
}
