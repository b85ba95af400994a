use axum::extract::Query;
use axum::Json;
use serde::Deserialize;

use crate::fsbrowse::{self, Listing};
use crate::web::error::AppResult;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub path: Option<String>,
}

/// GET /api/fs/list?path=
///
/// Child directories of `path` (home when absent) for the folder picker.
pub async fn list_dirs(Query(params): Query<ListParams>) -> AppResult<Json<Listing>> {
    let listing = tokio::task::spawn_blocking(move || fsbrowse::list(params.path.as_deref()))
        .await
        .map_err(anyhow::Error::from)??;
    Ok(Json(listing))
}
