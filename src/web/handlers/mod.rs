pub mod albums;
pub mod fs;
pub mod health;
pub mod photos;
pub mod site;
pub mod tasks;

use std::sync::Arc;

use serde::Serialize;

use crate::db::Database;
use crate::scanner::lock;
use crate::web::error::AppResult;
use crate::web::state::AppState;

/// `{"status": "ok", ...}` with the payload's fields alongside.
#[derive(Debug, Serialize)]
pub struct OkResponse<T: Serialize> {
    pub status: &'static str,
    #[serde(flatten)]
    pub data: T,
}

impl<T: Serialize> OkResponse<T> {
    pub fn new(data: T) -> Self {
        Self { status: "ok", data }
    }
}

/// Run catalog work on the blocking pool. The catalog lock is never taken on
/// an async worker, so a scan holding it for a long transaction only delays
/// requests that need the catalog.
pub(crate) async fn with_db<T, F>(state: &AppState, work: F) -> AppResult<T>
where
    F: FnOnce(&Database) -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    let db = Arc::clone(&state.db);
    tokio::task::spawn_blocking(move || {
        let guard = lock(&db)?;
        work(&guard)
    })
    .await
    .map_err(anyhow::Error::from)?
}
