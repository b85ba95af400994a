use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::web::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db = Arc::clone(&state.db);
    let db_healthy = tokio::task::spawn_blocking(move || {
        db.lock().map(|db| db.health_check()).unwrap_or(false)
    })
    .await
    .unwrap_or(false);

    let status = if db_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}
