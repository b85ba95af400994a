use axum::extract::State;
use axum::Json;

use crate::config::SiteConfig;
use crate::web::state::AppState;

/// GET /api/site
///
/// Footer and map settings for the front end.
pub async fn site_info(State(state): State<AppState>) -> Json<SiteConfig> {
    Json(state.config.site.clone())
}
