//! Shared application router builder, used by the server binary and the
//! integration tests so both run the same middleware stack.

use std::time::Duration;

use axum::http::{HeaderName, StatusCode};
use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use super::handlers::{albums, fs, health, photos, site, tasks};
use super::state::AppState;

/// Routes mounted under `/api`.
///
/// ```text
/// GET    /site                         -> site_info
/// GET    /sidebar                      -> sidebar
/// GET    /albums                       -> list_albums
/// POST   /albums/add                   -> add_album
/// POST   /albums/add_async             -> add_album_async
/// GET    /albums/{id}                  -> album_home
/// GET    /albums/{id}/meta             -> album_meta
/// GET    /albums/{id}/all              -> album_all
/// GET    /albums/{id}/day/{*label}     -> album_day
/// POST   /albums/{id}/remove           -> remove_album
/// PATCH  /albums/{id}/rename           -> rename_album (POST also accepted)
/// PATCH  /albums/{id}/thumbnail        -> set_thumbnail
/// GET    /photos/{id}                  -> photo_view
/// PATCH  /photos/{id}                  -> update_photo
/// GET    /tasks/{task_id}              -> task_status
/// GET    /fs/list                      -> list_dirs
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/site", get(site::site_info))
        .route("/sidebar", get(albums::sidebar))
        .route("/albums", get(albums::list_albums))
        .route("/albums/add", post(albums::add_album))
        .route("/albums/add_async", post(albums::add_album_async))
        .route("/albums/{id}", get(albums::album_home))
        .route("/albums/{id}/meta", get(albums::album_meta))
        .route("/albums/{id}/all", get(albums::album_all))
        .route("/albums/{id}/day/{*label}", get(albums::album_day))
        .route("/albums/{id}/remove", post(albums::remove_album))
        .route(
            "/albums/{id}/rename",
            patch(albums::rename_album).post(albums::rename_album),
        )
        .route("/albums/{id}/thumbnail", patch(albums::set_thumbnail))
        .route(
            "/photos/{id}",
            get(photos::photo_view).patch(photos::update_photo),
        )
        .route("/tasks/{task_id}", get(tasks::task_status))
        .route("/fs/list", get(fs::list_dirs))
}

/// Build the full application [`Router`] with all middleware layers.
///
/// Layers apply bottom-up: request id, tracing, request id propagation,
/// timeout, panic recovery. When a static directory is configured it
/// serves every path no route claims.
pub fn build_app_router(state: AppState) -> Router {
    let server = state.config.server.clone();
    let request_id_header = HeaderName::from_static("x-request-id");

    let mut router = Router::new()
        .route("/health", get(health::health_check))
        .route("/photo/raw/{id}", get(photos::raw_photo))
        .nest("/api", api_routes());

    if let Some(static_dir) = &server.static_dir {
        tracing::info!(dir = %static_dir.display(), "Serving static files");
        router = router.fallback_service(ServeDir::new(static_dir));
    }

    router
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(server.request_timeout_secs),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .with_state(state)
}
