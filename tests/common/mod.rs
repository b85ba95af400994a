#![allow(dead_code)]

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use dayalbum::config::Config;
use dayalbum::db::Database;
use dayalbum::web::{build_app_router, AppState};

/// Config with defaults suitable for tests: in-memory catalog, short timeout.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.server.request_timeout_secs = 30;
    config.server.static_dir = None;
    config
}

/// Router plus the state behind it, so tests can inspect the catalog.
pub fn build_test_app() -> (Router, AppState) {
    build_test_app_with(test_config())
}

pub fn build_test_app_with(config: Config) -> (Router, AppState) {
    let db = Database::open_in_memory().unwrap();
    db.initialize().unwrap();
    let state = AppState::new(db.into_shared(), config);
    (build_app_router(state.clone()), state)
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn send_json(app: &Router, method: Method, uri: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Response<Body> {
    send_json(app, Method::POST, uri, body).await
}

pub async fn patch_json(app: &Router, uri: &str, body: Value) -> Response<Body> {
    send_json(app, Method::PATCH, uri, body).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Write `bytes` to `path` with a fixed modification time `offset_secs`
/// after a base instant, so capture-time ordering is deterministic.
pub fn write_photo(path: &Path, bytes: &[u8], offset_secs: u64) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, bytes).unwrap();
    let mtime = base_time() + Duration::from_secs(offset_secs);
    File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(mtime)
        .unwrap();
}

/// 2024-05-01T12:00:00Z
pub fn base_time() -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(1_714_564_800)
}

/// An album directory named `name` under `parent`:
///
/// ```text
/// name/
///   cover.jpg          (no day label)
///   day1/a.jpg
///   day1/b.jpeg
///   day2/c.png
///   day2/notes.txt     (ignored)
/// ```
pub fn make_album(parent: &Path, name: &str) -> PathBuf {
    let root = parent.join(name);
    write_photo(&root.join("cover.jpg"), b"cover bytes", 0);
    write_photo(&root.join("day1/a.jpg"), b"a bytes", 60);
    write_photo(&root.join("day1/b.jpeg"), b"b bytes", 120);
    write_photo(&root.join("day2/c.png"), b"c bytes", 86_400);
    write_photo(&root.join("day2/notes.txt"), b"not a photo", 0);
    root
}

/// Scan `dir` through the synchronous endpoint and return the album id.
pub async fn import(app: &Router, dir: &Path) -> i64 {
    let response = post_json(
        app,
        "/api/albums/add",
        serde_json::json!({ "path": dir.to_string_lossy() }),
    )
    .await;
    assert_eq!(response.status(), 200);
    body_json(response).await["album_id"].as_i64().unwrap()
}
