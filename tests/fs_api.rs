//! Integration tests for the folder picker listing.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get};
use tempfile::tempdir;

fn encode(path: &std::path::Path) -> String {
    path.to_string_lossy()
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                (b as char).to_string()
            }
            other => format!("%{other:02X}"),
        })
        .collect()
}

#[tokio::test]
async fn lists_child_directories() {
    let dir = tempdir().unwrap();
    std::fs::create_dir(dir.path().join("Zoo")).unwrap();
    std::fs::create_dir(dir.path().join("apples")).unwrap();
    std::fs::create_dir(dir.path().join(".cache")).unwrap();
    std::fs::write(dir.path().join("photo.jpg"), b"x").unwrap();
    let (app, _) = build_test_app();

    let response = get(&app, &format!("/api/fs/list?path={}", encode(dir.path()))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let canonical = std::fs::canonicalize(dir.path()).unwrap();
    assert_eq!(json["cwd"], canonical.to_string_lossy().to_string());
    assert_eq!(json["separator"], std::path::MAIN_SEPARATOR.to_string());
    assert!(json["parent"].is_string());
    assert!(json["drives"].is_array());

    let names: Vec<&str> = json["dirs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["apples", "Zoo"]);
}

#[tokio::test]
async fn file_path_is_rejected() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("photo.jpg");
    std::fs::write(&file, b"x").unwrap();
    let (app, _) = build_test_app();

    let response = get(&app, &format!("/api/fs/list?path={}", encode(&file))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Not a directory");
}

#[tokio::test]
async fn missing_path_falls_back_to_home() {
    let (app, _) = build_test_app();

    let without = body_json(get(&app, "/api/fs/list").await).await;
    let unresolvable = body_json(get(&app, "/api/fs/list?path=%2Fno%2Fsuch%2Fplace%2Fhere").await).await;
    assert_eq!(without["cwd"], unresolvable["cwd"]);
}
