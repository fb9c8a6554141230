//! Tests for /api/preview.

mod common;

use axum::http::StatusCode;
use common::{fixtures, TestApp};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_preview_returns_jpeg() {
    let app = TestApp::new();
    let image = fixtures::solid_png(255, 255, 255, 40, 20);

    let response = app.post_bytes("/api/preview?cell_size=10", image).await;

    common::assert_ok(&response);
    common::assert_content_type(&response, "image/jpeg");
    let decoded = image::load_from_memory(&response.body).expect("preview must decode");
    assert_eq!((decoded.width(), decoded.height()), (40, 20));
}

#[tokio::test]
async fn test_preview_missing_image() {
    let app = TestApp::new();
    let response = app.post_bytes("/api/preview", Vec::new()).await;

    common::assert_status(&response, StatusCode::BAD_REQUEST);
    let json = response.json();
    assert_eq!(json["error"], "No image provided");
    assert_eq!(json["status"], 400);
}

#[tokio::test]
async fn test_preview_undecodable_image_is_client_error() {
    let app = TestApp::new();
    let response = app
        .post_bytes("/api/preview", b"not an image at all".to_vec())
        .await;
    common::assert_status(&response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_preview_zero_cell_size_rejected() {
    let app = TestApp::new();
    let image = fixtures::solid_png(0, 0, 0, 8, 8);
    let response = app.post_bytes("/api/preview?cell_size=0", image).await;

    common::assert_status(&response, StatusCode::BAD_REQUEST);
    assert!(response.json()["error"]
        .as_str()
        .unwrap()
        .contains("cell_size"));
}

#[tokio::test]
async fn test_preview_second_request_served_from_cache() {
    let app = TestApp::new();
    let image = fixtures::solid_png(128, 128, 128, 20, 20);

    let first = app
        .post_bytes("/api/preview?cell_size=5", image.clone())
        .await;
    common::assert_ok(&first);
    assert_eq!(app.preview_cache.len().await, 1);

    let second = app.post_bytes("/api/preview?cell_size=5", image).await;
    common::assert_ok(&second);
    assert_eq!(app.preview_cache.len().await, 1);
    assert_eq!(first.body, second.body);
}

#[tokio::test]
async fn test_preview_distinct_params_create_distinct_entries() {
    let app = TestApp::new();
    let image = fixtures::solid_png(128, 128, 128, 20, 20);

    app.post_bytes("/api/preview?cell_size=5", image.clone())
        .await;
    app.post_bytes("/api/preview?cell_size=10", image).await;
    assert_eq!(app.preview_cache.len().await, 2);
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = TestApp::new();
    let response = app.get("/health").await;
    common::assert_ok(&response);
    assert_eq!(response.body, b"OK");
}
