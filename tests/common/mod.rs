//! Common test infrastructure for Mosaika integration tests.
//!
//! Each test file compiles its own copy of this module, so items may appear
//! unused from the perspective of a single test file even though they're
//! used elsewhere.

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod app;
pub mod fixtures;

pub use app::{TestApp, TestResponse};

use axum::http::StatusCode;

/// Assert a 200 response.
pub fn assert_ok(response: &TestResponse) {
    assert_eq!(
        response.status,
        StatusCode::OK,
        "expected 200, got {} with body {:?}",
        response.status,
        String::from_utf8_lossy(&response.body)
    );
}

/// Assert a specific status code.
pub fn assert_status(response: &TestResponse, expected: StatusCode) {
    assert_eq!(
        response.status,
        expected,
        "expected {expected}, got {} with body {:?}",
        response.status,
        String::from_utf8_lossy(&response.body)
    );
}

/// Assert the response carries the given content type.
pub fn assert_content_type(response: &TestResponse, expected: &str) {
    let content_type = response
        .headers
        .get(axum::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    assert_eq!(content_type, expected);
}
