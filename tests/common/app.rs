//! Test application factory for integration tests.

use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode},
};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

use mosaika::models::AppConfig;
use mosaika::server::{build_router, create_app_state, AppState};
use mosaika::services::{PaletteService, PreviewCache, StaticCatalog};
use tile_mosaic::TileCandidate;

use super::fixtures;

/// Test application with router and direct access to services
pub struct TestApp {
    router: axum::Router,
    pub palette: Arc<PaletteService>,
    pub preview_cache: Arc<PreviewCache>,
}

impl TestApp {
    /// Create a test application over the standard fixture catalog.
    pub fn new() -> Self {
        Self::with_candidates(fixtures::catalog_candidates())
    }

    /// Create a test application over a custom candidate list.
    pub fn with_candidates(candidates: Vec<TileCandidate>) -> Self {
        let config = Arc::new(AppConfig::default());
        let catalog = Arc::new(StaticCatalog::new(candidates));
        let state = create_app_state(config, catalog);

        // Keep references for test assertions
        let palette = state.palette.clone();
        let preview_cache = state.preview_cache.clone();

        // Build router using the shared server module (same as production)
        let router = build_router(state);

        Self {
            router,
            palette,
            preview_cache,
        }
    }

    /// Create application state without a router, for service-level tests.
    pub fn create_state() -> AppState {
        let config = Arc::new(AppConfig::default());
        let catalog = Arc::new(StaticCatalog::new(fixtures::catalog_candidates()));
        create_app_state(config, catalog)
    }

    /// Make a GET request to the given path
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Request::get(path).body(Body::empty()).unwrap())
            .await
    }

    /// POST raw bytes to the given path
    pub async fn post_bytes(&self, path: &str, body: Vec<u8>) -> TestResponse {
        self.request(
            Request::post(path)
                .header("Content-Type", "application/octet-stream")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }

    /// Send a request to the router
    async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// A buffered response for assertions
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parse the body as JSON
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("Response body is not valid JSON")
    }
}
