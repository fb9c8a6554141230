//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the production server and integration tests.

use axum::{routing::get, routing::post, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use tile_mosaic::TileRasterCache;

use crate::api;
use crate::models::AppConfig;
use crate::services::{MosaicService, PaletteService, PreviewCache, TileCatalog};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub palette: Arc<PaletteService>,
    pub raster_cache: Arc<TileRasterCache>,
    pub preview_cache: Arc<PreviewCache>,
    pub mosaic: Arc<MosaicService>,
}

/// Create application state from a config and a tile catalog source.
pub fn create_app_state(config: Arc<AppConfig>, catalog: Arc<dyn TileCatalog>) -> AppState {
    let palette = Arc::new(PaletteService::new(catalog));
    let raster_cache = Arc::new(TileRasterCache::default());
    let preview_cache = Arc::new(PreviewCache::new(config.preview_cache_capacity));
    let mosaic = Arc::new(MosaicService::new(
        palette.clone(),
        raster_cache.clone(),
        preview_cache.clone(),
    ));

    AppState {
        config,
        palette,
        raster_cache,
        preview_cache,
        mosaic,
    }
}

/// Build the API router with all endpoints and middleware.
///
/// This is the core router used by both production and tests.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/preview", post(api::handle_preview))
        .route("/api/dithering", post(api::handle_dithering))
        .route("/api/grid", post(api::handle_grid))
        // Health check
        .route("/health", get(|| async { "OK" }))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
