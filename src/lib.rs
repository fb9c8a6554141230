//! Mosaika - image-to-tile-mosaic content server.
//!
//! Turns raster images into mosaics built from a fixed palette of textured
//! tiles, serving previews and machine-consumable tile grids over HTTP.
//! This library exposes modules for integration testing.

pub mod api;
pub mod error;
pub mod models;
pub mod server;
pub mod services;

pub use error::ApiError;
pub use models::AppConfig;
pub use server::{build_router, create_app_state, AppState};
pub use services::{MosaicService, PaletteService, PreviewCache, PreviewOptions};
