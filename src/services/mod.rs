//! Service layer: catalog loading, process-wide caches and the pipeline
//! orchestrator.

mod mosaic_service;
mod palette_service;
mod preview_cache;
mod tile_catalog;

pub use mosaic_service::{MosaicService, PipelineError, PreviewOptions};
pub use palette_service::PaletteService;
pub use preview_cache::{CachedPreview, PreviewCache, DEFAULT_PREVIEW_CAPACITY};
pub use tile_catalog::{CatalogError, DirCatalog, StaticCatalog, TileCatalog};
