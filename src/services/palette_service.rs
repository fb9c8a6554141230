//! Process-wide tile palette with single-flight lazy population.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use tile_mosaic::TilePalette;

use super::tile_catalog::TileCatalog;
use super::PipelineError;

/// Holds the palette once built and rebuilds it only after an explicit
/// [`reset`](PaletteService::reset).
///
/// The first populate pass runs under `build_lock` so that concurrent first
/// requests await one build instead of racing two. The palette is built for
/// the version of whichever request arrives first; later requests for other
/// versions reuse it, matching the populate-once contract.
pub struct PaletteService {
    catalog: Arc<dyn TileCatalog>,
    slot: RwLock<Option<Arc<TilePalette>>>,
    build_lock: Mutex<()>,
}

impl PaletteService {
    pub fn new(catalog: Arc<dyn TileCatalog>) -> Self {
        Self {
            catalog,
            slot: RwLock::new(None),
            build_lock: Mutex::new(()),
        }
    }

    /// Get the palette, building it on first use.
    pub async fn get_or_init(&self, version: &str) -> Result<Arc<TilePalette>, PipelineError> {
        if let Some(palette) = self.slot.read().await.clone() {
            return Ok(palette);
        }

        let _guard = self.build_lock.lock().await;
        // A concurrent caller may have finished the build while we waited.
        if let Some(palette) = self.slot.read().await.clone() {
            return Ok(palette);
        }

        let candidates = self.catalog.load(version).await?;
        let candidate_count = candidates.len();
        let palette = Arc::new(
            tokio::task::spawn_blocking(move || TilePalette::build(candidates)).await??,
        );
        tracing::info!(
            version,
            candidates = candidate_count,
            tiles = palette.len(),
            "Tile palette populated"
        );

        *self.slot.write().await = Some(palette.clone());
        Ok(palette)
    }

    /// Drop the palette so the next request repopulates it. Test isolation
    /// hook, also useful after swapping catalog assets on disk.
    pub async fn reset(&self) {
        *self.slot.write().await = None;
    }

    /// Whether a palette is currently populated.
    pub async fn is_populated(&self) -> bool {
        self.slot.read().await.is_some()
    }
}
