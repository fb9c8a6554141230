//! Cache of tile textures resized to requested cell sizes.
//!
//! Keyed by `(tile id, width, height)`. Entries are never evicted: the key
//! space is bounded by palette size times the distinct cell sizes actually
//! requested in a session. Returned buffers are shared and must not be
//! mutated in place.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::MosaicError;
use crate::imaging::{self, ResizeKernel};
use crate::palette::Tile;

pub struct TileRasterCache {
    entries: Mutex<HashMap<(u32, u32, u32), Arc<[u8]>>>,
    kernel: ResizeKernel,
}

impl TileRasterCache {
    pub fn new(kernel: ResizeKernel) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            kernel,
        }
    }

    /// Get the tile's texture resized to `width x height` as flattened RGB
    /// bytes, computing and storing it on first request.
    ///
    /// The resize runs outside the lock, so two racing callers may both
    /// compute the same entry; the results are identical and one insert
    /// simply wins.
    pub fn get_or_resize(
        &self,
        tile: &Tile,
        width: u32,
        height: u32,
    ) -> Result<Arc<[u8]>, MosaicError> {
        let key = (tile.id, width, height);
        if let Some(raster) = self.lock().get(&key) {
            return Ok(raster.clone());
        }

        let raster: Arc<[u8]> =
            imaging::resize_tile_rgb(&tile.texture, width, height, self.kernel)?.into();
        self.lock().entry(key).or_insert_with(|| raster.clone());
        Ok(raster)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop all entries. Test isolation hook.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<(u32, u32, u32), Arc<[u8]>>> {
        // Resize results are pure, so a poisoned lock only means another
        // thread panicked mid-insert; the map itself is still consistent.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for TileRasterCache {
    fn default() -> Self {
        // Nearest keeps tile textures blocky instead of smearing them.
        Self::new(ResizeKernel::Nearest)
    }
}
