//! Pipeline orchestrator: palette → result cache → grid build → preview.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use tile_mosaic::{
    compose_preview, imaging, BlockGrid, Composite, DitherMode, Mosaic, MosaicError, PaletteError,
    ResizeKernel, TileRasterCache,
};

use super::palette_service::PaletteService;
use super::preview_cache::PreviewCache;
use super::tile_catalog::CatalogError;

/// Error from the mosaic pipeline
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Mosaic error: {0}")]
    Mosaic(#[from] MosaicError),

    #[error("Palette error: {0}")]
    Palette(#[from] PaletteError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Parameters of a preview request. The canonical string is the cache-key
/// suffix, so it must stay stable across releases.
#[derive(Debug, Clone)]
pub struct PreviewOptions {
    pub version: String,
    pub cell_size: u32,
}

impl PreviewOptions {
    pub fn cache_params(&self) -> String {
        format!("v={};cell={}", self.version, self.cell_size)
    }
}

/// Orchestrates palette population, grid building and preview rendering.
///
/// Per-cell work fans out over worker tasks bounded by a semaphore sized to
/// available parallelism; a full fork-join barrier completes before any
/// output is assembled, and the first failing cell fails the whole build.
pub struct MosaicService {
    palette: Arc<PaletteService>,
    raster_cache: Arc<TileRasterCache>,
    preview_cache: Arc<PreviewCache>,
    cell_limiter: Arc<Semaphore>,
}

impl MosaicService {
    pub fn new(
        palette: Arc<PaletteService>,
        raster_cache: Arc<TileRasterCache>,
        preview_cache: Arc<PreviewCache>,
    ) -> Self {
        let parallelism = std::thread::available_parallelism().map_or(4, |n| n.get());
        Self {
            palette,
            raster_cache,
            preview_cache,
            cell_limiter: Arc::new(Semaphore::new(parallelism)),
        }
    }

    /// Render a mosaic preview, consulting the result cache first.
    ///
    /// On a cache hit only the encoded raster is returned; the grid is not
    /// reconstructed. Callers that need the grid use [`build_mosaic`]
    /// directly, keeping grid and preview independently retrievable.
    ///
    /// [`build_mosaic`]: MosaicService::build_mosaic
    pub async fn render_preview(
        &self,
        input: &[u8],
        options: &PreviewOptions,
    ) -> Result<Arc<[u8]>, PipelineError> {
        let params = options.cache_params();
        if let Some(cached) = self.preview_cache.get(input, &params).await {
            tracing::debug!(age = %cached.generated_at, "Serving cached preview");
            return Ok(cached.bytes);
        }

        let mosaic = self.build_mosaic(input, options).await?;
        let (width, height) = (mosaic.width, mosaic.height);
        let composites = mosaic.composites;
        let jpeg: Arc<[u8]> = tokio::task::spawn_blocking(move || {
            let canvas = compose_preview(width, height, &composites);
            imaging::encode_jpeg(&canvas, width, height)
        })
        .await??
        .into();

        self.preview_cache.store(input, &params, jpeg.clone()).await;
        Ok(jpeg)
    }

    /// Build the full mosaic: tile grid plus positioned composites.
    pub async fn build_mosaic(
        &self,
        input: &[u8],
        options: &PreviewOptions,
    ) -> Result<Mosaic, PipelineError> {
        let palette = self.palette.get_or_init(&options.version).await?;
        let cell_size = options.cell_size;

        let input = input.to_vec();
        let (width, height, down_w, down_h, colors) = tokio::task::spawn_blocking(move || {
            let img = imaging::decode(&input)?;
            let (down_w, down_h, colors) =
                tile_mosaic::grid::cell_colors(&img, cell_size, ResizeKernel::Area)?;
            Ok::<_, MosaicError>((img.width(), img.height(), down_w, down_h, colors))
        })
        .await??;

        tracing::debug!(width, height, down_w, down_h, cell_size, "Building block grid");

        let mut tasks = JoinSet::new();
        for (i, color) in colors.into_iter().enumerate() {
            let x = i as u32 % down_w;
            let y = i as u32 / down_w;
            let palette = palette.clone();
            let raster_cache = self.raster_cache.clone();
            let limiter = self.cell_limiter.clone();
            tasks.spawn(async move {
                let _permit = limiter
                    .acquire_owned()
                    .await
                    .expect("cell limiter semaphore closed");
                let tile = palette.nearest_tile(color)?.clone();
                let pixels = raster_cache.get_or_resize(&tile, cell_size, cell_size)?;
                Ok::<_, PipelineError>((x, y, tile, pixels))
            });
        }

        let mut grid = BlockGrid::new(down_w, down_h);
        let mut composites = Vec::with_capacity((down_w * down_h) as usize);
        while let Some(joined) = tasks.join_next().await {
            // One failed cell fails the whole build; JoinSet aborts the rest
            // on drop, so no partial grid escapes.
            let (x, y, tile, pixels) = joined??;
            grid.set(x, y, tile);
            composites.push(Composite {
                left: x * cell_size,
                top: y * cell_size,
                width: cell_size,
                height: cell_size,
                pixels,
            });
        }

        Ok(Mosaic {
            grid,
            composites,
            width,
            height,
            cell_size,
        })
    }

    /// Run one of the dithering strategies over the input image and encode
    /// the result as PNG. Not cached: both passes are cheap relative to a
    /// grid build.
    pub async fn apply_dithering(
        &self,
        input: &[u8],
        mode: DitherMode,
        quantization_factor: u8,
    ) -> Result<Vec<u8>, PipelineError> {
        let input = input.to_vec();
        let png = tokio::task::spawn_blocking(move || {
            let img = imaging::decode(&input)?;
            let (width, height) = (img.width(), img.height());
            let rgba = img.to_rgba8().into_raw();
            let dithered = tile_mosaic::dither::apply(
                mode,
                &rgba,
                width,
                height,
                4,
                quantization_factor,
            )?;
            imaging::encode_png(&dithered, width, height, 4)
        })
        .await??;
        Ok(png)
    }
}
