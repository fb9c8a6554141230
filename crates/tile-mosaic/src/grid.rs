//! Block grid building: downsample the source image to one pixel per cell,
//! match each cell to a tile, and collect positioned tile rasters for the
//! preview composite.

use std::sync::Arc;

use image::DynamicImage;

use crate::color::Rgb;
use crate::error::MosaicError;
use crate::imaging::{self, ResizeKernel};
use crate::palette::{Tile, TilePalette};
use crate::raster::TileRasterCache;

/// 2-D array of tile assignments, indexed `[cell_x][cell_y]`.
///
/// Created fresh per request. `None` cells only exist while a build is in
/// flight; a finished grid has every slot assigned.
#[derive(Debug, Clone, Default)]
pub struct BlockGrid {
    columns: Vec<Vec<Option<Tile>>>,
}

impl BlockGrid {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            columns: vec![vec![None; height as usize]; width as usize],
        }
    }

    /// Grid width in cells.
    pub fn width(&self) -> u32 {
        self.columns.len() as u32
    }

    /// Grid height in cells.
    pub fn height(&self) -> u32 {
        self.columns.first().map_or(0, |c| c.len() as u32)
    }

    pub fn get(&self, x: u32, y: u32) -> Option<&Tile> {
        self.columns
            .get(x as usize)
            .and_then(|col| col.get(y as usize))
            .and_then(|cell| cell.as_ref())
    }

    pub fn set(&mut self, x: u32, y: u32, tile: Tile) {
        self.columns[x as usize][y as usize] = Some(tile);
    }

    /// Iterate columns left to right, each column top to bottom.
    pub fn columns(&self) -> impl Iterator<Item = &[Option<Tile>]> {
        self.columns.iter().map(|c| c.as_slice())
    }
}

/// A resized tile raster positioned on the preview canvas.
#[derive(Debug, Clone)]
pub struct Composite {
    /// Pixel offset of the left edge on the canvas.
    pub left: u32,
    /// Pixel offset of the top edge on the canvas.
    pub top: u32,
    pub width: u32,
    pub height: u32,
    /// Flattened RGB bytes, shared with the tile raster cache.
    pub pixels: Arc<[u8]>,
}

/// Result of a grid build: the tile assignments plus everything needed to
/// render the preview raster.
///
/// Grid and composites are deliberately separate outputs: world
/// serialization consumes the grid, preview rendering the composites, and
/// neither should have to recompute the other.
#[derive(Debug, Clone)]
pub struct Mosaic {
    pub grid: BlockGrid,
    pub composites: Vec<Composite>,
    /// Source image width in pixels (the preview canvas size).
    pub width: u32,
    /// Source image height in pixels.
    pub height: u32,
    pub cell_size: u32,
}

/// Cell dimensions for an image: `ceil(size / cell_size)` per axis.
pub fn cell_dimensions(
    width: u32,
    height: u32,
    cell_size: u32,
) -> Result<(u32, u32), MosaicError> {
    imaging::ensure_dimensions(width, height)?;
    if cell_size == 0 {
        return Err(MosaicError::InvalidCellSize);
    }
    Ok((width.div_ceil(cell_size), height.div_ceil(cell_size)))
}

/// Downsample the source to one representative color per cell, row-major.
///
/// This single whole-image resize is the spatial-averaging step of the
/// build; cells are never cropped and averaged individually.
pub fn cell_colors(
    img: &DynamicImage,
    cell_size: u32,
    kernel: ResizeKernel,
) -> Result<(u32, u32, Vec<Rgb>), MosaicError> {
    let (down_w, down_h) = cell_dimensions(img.width(), img.height(), cell_size)?;
    let colors = imaging::downsample(img, down_w, down_h, kernel)?;
    Ok((down_w, down_h, colors))
}

/// Build the full mosaic sequentially: match every cell and resolve its
/// tile raster through the cache.
///
/// Cells are processed in a fixed order here; the server runs the same
/// per-cell work fanned out over worker tasks, which is equivalent because
/// cells are independent and write disjoint slots.
pub fn build_grid(
    img: &DynamicImage,
    cell_size: u32,
    palette: &TilePalette,
    raster_cache: &TileRasterCache,
    kernel: ResizeKernel,
) -> Result<Mosaic, MosaicError> {
    let (down_w, down_h, colors) = cell_colors(img, cell_size, kernel)?;

    let mut grid = BlockGrid::new(down_w, down_h);
    let mut composites = Vec::with_capacity(colors.len());
    for y in 0..down_h {
        for x in 0..down_w {
            let color = colors[(y * down_w + x) as usize];
            let tile = palette.nearest_tile(color)?;
            let pixels = raster_cache.get_or_resize(tile, cell_size, cell_size)?;
            grid.set(x, y, tile.clone());
            composites.push(Composite {
                left: x * cell_size,
                top: y * cell_size,
                width: cell_size,
                height: cell_size,
                pixels,
            });
        }
    }

    Ok(Mosaic {
        grid,
        composites,
        width: img.width(),
        height: img.height(),
        cell_size,
    })
}

/// Render composites onto a white RGB canvas of the source image size.
///
/// Edge cells whose tiles extend past the canvas are clipped.
pub fn compose_preview(width: u32, height: u32, composites: &[Composite]) -> Vec<u8> {
    let w = width as usize;
    let h = height as usize;
    let mut canvas = vec![255u8; w * h * 3];

    for composite in composites {
        let cw = composite.width as usize;
        let rows = (composite.height as usize).min(h.saturating_sub(composite.top as usize));
        let cols = cw.min(w.saturating_sub(composite.left as usize));
        if rows == 0 || cols == 0 {
            continue;
        }
        for row in 0..rows {
            let src = 3 * (row * cw);
            let dst = 3 * ((composite.top as usize + row) * w + composite.left as usize);
            canvas[dst..dst + 3 * cols].copy_from_slice(&composite.pixels[src..src + 3 * cols]);
        }
    }

    canvas
}
