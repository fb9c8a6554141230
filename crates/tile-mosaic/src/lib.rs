//! tile-mosaic: palette matching, block-grid building and dithering.
//!
//! This library turns an arbitrary raster image into a mosaic drawn from a
//! small fixed palette of textured tiles. It contains the algorithmic core
//! only; serving, caching policy for finished previews and catalog loading
//! live in the surrounding application.
//!
//! # Pipeline
//!
//! ```text
//! tile candidates          source image
//!     |                        |
//!     v                        v
//! TilePalette::build()    downsample (one pixel per cell)
//!     |                        |
//!     +----> nearest_tile() <--+        per cell
//!                 |
//!                 v
//!      TileRasterCache::get_or_resize()
//!                 |
//!                 v
//!       BlockGrid + composites ----> compose_preview()
//! ```
//!
//! # Quick Start
//!
//! ```
//! use tile_mosaic::{Rgb, TileCandidate, TilePalette};
//!
//! let candidates = vec![TileCandidate {
//!     id: 1,
//!     name: "stone".into(),
//!     texture: Some(tile_mosaic::imaging::encode_png(&[128, 128, 128], 1, 1, 3).unwrap()),
//!     solid: true,
//!     transparent: false,
//! }];
//! let palette = TilePalette::build(candidates).unwrap();
//! let tile = palette.nearest_tile(Rgb::new(120, 130, 125)).unwrap();
//! assert_eq!(tile.id, 1);
//! ```
//!
//! # Dithering
//!
//! Two independent strategies produce a bi-level preview directly from the
//! full-resolution pixel buffer (not from the grid):
//!
//! - [`dither::ordered`]: deterministic interleaved-gradient-noise threshold,
//!   every pixel independent.
//! - [`dither::error_diffusion`]: Floyd-Steinberg, strictly sequential in
//!   raster-scan order.

pub mod color;
pub mod dither;
pub mod error;
pub mod grid;
pub mod imaging;
pub mod palette;
pub mod raster;


pub use color::Rgb;
pub use dither::DitherMode;
pub use error::MosaicError;
pub use grid::{build_grid, compose_preview, BlockGrid, Composite, Mosaic};
pub use imaging::ResizeKernel;
pub use palette::{PaletteError, Tile, TileCandidate, TilePalette};
pub use raster::TileRasterCache;
