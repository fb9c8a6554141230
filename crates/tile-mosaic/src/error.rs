//! Error types shared across the mosaic pipeline.

use thiserror::Error;

use crate::palette::PaletteError;

#[derive(Debug, Error)]
pub enum MosaicError {
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("cell size must be at least 1")]
    InvalidCellSize,

    #[error("pixel buffer length {len} does not match {width}x{height}x{channels}")]
    BufferMismatch {
        len: usize,
        width: u32,
        height: u32,
        channels: usize,
    },

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Palette(#[from] PaletteError),
}
