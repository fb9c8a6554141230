//! Dithering strategies for the bi-level preview path.
//!
//! Both strategies operate directly on the full-resolution pixel buffer
//! (3 or 4 channels, row-major), not on the block grid, and leave the alpha
//! channel untouched when present.

mod error_diffusion;
mod ordered;

pub use error_diffusion::error_diffusion;
pub use ordered::ordered;

use crate::error::MosaicError;

/// Which dithering strategy to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DitherMode {
    /// Deterministic per-pixel threshold against an interleaved-gradient
    /// noise pattern. No error memory, safely parallel.
    Ordered,
    /// Floyd-Steinberg error diffusion. Strictly sequential in raster-scan
    /// order.
    ErrorDiffusion,
}

/// Run the selected strategy over a raw pixel buffer.
pub fn apply(
    mode: DitherMode,
    data: &[u8],
    width: u32,
    height: u32,
    channels: usize,
    quantization_factor: u8,
) -> Result<Vec<u8>, MosaicError> {
    match mode {
        DitherMode::Ordered => ordered(data, width, height, channels),
        DitherMode::ErrorDiffusion => {
            error_diffusion(data, width, height, channels, quantization_factor)
        }
    }
}

/// Shared input validation: positive dimensions, 3 or 4 channels, buffer
/// length consistent with both.
fn validate(data: &[u8], width: u32, height: u32, channels: usize) -> Result<(), MosaicError> {
    crate::imaging::ensure_dimensions(width, height)?;
    let expected = width as usize * height as usize * channels;
    if !(3..=4).contains(&channels) || data.len() != expected {
        return Err(MosaicError::BufferMismatch {
            len: data.len(),
            width,
            height,
            channels,
        });
    }
    Ok(())
}
