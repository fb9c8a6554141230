//! Ordered dithering with interleaved gradient noise.
//!
//! Every pixel is thresholded independently against a deterministic spatial
//! noise value, so the pass is stateless and embarrassingly parallel. The
//! noise is Jimenez's interleaved gradient noise, computed on the fly
//! instead of from a precomputed mask.

use crate::error::MosaicError;

/// Interleaved gradient noise for a pixel position, in `[0, 1)`.
///
/// `flipped_y` is `height - y`; the Y flip matches the screen-space
/// orientation the coefficients were designed for.
pub(crate) fn ign_noise(x: u32, flipped_y: u32) -> f32 {
    let dot = 0.06711056_f32 * x as f32 + 0.00583715_f32 * flipped_y as f32;
    (52.9829189_f32 * dot.fract()).fract()
}

/// Binarize a pixel buffer to black/white by thresholding against the
/// noise pattern. Alpha, if present, is copied from the source.
pub fn ordered(
    data: &[u8],
    width: u32,
    height: u32,
    channels: usize,
) -> Result<Vec<u8>, MosaicError> {
    super::validate(data, width, height, channels)?;

    let mut out = data.to_vec();
    for y in 0..height {
        let flipped_y = height - y;
        for x in 0..width {
            let index = channels * (width * y + x) as usize;
            let noise = ign_noise(x, flipped_y);
            // Threshold the first channel, write the result to all three.
            let level = if noise * 255.0 > data[index] as f32 {
                0
            } else {
                255
            };
            out[index] = level;
            out[index + 1] = level;
            out[index + 2] = level;
        }
    }
    Ok(out)
}
