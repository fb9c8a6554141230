//! Floyd-Steinberg error diffusion.
//!
//! A single sequential raster-scan pass over a mutable `f32` accumulation
//! buffer. Pixel `(x, y)` must be finalized, including all four diffusion
//! writes, before any later pixel reads its region of influence, so this
//! pass has no concurrency at all.

use crate::error::MosaicError;

/// Floyd-Steinberg kernel: `(dx, dy, weight)` for not-yet-visited
/// neighbors. Weights sum to exactly 1, conserving total error.
///
/// ```text
///        X   7
///    3   5   1     (all /16)
/// ```
const KERNEL: [(i32, i32, f32); 4] = [
    (1, 0, 7.0 / 16.0),
    (-1, 1, 3.0 / 16.0),
    (0, 1, 5.0 / 16.0),
    (1, 1, 1.0 / 16.0),
];

/// Quantize each channel to the nearest of a small fixed level set and
/// diffuse the rounding error forward. `quantization_factor` of 1 binarizes
/// to {0, 255}; larger factors keep more levels. Alpha, if present, is
/// copied from the source.
pub fn error_diffusion(
    data: &[u8],
    width: u32,
    height: u32,
    channels: usize,
    quantization_factor: u8,
) -> Result<Vec<u8>, MosaicError> {
    super::validate(data, width, height, channels)?;
    let factor = quantization_factor.max(1);

    let w = width as usize;
    let h = height as usize;

    // RGB-only accumulation buffer; alpha never participates in diffusion.
    let mut buf: Vec<f32> = Vec::with_capacity(w * h * 3);
    for pixel in data.chunks_exact(channels) {
        buf.extend(pixel[..3].iter().map(|&v| v as f32));
    }

    let mut out = data.to_vec();
    for y in 0..h {
        for x in 0..w {
            let base = 3 * (y * w + x);
            for c in 0..3 {
                let value = buf[base + c];
                let quantized = quantize(value, factor);
                out[channels * (y * w + x) + c] = quantized as u8;
                diffuse(&mut buf, x, y, w, h, c, value - quantized);
            }
        }
    }
    Ok(out)
}

/// `round(factor * v / 255) * floor(255 / factor)`, clamped to [0, 255].
fn quantize(value: f32, factor: u8) -> f32 {
    let step = (255 / factor as u32) as f32;
    ((factor as f32 * value / 255.0).round() * step).clamp(0.0, 255.0)
}

/// Add `err * weight` to each in-bounds kernel neighbor. Out-of-bounds
/// targets (first/last column, last row) are discarded, never wrapped.
fn diffuse(buf: &mut [f32], x: usize, y: usize, w: usize, h: usize, channel: usize, err: f32) {
    for &(dx, dy, weight) in &KERNEL {
        let nx = x as i64 + dx as i64;
        let ny = y as i64 + dy as i64;
        if nx < 0 || ny < 0 || nx >= w as i64 || ny >= h as i64 {
            continue;
        }
        buf[3 * (ny as usize * w + nx as usize) + channel] += err * weight;
    }
}
