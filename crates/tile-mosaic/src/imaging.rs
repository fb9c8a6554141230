//! Decode/resize/flatten/encode helpers on top of the `image` crate.
//!
//! Everything downstream of decoding works on flattened RGB: transparent
//! pixels are composited onto a fixed white background before any averaging
//! or matching, so a mostly-transparent texture reads as near-white instead
//! of near-black.

use std::io::Cursor;

use image::{imageops::FilterType, DynamicImage, ImageOutputFormat, RgbImage, RgbaImage};

use crate::color::Rgb;
use crate::error::MosaicError;

/// Background color used when flattening alpha.
const FLATTEN_BACKGROUND: u8 = 255;

/// Resampling kernel for downsampling and tile resizing.
///
/// `Nearest` preserves blocky texture authenticity; `Area` is a box filter
/// that averages the covered source region and is the spatial-averaging step
/// of the grid build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizeKernel {
    Nearest,
    #[default]
    Area,
}

/// Decode an image from encoded bytes and reject zero-size images.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, MosaicError> {
    let img = image::load_from_memory(bytes)?;
    ensure_dimensions(img.width(), img.height())?;
    Ok(img)
}

/// Fail with `InvalidDimensions` unless both dimensions are positive.
pub fn ensure_dimensions(width: u32, height: u32) -> Result<(), MosaicError> {
    if width == 0 || height == 0 {
        return Err(MosaicError::InvalidDimensions { width, height });
    }
    Ok(())
}

/// Flatten an image onto the white background, returning a row-major RGB
/// buffer of `width * height * 3` bytes.
pub fn flatten_to_rgb(img: &DynamicImage) -> Vec<u8> {
    let rgba = img.to_rgba8();
    let mut out = Vec::with_capacity(rgba.len() / 4 * 3);
    for pixel in rgba.pixels() {
        let [r, g, b, a] = pixel.0;
        let a = a as u16;
        out.push(blend_onto_background(r, a));
        out.push(blend_onto_background(g, a));
        out.push(blend_onto_background(b, a));
    }
    out
}

fn blend_onto_background(channel: u8, alpha: u16) -> u8 {
    ((channel as u16 * alpha + FLATTEN_BACKGROUND as u16 * (255 - alpha)) / 255) as u8
}

/// Representative color of a texture: box filter down to a single pixel over
/// the flattened image, i.e. the arithmetic mean of all flattened pixels.
pub fn average_color(texture: &[u8]) -> Result<Rgb, MosaicError> {
    let img = decode(texture)?;
    let rgb = flatten_to_rgb(&img);
    let count = (rgb.len() / 3) as u64;
    let mut sums = [0u64; 3];
    for pixel in rgb.chunks_exact(3) {
        sums[0] += pixel[0] as u64;
        sums[1] += pixel[1] as u64;
        sums[2] += pixel[2] as u64;
    }
    Ok(Rgb::new(
        ((sums[0] + count / 2) / count) as u8,
        ((sums[1] + count / 2) / count) as u8,
        ((sums[2] + count / 2) / count) as u8,
    ))
}

/// Downsample an image to `down_w x down_h`, one output pixel per grid cell.
///
/// Returns row-major cell colors. The `Area` kernel averages each covered
/// source rectangle exactly; `Nearest` picks single source pixels.
pub fn downsample(
    img: &DynamicImage,
    down_w: u32,
    down_h: u32,
    kernel: ResizeKernel,
) -> Result<Vec<Rgb>, MosaicError> {
    ensure_dimensions(down_w, down_h)?;
    match kernel {
        ResizeKernel::Nearest => {
            let small = img.resize_exact(down_w, down_h, FilterType::Nearest);
            let rgb = flatten_to_rgb(&small);
            Ok(rgb.chunks_exact(3).map(|p| Rgb::new(p[0], p[1], p[2])).collect())
        }
        ResizeKernel::Area => {
            let rgb = flatten_to_rgb(img);
            Ok(box_downsample(
                &rgb,
                img.width() as usize,
                img.height() as usize,
                down_w as usize,
                down_h as usize,
            ))
        }
    }
}

/// Exact box-filter downsample of a row-major RGB buffer.
///
/// Cell rectangles are `[c*n/down .. max(ceil((c+1)*n/down), start+1))`
/// clipped to the source, so every cell covers at least one source pixel.
fn box_downsample(rgb: &[u8], w: usize, h: usize, down_w: usize, down_h: usize) -> Vec<Rgb> {
    let mut out = Vec::with_capacity(down_w * down_h);
    for cy in 0..down_h {
        let y0 = cy * h / down_h;
        let y1 = (((cy + 1) * h + down_h - 1) / down_h).max(y0 + 1).min(h);
        for cx in 0..down_w {
            let x0 = cx * w / down_w;
            let x1 = (((cx + 1) * w + down_w - 1) / down_w).max(x0 + 1).min(w);
            let mut sums = [0u64; 3];
            for y in y0..y1 {
                for x in x0..x1 {
                    let i = 3 * (y * w + x);
                    sums[0] += rgb[i] as u64;
                    sums[1] += rgb[i + 1] as u64;
                    sums[2] += rgb[i + 2] as u64;
                }
            }
            let count = ((y1 - y0) * (x1 - x0)) as u64;
            out.push(Rgb::new(
                ((sums[0] + count / 2) / count) as u8,
                ((sums[1] + count / 2) / count) as u8,
                ((sums[2] + count / 2) / count) as u8,
            ));
        }
    }
    out
}

/// Resize an encoded tile texture to `width x height` and flatten it,
/// returning raw RGB bytes.
pub fn resize_tile_rgb(
    texture: &[u8],
    width: u32,
    height: u32,
    kernel: ResizeKernel,
) -> Result<Vec<u8>, MosaicError> {
    ensure_dimensions(width, height)?;
    let img = decode(texture)?;
    let filter = match kernel {
        ResizeKernel::Nearest => FilterType::Nearest,
        ResizeKernel::Area => FilterType::Triangle,
    };
    let resized = img.resize_exact(width, height, filter);
    Ok(flatten_to_rgb(&resized))
}

/// Encode a raw pixel buffer (3 or 4 channels) as PNG.
pub fn encode_png(
    data: &[u8],
    width: u32,
    height: u32,
    channels: usize,
) -> Result<Vec<u8>, MosaicError> {
    let img = raw_to_dynamic(data, width, height, channels)?;
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageOutputFormat::Png)?;
    Ok(out.into_inner())
}

/// Encode a raw RGB buffer as JPEG (preview quality).
pub fn encode_jpeg(rgb: &[u8], width: u32, height: u32) -> Result<Vec<u8>, MosaicError> {
    let img = raw_to_dynamic(rgb, width, height, 3)?;
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageOutputFormat::Jpeg(85))?;
    Ok(out.into_inner())
}

fn raw_to_dynamic(
    data: &[u8],
    width: u32,
    height: u32,
    channels: usize,
) -> Result<DynamicImage, MosaicError> {
    let mismatch = || MosaicError::BufferMismatch {
        len: data.len(),
        width,
        height,
        channels,
    };
    match channels {
        3 => RgbImage::from_raw(width, height, data.to_vec())
            .map(DynamicImage::ImageRgb8)
            .ok_or_else(mismatch),
        4 => RgbaImage::from_raw(width, height, data.to_vec())
            .map(DynamicImage::ImageRgba8)
            .ok_or_else(mismatch),
        _ => Err(mismatch()),
    }
}
