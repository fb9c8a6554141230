//! Fixture images and tile catalogs for integration tests.

use std::io::Cursor;

use image::{DynamicImage, ImageOutputFormat, RgbImage};
use tile_mosaic::TileCandidate;

/// Encode a solid-color PNG of the given size.
pub fn solid_png(r: u8, g: u8, b: u8, width: u32, height: u32) -> Vec<u8> {
    let pixels: Vec<u8> = (0..width * height).flat_map(|_| [r, g, b]).collect();
    let img = RgbImage::from_raw(width, height, pixels).unwrap();
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut out, ImageOutputFormat::Png)
        .unwrap();
    out.into_inner()
}

/// A horizontal black-to-white gradient PNG.
pub fn gradient_png(width: u32, height: u32) -> Vec<u8> {
    let pixels: Vec<u8> = (0..height)
        .flat_map(|_| (0..width).flat_map(move |x| {
            let v = (x * 255 / width.max(1)) as u8;
            [v, v, v]
        }))
        .collect();
    let img = RgbImage::from_raw(width, height, pixels).unwrap();
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut out, ImageOutputFormat::Png)
        .unwrap();
    out.into_inner()
}

fn candidate(id: u32, name: &str, r: u8, g: u8, b: u8) -> TileCandidate {
    TileCandidate {
        id,
        name: name.to_string(),
        texture: Some(solid_png(r, g, b, 16, 16)),
        solid: true,
        transparent: false,
    }
}

/// Standard test catalog: black, gray and white tiles plus candidates that
/// the palette builder must filter out.
pub fn catalog_candidates() -> Vec<TileCandidate> {
    let mut water = candidate(50, "water", 40, 90, 200);
    water.transparent = false; // filtered by name, not by flag
    let mut air = candidate(51, "air", 0, 0, 0);
    air.texture = None;
    air.solid = false;
    vec![
        candidate(1, "coal_block", 0, 0, 0),
        candidate(2, "stone", 128, 128, 128),
        candidate(3, "snow_block", 255, 255, 255),
        candidate(40, "oak_slab", 160, 130, 80),
        water,
        air,
    ]
}

/// Catalog with exactly one white tile.
pub fn single_white_tile() -> Vec<TileCandidate> {
    vec![candidate(1, "snow_block", 255, 255, 255)]
}
