//! The tile palette and nearest-color matching.
//!
//! A palette is built once from the candidate tiles of a catalog version and
//! then queried per cell during a grid build. Candidates are sorted by their
//! stable id before insertion, which fixes the iteration order and therefore
//! the tie-break behavior of [`TilePalette::nearest_tile`].

use std::collections::HashSet;
use std::sync::Arc;

use super::error::PaletteError;
use crate::color::Rgb;
use crate::imaging;

/// Tiles whose averaged color is known to misrepresent their in-context
/// appearance: animated, directionally textured, or duplicating another
/// palette entry.
const NAME_DENYLIST: &[&str] = &[
    "water",
    "lava",
    "fire",
    "grass_block",
    "observer",
    "spawner",
    "tnt",
];

/// Suffix patterns for shape variants that render as partial blocks and
/// would leave visible gaps in the mosaic.
const SUFFIX_DENYLIST: &[&str] = &[
    "_slab",
    "_stairs",
    "_fence",
    "_fence_gate",
    "_piston",
    "_door",
    "_trapdoor",
    "_pane",
    "_wall",
    "_button",
    "_pressure_plate",
];

/// A candidate tile as delivered by a tile catalog, before filtering.
#[derive(Debug, Clone)]
pub struct TileCandidate {
    /// Stable id within a catalog version.
    pub id: u32,
    pub name: String,
    /// Encoded texture bytes, if the catalog ships one for this tile.
    pub texture: Option<Vec<u8>>,
    /// Whether the tile occupies its full bounding box.
    pub solid: bool,
    pub transparent: bool,
}

/// One usable palette entry. Immutable after insertion; the texture is
/// shared so grid builds can clone tiles cheaply.
#[derive(Debug, Clone)]
pub struct Tile {
    pub id: u32,
    pub name: String,
    /// Representative color: box-filter average of the flattened texture.
    pub color: Rgb,
    /// Encoded texture bytes as shipped by the catalog.
    pub texture: Arc<[u8]>,
}

/// The usable tile palette, insertion-ordered by tile id.
#[derive(Debug, Clone, Default)]
pub struct TilePalette {
    tiles: Vec<Tile>,
    ids: HashSet<u32>,
}

impl TilePalette {
    /// Build the palette from catalog candidates.
    ///
    /// Skipped candidates: missing texture, non-solid ("empty bounding box"),
    /// transparent, denylisted by name or suffix, or carrying a texture that
    /// fails to decode. Candidates are sorted by id first so the resulting
    /// iteration order is deterministic regardless of catalog order.
    pub fn build(mut candidates: Vec<TileCandidate>) -> Result<Self, PaletteError> {
        candidates.sort_by_key(|c| c.id);

        let mut palette = TilePalette::default();
        for candidate in candidates {
            let Some(texture) = candidate.texture else {
                continue;
            };
            if !candidate.solid || candidate.transparent {
                continue;
            }
            if Self::is_denied(&candidate.name) {
                continue;
            }
            let Ok(color) = imaging::average_color(&texture) else {
                // Undecodable texture: treat like a missing one.
                continue;
            };
            palette.insert(Tile {
                id: candidate.id,
                name: candidate.name,
                color,
                texture: texture.into(),
            })?;
        }

        if palette.is_empty() {
            return Err(PaletteError::Empty);
        }
        Ok(palette)
    }

    fn is_denied(name: &str) -> bool {
        NAME_DENYLIST.contains(&name) || SUFFIX_DENYLIST.iter().any(|s| name.ends_with(s))
    }

    fn insert(&mut self, tile: Tile) -> Result<(), PaletteError> {
        if !self.ids.insert(tile.id) {
            return Err(PaletteError::DuplicateId(tile.id));
        }
        self.tiles.push(tile);
        Ok(())
    }

    /// Find the tile minimizing Manhattan distance to `target`.
    ///
    /// Exact ties go to the tile appearing first in iteration order, i.e.
    /// the one with the smallest id. Fails on an empty palette.
    pub fn nearest_tile(&self, target: Rgb) -> Result<&Tile, PaletteError> {
        let mut best: Option<(&Tile, u32)> = None;
        for tile in &self.tiles {
            let distance = tile.color.manhattan_distance(target);
            match best {
                Some((_, d)) if d <= distance => {}
                _ => best = Some((tile, distance)),
            }
        }
        best.map(|(tile, _)| tile).ok_or(PaletteError::Empty)
    }

    /// Iterate tiles in insertion (id) order.
    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::encode_png;
    use pretty_assertions::assert_eq;

    fn solid_texture(r: u8, g: u8, b: u8) -> Vec<u8> {
        let pixels: Vec<u8> = (0..16u32 * 16).flat_map(|_| [r, g, b]).collect();
        encode_png(&pixels, 16, 16, 3).unwrap()
    }

    fn candidate(id: u32, name: &str, color: Option<(u8, u8, u8)>) -> TileCandidate {
        TileCandidate {
            id,
            name: name.to_string(),
            texture: color.map(|(r, g, b)| solid_texture(r, g, b)),
            solid: true,
            transparent: false,
        }
    }

    #[test]
    fn test_build_filters_unusable_candidates() {
        let mut glass = candidate(4, "glass", Some((250, 250, 250)));
        glass.transparent = true;
        let mut torch = candidate(5, "torch", Some((240, 200, 90)));
        torch.solid = false;

        let palette = TilePalette::build(vec![
            candidate(1, "stone", Some((128, 128, 128))),
            candidate(2, "air", None),
            candidate(3, "water", Some((50, 80, 200))),
            glass,
            torch,
            candidate(6, "oak_slab", Some((160, 130, 80))),
            candidate(7, "oak_stairs", Some((160, 130, 80))),
        ])
        .unwrap();

        assert_eq!(palette.len(), 1);
        assert_eq!(palette.iter().next().unwrap().name, "stone");
    }

    #[test]
    fn test_build_skips_undecodable_texture() {
        let mut broken = candidate(2, "mud", None);
        broken.texture = Some(b"definitely not a png".to_vec());
        let palette =
            TilePalette::build(vec![candidate(1, "stone", Some((1, 2, 3))), broken]).unwrap();
        assert_eq!(palette.len(), 1);
    }

    #[test]
    fn test_build_empty_after_filtering_is_error() {
        let result = TilePalette::build(vec![candidate(1, "air", None)]);
        assert_eq!(result.unwrap_err(), PaletteError::Empty);
    }

    #[test]
    fn test_build_rejects_duplicate_ids() {
        let result = TilePalette::build(vec![
            candidate(1, "stone", Some((10, 10, 10))),
            candidate(1, "andesite", Some((20, 20, 20))),
        ]);
        assert_eq!(result.unwrap_err(), PaletteError::DuplicateId(1));
    }

    #[test]
    fn test_build_orders_by_id_regardless_of_input_order() {
        let palette = TilePalette::build(vec![
            candidate(9, "coal_block", Some((20, 20, 20))),
            candidate(2, "snow_block", Some((250, 250, 250))),
            candidate(5, "stone", Some((128, 128, 128))),
        ])
        .unwrap();
        let ids: Vec<u32> = palette.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 5, 9]);
    }

    #[test]
    fn test_nearest_tile_minimizes_manhattan_distance() {
        let palette = TilePalette::build(vec![
            candidate(1, "coal_block", Some((0, 0, 0))),
            candidate(2, "stone", Some((128, 128, 128))),
            candidate(3, "snow_block", Some((255, 255, 255))),
        ])
        .unwrap();

        // Spot-check against a brute-force scan over all palette entries.
        for target in [
            Rgb::new(0, 0, 0),
            Rgb::new(130, 120, 140),
            Rgb::new(250, 240, 255),
            Rgb::new(64, 64, 64),
        ] {
            let nearest = palette.nearest_tile(target).unwrap();
            let best = palette
                .iter()
                .map(|t| t.color.manhattan_distance(target))
                .min()
                .unwrap();
            assert_eq!(nearest.color.manhattan_distance(target), best);
        }
    }

    #[test]
    fn test_nearest_tile_tie_break_is_first_in_order() {
        // Two tiles equidistant from the target; lower id must win, and
        // repeatedly so.
        let palette = TilePalette::build(vec![
            candidate(7, "white_wool", Some((200, 200, 200))),
            candidate(3, "iron_block", Some((100, 100, 100))),
        ])
        .unwrap();
        let target = Rgb::new(150, 150, 150);
        for _ in 0..10 {
            assert_eq!(palette.nearest_tile(target).unwrap().id, 3);
        }
    }

    #[test]
    fn test_nearest_tile_empty_palette_errors() {
        let palette = TilePalette::default();
        assert_eq!(
            palette.nearest_tile(Rgb::BLACK).unwrap_err(),
            PaletteError::Empty
        );
    }
}
