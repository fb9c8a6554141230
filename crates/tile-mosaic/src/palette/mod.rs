//! Tile palette: building from catalog candidates and nearest-color matching.

mod error;
#[allow(clippy::module_inception)]
mod palette;

pub use error::PaletteError;
pub use palette::{Tile, TileCandidate, TilePalette};
