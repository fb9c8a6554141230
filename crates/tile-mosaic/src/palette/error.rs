//! Palette error types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaletteError {
    /// No usable tiles: either matching against a zero-entry palette or
    /// building from candidates that were all filtered out.
    #[error("no tiles available for color matching")]
    Empty,

    /// Two candidates carried the same stable id.
    #[error("duplicate tile id {0}")]
    DuplicateId(u32),
}
