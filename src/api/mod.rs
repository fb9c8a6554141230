//! HTTP API handlers.
//!
//! All endpoints take the raw image as the request body and parameters as
//! query strings; responses are encoded rasters or JSON. The transport is
//! deliberately thin: bytes in, bytes out.

mod dithering;
mod grid;
mod preview;

pub use dithering::{handle_dithering, __path_handle_dithering};
pub use grid::{handle_grid, GridCell, GridResponse, __path_handle_grid};
pub use preview::{handle_preview, __path_handle_preview};

use serde::Serialize;
use utoipa::ToSchema;

/// Error body returned by all endpoints on failure.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// HTTP status code
    pub status: u16,
    /// Error message
    pub error: String,
}
