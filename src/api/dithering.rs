use axum::{
    body::Bytes,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use tile_mosaic::DitherMode;

use crate::error::ApiError;
use crate::server::AppState;

/// Query parameters for the dithering endpoint
#[derive(Debug, Deserialize)]
pub struct DitherQuery {
    /// `ordered` or `error_diffusion`
    #[serde(default)]
    pub mode: Option<String>,
    /// Quantization factor for error diffusion; 1 binarizes
    #[serde(default)]
    pub factor: Option<u8>,
}

/// Dither the uploaded image to a bi-level raster
///
/// Runs directly on the full-resolution pixel buffer; the tile palette is
/// not involved. Returns a PNG.
#[utoipa::path(
    post,
    path = "/api/dithering",
    request_body(content = Vec<u8>, description = "Encoded source image", content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "Dithered raster", content_type = "image/png"),
        (status = 400, description = "Missing image or invalid parameters", body = super::ErrorResponse),
    ),
    params(
        ("mode" = Option<String>, Query, description = "Dithering strategy: ordered (default) or error_diffusion"),
        ("factor" = Option<u8>, Query, description = "Quantization factor for error diffusion (default from config)"),
    ),
    tag = "Dithering"
)]
pub async fn handle_dithering(
    State(state): State<AppState>,
    Query(query): Query<DitherQuery>,
    body: Bytes,
) -> Result<Response, ApiError> {
    if body.is_empty() {
        return Err(ApiError::MissingImage);
    }

    let mode = match query.mode.as_deref() {
        None | Some("ordered") => DitherMode::Ordered,
        Some("error_diffusion") => DitherMode::ErrorDiffusion,
        Some(other) => {
            return Err(ApiError::InvalidParameter(format!(
                "unknown dithering mode \"{other}\", expected ordered or error_diffusion"
            )))
        }
    };
    let factor = query.factor.unwrap_or(state.config.quantization_factor);
    if factor == 0 {
        return Err(ApiError::InvalidParameter(
            "factor must be at least 1".to_string(),
        ));
    }

    let png = state.mosaic.apply_dithering(&body, mode, factor).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (
                header::CONTENT_DISPOSITION,
                "inline; filename=\"dithered.png\"".to_string(),
            ),
        ],
        png,
    )
        .into_response())
}
