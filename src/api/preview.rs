use axum::{
    body::Bytes,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::error::ApiError;
use crate::server::AppState;
use crate::services::PreviewOptions;

/// Query parameters for the preview endpoint
#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    /// Tile catalog version; defaults to the configured one
    #[serde(default)]
    pub version: Option<String>,
    /// Cell edge length in pixels
    #[serde(default)]
    pub cell_size: Option<u32>,
}

/// Render a tile-mosaic preview of the uploaded image
///
/// Returns a JPEG raster. Repeated requests with identical image bytes and
/// parameters are served from the result cache.
#[utoipa::path(
    post,
    path = "/api/preview",
    request_body(content = Vec<u8>, description = "Encoded source image", content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "Mosaic preview", content_type = "image/jpeg"),
        (status = 400, description = "Missing or unusable image", body = super::ErrorResponse),
        (status = 500, description = "Pipeline failure", body = super::ErrorResponse),
    ),
    params(
        ("version" = Option<String>, Query, description = "Tile catalog version"),
        ("cell_size" = Option<u32>, Query, description = "Cell edge length in pixels (default from config)"),
    ),
    tag = "Mosaic"
)]
pub async fn handle_preview(
    State(state): State<AppState>,
    Query(query): Query<PreviewQuery>,
    body: Bytes,
) -> Result<Response, ApiError> {
    if body.is_empty() {
        return Err(ApiError::MissingImage);
    }
    let options = preview_options(&state, query.version, query.cell_size)?;

    let jpeg = state.mosaic.render_preview(&body, &options).await?;

    tracing::debug!(bytes = jpeg.len(), cell_size = options.cell_size, "Preview rendered");
    Ok((
        [
            (header::CONTENT_TYPE, "image/jpeg".to_string()),
            (
                header::CONTENT_DISPOSITION,
                "inline; filename=\"preview.jpg\"".to_string(),
            ),
        ],
        jpeg.to_vec(),
    )
        .into_response())
}

/// Resolve request parameters against configured defaults.
pub(super) fn preview_options(
    state: &AppState,
    version: Option<String>,
    cell_size: Option<u32>,
) -> Result<PreviewOptions, ApiError> {
    let cell_size = cell_size.unwrap_or(state.config.cell_size);
    if cell_size == 0 {
        return Err(ApiError::InvalidParameter(
            "cell_size must be at least 1".to_string(),
        ));
    }
    Ok(PreviewOptions {
        version: version.unwrap_or_else(|| state.config.catalog_version.clone()),
        cell_size,
    })
}
