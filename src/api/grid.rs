use axum::{
    body::Bytes,
    extract::{Query, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::server::AppState;

use super::preview::preview_options;

/// Query parameters for the grid endpoint
#[derive(Debug, Deserialize)]
pub struct GridQuery {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub cell_size: Option<u32>,
}

/// One assigned tile in the grid response
#[derive(Debug, Serialize, ToSchema)]
pub struct GridCell {
    /// Stable tile id within the catalog version
    pub id: u32,
    pub name: String,
}

/// Tile assignments for the uploaded image
#[derive(Debug, Serialize, ToSchema)]
pub struct GridResponse {
    /// Grid width in cells
    pub width: u32,
    /// Grid height in cells
    pub height: u32,
    pub cell_size: u32,
    /// Columns left to right, each column top to bottom
    pub cells: Vec<Vec<GridCell>>,
}

/// Compute the tile grid for the uploaded image
///
/// This is the machine-consumable output for world serialization. It is
/// always computed fresh; the result cache only covers rendered previews.
#[utoipa::path(
    post,
    path = "/api/grid",
    request_body(content = Vec<u8>, description = "Encoded source image", content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "Tile assignments per cell", body = GridResponse),
        (status = 400, description = "Missing or unusable image", body = super::ErrorResponse),
        (status = 500, description = "Pipeline failure", body = super::ErrorResponse),
    ),
    params(
        ("version" = Option<String>, Query, description = "Tile catalog version"),
        ("cell_size" = Option<u32>, Query, description = "Cell edge length in pixels (default from config)"),
    ),
    tag = "Mosaic"
)]
pub async fn handle_grid(
    State(state): State<AppState>,
    Query(query): Query<GridQuery>,
    body: Bytes,
) -> Result<Json<GridResponse>, ApiError> {
    if body.is_empty() {
        return Err(ApiError::MissingImage);
    }
    let options = preview_options(&state, query.version, query.cell_size)?;

    let mosaic = state.mosaic.build_mosaic(&body, &options).await?;

    let cells = mosaic
        .grid
        .columns()
        .map(|column| {
            column
                .iter()
                .filter_map(|cell| cell.as_ref())
                .map(|tile| GridCell {
                    id: tile.id,
                    name: tile.name.clone(),
                })
                .collect()
        })
        .collect();

    Ok(Json(GridResponse {
        width: mosaic.grid.width(),
        height: mosaic.grid.height(),
        cell_size: mosaic.cell_size,
        cells,
    }))
}
