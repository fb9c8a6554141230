use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use tile_mosaic::{MosaicError, PaletteError};

use crate::services::{CatalogError, PipelineError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No image provided")]
    MissingImage,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),
}

impl ApiError {
    /// Client faults map to 400; everything else is a server error.
    fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingImage | ApiError::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            ApiError::Pipeline(e) => match e {
                // Unusable input image: the caller's fault.
                PipelineError::Mosaic(MosaicError::InvalidDimensions { .. })
                | PipelineError::Mosaic(MosaicError::InvalidCellSize)
                | PipelineError::Mosaic(MosaicError::Image(_)) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl From<MosaicError> for ApiError {
    fn from(e: MosaicError) -> Self {
        ApiError::Pipeline(PipelineError::Mosaic(e))
    }
}

impl From<PaletteError> for ApiError {
    fn from(e: PaletteError) -> Self {
        ApiError::Pipeline(PipelineError::Palette(e))
    }
}

impl From<CatalogError> for ApiError {
    fn from(e: CatalogError) -> Self {
        ApiError::Pipeline(PipelineError::Catalog(e))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "status": status.as_u16(),
            "error": self.to_string(),
        }));
        (status, body).into_response()
    }
}
