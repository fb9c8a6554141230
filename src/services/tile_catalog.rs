//! Tile catalog sources: where candidate tiles come from.
//!
//! A catalog delivers the raw candidate list for a version; filtering and
//! color computation happen in `tile_mosaic::TilePalette::build`.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use tile_mosaic::TileCandidate;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Unknown catalog version: {0}")]
    UnknownVersion(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid block metadata: {0}")]
    Metadata(#[from] serde_json::Error),
}

/// Source of candidate tiles for a catalog version.
#[async_trait]
pub trait TileCatalog: Send + Sync {
    async fn load(&self, version: &str) -> Result<Vec<TileCandidate>, CatalogError>;
}

/// Block metadata entry in `blocks.json`.
#[derive(Debug, Deserialize)]
struct BlockMeta {
    id: u32,
    name: String,
    #[serde(default = "default_bounding_box")]
    bounding_box: String,
    #[serde(default)]
    transparent: bool,
}

fn default_bounding_box() -> String {
    "block".to_string()
}

/// Directory-backed catalog.
///
/// Layout: `<root>/<version>/blocks.json` plus
/// `<root>/<version>/textures/<name>.png`. Blocks without a texture file
/// become candidates with `texture: None` and get filtered during palette
/// build.
pub struct DirCatalog {
    root: PathBuf,
}

impl DirCatalog {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

#[async_trait]
impl TileCatalog for DirCatalog {
    async fn load(&self, version: &str) -> Result<Vec<TileCandidate>, CatalogError> {
        let version_dir = self.root.join(version);
        if !version_dir.is_dir() {
            return Err(CatalogError::UnknownVersion(version.to_string()));
        }

        let meta_path = version_dir.join("blocks.json");
        let meta_bytes = tokio::fs::read(&meta_path)
            .await
            .map_err(|source| CatalogError::Io {
                path: meta_path,
                source,
            })?;
        let blocks: Vec<BlockMeta> = serde_json::from_slice(&meta_bytes)?;

        let mut candidates = Vec::with_capacity(blocks.len());
        for block in blocks {
            let texture_path = version_dir.join("textures").join(format!("{}.png", block.name));
            let texture = tokio::fs::read(&texture_path).await.ok();
            candidates.push(TileCandidate {
                id: block.id,
                name: block.name,
                texture,
                solid: block.bounding_box != "empty",
                transparent: block.transparent,
            });
        }

        tracing::debug!(version, candidates = candidates.len(), "Loaded tile catalog");
        Ok(candidates)
    }
}

/// Fixed in-memory catalog; ignores the version. Used by tests and demos.
pub struct StaticCatalog {
    candidates: Vec<TileCandidate>,
}

impl StaticCatalog {
    pub fn new(candidates: Vec<TileCandidate>) -> Self {
        Self { candidates }
    }
}

#[async_trait]
impl TileCatalog for StaticCatalog {
    async fn load(&self, _version: &str) -> Result<Vec<TileCandidate>, CatalogError> {
        Ok(self.candidates.clone())
    }
}
