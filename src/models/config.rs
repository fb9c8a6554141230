use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    /// Address the HTTP server binds to
    pub bind_addr: String,

    /// Directory holding tile catalogs (one subdirectory per version)
    pub assets_dir: PathBuf,

    /// Catalog version used when a request does not specify one
    pub catalog_version: String,

    /// Edge length in pixels of one mosaic cell
    pub cell_size: u32,

    /// Capacity of the rendered-preview cache (FIFO eviction)
    pub preview_cache_capacity: usize,

    /// Default quantization factor for error-diffusion dithering
    /// (1 binarizes to black/white)
    pub quantization_factor: u8,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            assets_dir: PathBuf::from("assets"),
            catalog_version: "1.21.1".to_string(),
            cell_size: 10,
            preview_cache_capacity: 10,
            quantization_factor: 1,
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file, falling back to defaults when
    /// the file is missing or unparsable.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str::<Self>(&content) {
                Ok(config) => {
                    tracing::info!(
                        config = %path.display(),
                        version = %config.catalog_version,
                        cell_size = config.cell_size,
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, config = %path.display(), "Failed to read config, using defaults");
                Self::default()
            }
        }
    }
}
