use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use mosaika::api;
use mosaika::models::AppConfig;
use mosaika::server;
use mosaika::services::{DirCatalog, PreviewOptions};

#[derive(Parser)]
#[command(name = "mosaika")]
#[command(about = "Mosaika - turns raster images into tile mosaics")]
struct Cli {
    /// Path to config.yaml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Convert a single image to a mosaic preview without a server
    Render {
        /// Input image file
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (JPEG for mosaics, PNG for dithering)
        #[arg(short, long)]
        output: PathBuf,

        /// Cell edge length in pixels
        #[arg(long)]
        cell_size: Option<u32>,

        /// Tile catalog version
        #[arg(long)]
        version: Option<String>,

        /// Dither instead of building a mosaic: "ordered" or "error_diffusion"
        #[arg(long)]
        mode: Option<String>,

        /// Quantization factor for error-diffusion dithering
        #[arg(long)]
        factor: Option<u8>,
    },
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Mosaika API",
        description = "Image-to-tile-mosaic previews, grids and dithering",
        version = "0.3.0",
        license(name = "MIT")
    ),
    paths(api::handle_preview, api::handle_dithering, api::handle_grid),
    components(schemas(api::GridResponse, api::GridCell, api::ErrorResponse)),
    tags(
        (name = "Mosaic", description = "Tile-mosaic previews and grids"),
        (name = "Dithering", description = "Bi-level preview rasters")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Render {
            input,
            output,
            cell_size,
            version,
            mode,
            factor,
        }) => {
            run_render_command(
                cli.config.as_deref(),
                &input,
                &output,
                cell_size,
                version,
                mode,
                factor,
            )
            .await
        }
        Some(Commands::Serve) | None => run_server(cli.config.as_deref()).await,
    }
}

/// Convert one image on the command line (no server needed).
async fn run_render_command(
    config_path: Option<&std::path::Path>,
    input: &PathBuf,
    output: &PathBuf,
    cell_size: Option<u32>,
    version: Option<String>,
    mode: Option<String>,
    factor: Option<u8>,
) -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mosaika=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let config = Arc::new(AppConfig::load(config_path));
    let catalog = Arc::new(DirCatalog::new(config.assets_dir.clone()));
    let state = server::create_app_state(config.clone(), catalog);

    let image = std::fs::read(input)?;
    let bytes = match mode.as_deref() {
        None => {
            let options = PreviewOptions {
                version: version.unwrap_or_else(|| config.catalog_version.clone()),
                cell_size: cell_size.unwrap_or(config.cell_size),
            };
            state.mosaic.render_preview(&image, &options).await?.to_vec()
        }
        Some("ordered") => {
            state
                .mosaic
                .apply_dithering(&image, tile_mosaic::DitherMode::Ordered, 1)
                .await?
        }
        Some("error_diffusion") => {
            let factor = factor.unwrap_or(config.quantization_factor);
            state
                .mosaic
                .apply_dithering(&image, tile_mosaic::DitherMode::ErrorDiffusion, factor)
                .await?
        }
        Some(other) => {
            anyhow::bail!("unknown mode {other:?}, expected ordered or error_diffusion")
        }
    };

    std::fs::write(output, &bytes)?;
    tracing::info!(output = %output.display(), bytes = bytes.len(), "Wrote rendered output");
    Ok(())
}

async fn run_server(config_path: Option<&std::path::Path>) -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mosaika=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(AppConfig::load(config_path));
    let catalog = Arc::new(DirCatalog::new(config.assets_dir.clone()));

    tracing::info!(
        assets = %config.assets_dir.display(),
        version = %config.catalog_version,
        "Tile catalog configured"
    );

    let state = server::create_app_state(config.clone(), catalog);
    let app = server::build_router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "Mosaika listening");
    axum::serve(listener, app).await?;

    Ok(())
}
