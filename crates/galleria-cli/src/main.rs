//! Galleria CLI — run the upload ingestion pipeline from the command line.
//!
//! `ingest` replays a notification batch (JSON file or stdin) against the
//! configured store and catalog. `thumbnail` renders a single thumbnail to a
//! local file without touching any store, useful for eyeballing crop output.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use galleria_catalog::PgCatalog;
use galleria_cli::init_tracing;
use galleria_core::{CatalogConfig, Config};
use galleria_ingest::{AckResponse, NotificationBatch, Orchestrator};
use galleria_processing::{CropAnchor, MetadataExtractor, ThumbnailRenderer};
use galleria_storage::create_store;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "galleria", about = "Photo gallery ingestion pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a notification batch against the configured store and catalog
    Ingest {
        /// Path to a JSON notification batch; reads stdin when omitted
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Render a thumbnail from a local image file
    Thumbnail {
        /// Source image path
        input: PathBuf,
        /// Output path; defaults to {stem}_thumbnail_{W}x{H}.{ext} next to
        /// the source
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long, default_value = "200")]
        width: u32,
        #[arg(long, default_value = "200")]
        height: u32,
        /// Crop anchor for the cover fit
        #[arg(long, value_enum, default_value = "top")]
        anchor: AnchorArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum AnchorArg {
    Top,
    Center,
}

impl From<AnchorArg> for CropAnchor {
    fn from(arg: AnchorArg) -> Self {
        match arg {
            AnchorArg::Top => CropAnchor::Top,
            AnchorArg::Center => CropAnchor::Center,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ingest { file } => ingest(file).await,
        Commands::Thumbnail {
            input,
            output,
            width,
            height,
            anchor,
        } => thumbnail(&input, output, width, height, anchor.into()),
    }
}

async fn ingest(file: Option<PathBuf>) -> anyhow::Result<()> {
    let raw = match &file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Read batch file {}", path.display()))?,
        None => std::io::read_to_string(std::io::stdin()).context("Read batch from stdin")?,
    };
    let batch: NotificationBatch =
        serde_json::from_str(&raw).context("Parse notification batch")?;

    let config = Config::from_env().context("Load configuration")?;
    config.validate().context("Validate configuration")?;

    let store = create_store(&config.storage)
        .await
        .context("Create object store")?;
    let catalog = connect_catalog(&config.catalog).await?;

    let orchestrator = Orchestrator::new(config.pipeline, store, catalog)
        .context("Create orchestrator")?;

    let report = orchestrator.handle_with_report(batch).await;
    tracing::info!(
        completed = report.completed(),
        skipped = report.skipped(),
        failed = report.failed(),
        "ingest run finished"
    );
    println!(
        "{}",
        serde_json::to_string_pretty(&AckResponse::completed())?
    );

    Ok(())
}

async fn connect_catalog(config: &CatalogConfig) -> anyhow::Result<Arc<PgCatalog>> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .context("Connect to catalog database")?;
    let catalog = PgCatalog::new(pool, config).context("Create catalog writer")?;
    Ok(Arc::new(catalog))
}

fn thumbnail(
    input: &PathBuf,
    output: Option<PathBuf>,
    width: u32,
    height: u32,
    anchor: CropAnchor,
) -> anyhow::Result<()> {
    let data =
        std::fs::read(input).with_context(|| format!("Read image {}", input.display()))?;
    let content_type = content_type_for_path(input);

    let metadata = MetadataExtractor::extract(&data).context("Decode image")?;
    println!(
        "{}: {}x{} {} ({} bytes, {} channels{})",
        input.display(),
        metadata.width,
        metadata.height,
        metadata.format,
        metadata.byte_size,
        metadata.channel_count,
        if metadata.has_alpha { ", alpha" } else { "" },
    );

    let renderer = ThumbnailRenderer::new(width, height).with_anchor(anchor);
    let rendered = renderer
        .render(&data, content_type)
        .context("Render thumbnail")?;

    let output = output.unwrap_or_else(|| default_output_path(input, width, height));
    std::fs::write(&output, &rendered)
        .with_context(|| format!("Write thumbnail {}", output.display()))?;
    println!(
        "-> {} ({}x{}, {} bytes)",
        output.display(),
        width,
        height,
        rendered.len()
    );
    Ok(())
}

/// `photo.jpg` becomes `photo_thumbnail_200x200.jpg` in the same directory.
fn default_output_path(input: &PathBuf, width: u32, height: u32) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("thumbnail");
    let ext = input.extension().and_then(|e| e.to_str()).unwrap_or("jpg");
    input.with_file_name(format!("{}_thumbnail_{}x{}.{}", stem, width, height, ext))
}

fn content_type_for_path(path: &PathBuf) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}
