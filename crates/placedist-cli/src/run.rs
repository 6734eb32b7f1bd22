//! The `run` command: input files → batch → table → optional CSV.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use placedist_core::{parse_coordinate_lines, CoordinateRecord};
use placedist_places::PlacesClient;

use crate::export::export_csv;
use crate::render::TableRenderer;

#[derive(Debug, Args)]
pub struct RunArgs {
    /// File with one latitude per line
    #[arg(long)]
    pub latitudes: PathBuf,

    /// File with one longitude per line, aligned with the latitudes
    #[arg(long)]
    pub longitudes: PathBuf,

    /// Optional file with one id per line; blank lines get `ID-<line>`
    #[arg(long)]
    pub ids: Option<PathBuf>,

    /// Export the rendered table to this CSV file
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Parse and list the coordinates without calling the places API
    #[arg(long)]
    pub dry_run: bool,
}

async fn read_lines_file(path: &Path) -> anyhow::Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))
}

pub(crate) async fn load_records(args: &RunArgs) -> anyhow::Result<Vec<CoordinateRecord>> {
    let latitudes = read_lines_file(&args.latitudes).await?;
    let longitudes = read_lines_file(&args.longitudes).await?;
    let ids = match &args.ids {
        Some(path) => read_lines_file(path).await?,
        None => String::new(),
    };
    Ok(parse_coordinate_lines(&latitudes, &longitudes, &ids))
}

/// Runs every coordinate through the engine and prints rows as they arrive.
///
/// # Errors
///
/// Returns an error if the input files cannot be read, no usable coordinate
/// is found, configuration is invalid, or the CSV export fails. Per-coordinate
/// search failures are rendered as `N/A` rows, not returned.
pub(crate) async fn run_distances(args: &RunArgs) -> anyhow::Result<()> {
    let records = load_records(args).await?;
    if records.is_empty() {
        anyhow::bail!("no usable latitude/longitude pairs found in input");
    }

    if args.dry_run {
        println!("dry-run: {} coordinates parsed", records.len());
        for record in &records {
            println!(
                "{}\t{}\t{}",
                record.id, record.text.latitude, record.text.longitude
            );
        }
        return Ok(());
    }

    let config = placedist_core::load_app_config()?;
    tracing::debug!(?config, "loaded configuration");
    let client = PlacesClient::from_app_config(&config)?;

    let mut renderer = TableRenderer::new(std::io::stdout().lock());
    let summary = placedist_engine::run_batch(
        &client,
        &records,
        config.max_concurrent_coordinates,
        &mut renderer,
    )
    .await;

    if summary.failed_rows > 0 {
        tracing::warn!(
            failed_rows = summary.failed_rows,
            total_rows = summary.rows,
            "some coordinates could not be searched"
        );
    }

    if let Some(path) = &args.output {
        export_csv(path, renderer.rows())?;
    }

    Ok(())
}
