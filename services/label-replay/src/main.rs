//! Offline replay of recorded contour rasters.
//!
//! Reads a JSON recording of packed contour rasters, runs every frame through
//! the topography label manager and prints the resulting labels:
//! - `json`: one report per frame with the full label set
//! - `summary`: totals over the whole recording

mod replay;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use contour_tracer::TracerConfig;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use replay::{replay, Recording};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Summary,
}

#[derive(Parser, Debug)]
#[command(name = "label-replay")]
#[command(about = "Replay recorded contour rasters through the label manager")]
struct Args {
    /// Recording file: {"width": W, "height": H, "frames": [[...], ...]}
    input: PathBuf,

    /// Nodes between labels along a contour (overrides LABEL_SPACING)
    #[arg(long)]
    spacing: Option<usize>,

    /// Minimum normalised distance between labels on one level
    #[arg(long)]
    min_label_distance: Option<f32>,

    /// Output format
    #[arg(long, value_enum, default_value = "summary")]
    format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Logs go to stderr so stdout stays machine readable.
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);
    if args.json_logs {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }

    let mut config = TracerConfig::from_env();
    if let Some(spacing) = args.spacing {
        config.label_spacing = spacing;
    }
    if let Some(distance) = args.min_label_distance {
        config.min_label_distance = distance;
    }

    info!(input = %args.input.display(), spacing = config.label_spacing, "Starting label replay");

    let recording = Recording::load(&args.input)?;
    info!(
        width = recording.width,
        height = recording.height,
        frames = recording.frames.len(),
        "Loaded recording"
    );

    let (reports, summary) = replay(recording, config)?;

    let output = match (args.format, args.pretty) {
        (OutputFormat::Json, true) => serde_json::to_string_pretty(&reports)?,
        (OutputFormat::Json, false) => serde_json::to_string(&reports)?,
        (OutputFormat::Summary, true) => serde_json::to_string_pretty(&summary)?,
        (OutputFormat::Summary, false) => serde_json::to_string(&summary)?,
    };
    println!("{}", output);

    Ok(())
}
