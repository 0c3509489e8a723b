// src/main.rs

mod annotate;
mod config;
mod detection;
mod errors;
mod event_log;
mod pipeline;
mod quadrants;
mod tracker;
mod types;
mod video;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use detection::HsvBallDetector;
use types::Config;

#[derive(Parser, Debug)]
#[command(
    name = "quadtrack",
    about = "Track colored balls across frame quadrants and log entry/exit events"
)]
struct Args {
    /// Input video file
    input: PathBuf,
    /// Annotated output video
    output_video: PathBuf,
    /// Plain-text event log
    output_log: PathBuf,
    /// Optional YAML config (palette, area threshold, log level)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!("quadtrack={}", config.logging.level))
        .init();

    info!("✓ Configuration loaded ({} color bands)", config.detection.bands.len());

    let detector = HsvBallDetector::from_config(&config.detection);
    let stats = pipeline::run(&detector, &args.input, &args.output_video, &args.output_log)?;

    info!("✓ Done");
    info!("  Frames processed: {}", stats.frames);
    info!("  Events logged: {}", stats.events);
    info!("  Processing speed: {:.1} FPS", stats.avg_fps);

    Ok(())
}
