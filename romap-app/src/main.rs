//! Romap
//!
//! Captures one depth + color frame pair, converts it into a point cloud, keeps
//! the points inside a range on one axis, writes them to an ASCII PCD file and
//! shows the stored result.

mod app;
mod config;
mod errors;

use clap::Parser;
use config::AppConfig;
use errors::AppError;
use romap_capture::SyntheticCamera;
use romap_data::Axis;
use romap_viewer::ConsoleViewer;
use std::path::PathBuf;
use tracing::{error, info};

/// Romap - depth frame to filtered point cloud
#[derive(Parser, Debug)]
#[command(name = "romap")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output PCD file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Axis to filter on (x, y, z)
    #[arg(long)]
    axis: Option<Axis>,

    /// Lower filter limit in meters (inclusive)
    #[arg(long, allow_hyphen_values = true)]
    min: Option<f32>,

    /// Upper filter limit in meters (inclusive)
    #[arg(long, allow_hyphen_values = true)]
    max: Option<f32>,

    /// Keep the points outside the filter limits
    #[arg(long)]
    negative: bool,

    /// Frames discarded before capturing
    #[arg(long)]
    warmup: Option<usize>,

    /// Capture width
    #[arg(long)]
    width: Option<u32>,

    /// Capture height
    #[arg(long)]
    height: Option<u32>,

    /// Capture frame rate
    #[arg(long)]
    fps: Option<u32>,

    /// Write the file without showing it
    #[arg(long)]
    no_view: bool,

    /// Close the viewer after this many spins
    #[arg(long)]
    max_spins: Option<u32>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    /// Apply command-line overrides on top of the loaded configuration.
    fn apply(self, mut config: AppConfig) -> AppConfig {
        if let Some(output) = self.output {
            config.output = output;
        }
        if let Some(axis) = self.axis {
            config.filter.axis = axis;
        }
        if let Some(min) = self.min {
            config.filter.min = min;
        }
        if let Some(max) = self.max {
            config.filter.max = max;
        }
        if self.negative {
            config.filter.negative = true;
        }
        if let Some(warmup) = self.warmup {
            config.capture.warmup_frames = warmup;
        }
        if let Some(width) = self.width {
            config.capture.width = width;
        }
        if let Some(height) = self.height {
            config.capture.height = height;
        }
        if let Some(fps) = self.fps {
            config.capture.fps = fps;
        }
        if self.no_view {
            config.view = false;
        }
        if let Some(max_spins) = self.max_spins {
            config.viewer.max_spins = Some(max_spins);
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
        config
    }
}

fn init_tracing(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .init();
}

fn run(config: AppConfig) -> Result<(), AppError> {
    let mut camera = SyntheticCamera::new(config.capture.clone())?;
    let mut viewer = ConsoleViewer::stdout(config.viewer.clone());
    if config.viewer.max_spins.is_none() {
        viewer = viewer.stop_on_enter();
    }

    let summary = app::run(&config, &mut camera, Some(&mut viewer))?;
    info!(
        "Kept {} of {} points ({} bpp), written to {}",
        summary.kept,
        summary.captured,
        summary.bits_per_pixel,
        summary.output.display()
    );
    info!("Exiting");
    Ok(())
}

fn main() {
    let args = Args::parse();

    let config = match AppConfig::load(args.config.as_deref()) {
        Ok(config) => args.apply(config),
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging.level);

    if let Err(e) = run(config) {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}
