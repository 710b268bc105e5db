//! The capture run: grab a frame pair, build and filter the cloud, store it, view it.

use crate::config::AppConfig;
use crate::errors::AppError;
use romap_capture::{CameraStream, PointCloudBlock};
use romap_data::{PointCloud, build_point_cloud, read_pcd, write_pcd_ascii};
use romap_viewer::PointCloudViewer;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// What a capture run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureSummary {
    pub captured: usize,
    pub kept: usize,
    pub bits_per_pixel: u8,
    pub output: PathBuf,
}

/// Warm the camera up, grab one frame set and convert it to a structured cloud.
pub fn capture_cloud<C: CameraStream>(
    camera: &mut C,
    warmup_frames: usize,
) -> Result<PointCloud, AppError> {
    if let Some(fps) = camera.frame_rate() {
        info!("Camera streaming at {} fps", fps);
    }
    camera.warm_up(warmup_frames)?;

    let frames = camera.wait_for_frames()?;
    let mut pc = PointCloudBlock::new();
    pc.map_to(frames.color_frame());
    let points = pc.calculate(frames.depth_frame());

    let profile = points.profile();
    let textured = points
        .texture_coordinates()
        .iter()
        .filter(|uv| **uv != [0.0, 0.0])
        .count();
    debug!(
        "{} vertices, {} with depth mapped onto the color frame",
        points.size(),
        textured
    );

    let cloud = build_point_cloud(
        points.vertices(),
        frames.color_frame().bits_per_pixel(),
        profile.width,
        profile.height,
    )?;

    info!(
        "Captured frame {}: {}x{} cloud",
        frames.depth.frame_number, cloud.width, cloud.height
    );
    Ok(cloud)
}

/// Load a stored cloud into `viewer` and spin until it is stopped.
pub fn load_and_view<V: PointCloudViewer>(
    path: &Path,
    viewer: &mut V,
    interval: Duration,
) -> Result<u32, AppError> {
    let cloud = read_pcd(path)?;
    viewer.add_point_cloud(&cloud, &path.display().to_string())?;
    Ok(viewer.run(interval)?)
}

/// Run the whole capture. `viewer` is skipped when `None` or when viewing is
/// disabled in the configuration.
pub fn run<C, V>(
    config: &AppConfig,
    camera: &mut C,
    viewer: Option<&mut V>,
) -> Result<CaptureSummary, AppError>
where
    C: CameraStream,
    V: PointCloudViewer,
{
    let cloud = capture_cloud(camera, config.capture.warmup_frames)?;
    camera.stop();

    let filter = config.filter.pass_through();
    let filtered = filter.filter(&cloud)?;
    let (min, max) = filter.limits();
    info!(
        "Pass-through on {} in [{}, {}] kept {} of {} points",
        filter.axis(),
        min,
        max,
        filtered.len(),
        cloud.len()
    );

    info!("Generating PCD point cloud file {}", config.output.display());
    write_pcd_ascii(&config.output, &filtered)?;
    info!("{} successfully generated", config.output.display());

    if config.view {
        if let Some(viewer) = viewer {
            load_and_view(&config.output, viewer, config.viewer.spin_interval())?;
        }
    }

    Ok(CaptureSummary {
        captured: cloud.len(),
        kept: filtered.len(),
        bits_per_pixel: cloud.bits_per_pixel().unwrap_or_default(),
        output: config.output.clone(),
    })
}
