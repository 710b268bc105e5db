//! Depth vertices to structured point cloud.

use crate::error::CloudError;
use crate::types::{Point, PointCloud};
use glam::Vec3;
use tracing::debug;

/// Build a structured cloud from a depth vertex grid.
///
/// Every position is copied verbatim from `vertices` and every point gets
/// `color_metadata` as its alpha. The color frame's bits-per-pixel is broadcast
/// here, not a color sampled per point. The result is never marked dense because
/// the sensor reports invalid pixels as zero-depth vertices.
pub fn build_point_cloud(
    vertices: &[Vec3],
    color_metadata: u8,
    width: u32,
    height: u32,
) -> Result<PointCloud, CloudError> {
    let expected = (width as usize)
        .checked_mul(height as usize)
        .filter(|&n| n > 0)
        .ok_or(CloudError::InvalidInputShape {
            width,
            height,
            expected: 0,
            actual: vertices.len(),
        })?;

    if vertices.len() != expected {
        return Err(CloudError::InvalidInputShape {
            width,
            height,
            expected,
            actual: vertices.len(),
        });
    }

    let points: Vec<Point> = vertices
        .iter()
        .map(|&v| Point::new(v, color_metadata))
        .collect();

    debug!(
        "Built {}x{} point cloud ({} points, alpha={})",
        width,
        height,
        points.len(),
        color_metadata
    );

    Ok(PointCloud {
        points,
        width,
        height,
        is_dense: false,
    })
}
