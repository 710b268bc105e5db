//! Depth frame to vertex computation.

use crate::source::{ColorFrame, DepthFrame, VideoStreamProfile};
use glam::Vec3;
use tracing::debug;

/// Vertices computed from one depth frame, one per depth pixel.
#[derive(Debug, Clone)]
pub struct Points {
    vertices: Vec<Vec3>,
    texture_coordinates: Vec<[f32; 2]>,
    profile: VideoStreamProfile,
}

impl Points {
    /// Row-major vertices. Pixels without a depth reading are at the origin.
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Normalized coordinates into the mapped color frame.
    pub fn texture_coordinates(&self) -> &[[f32; 2]] {
        &self.texture_coordinates
    }

    /// Profile of the depth stream these vertices came from.
    pub fn profile(&self) -> VideoStreamProfile {
        self.profile
    }

    pub fn size(&self) -> usize {
        self.vertices.len()
    }
}

/// Computes camera-space vertices from depth frames, optionally mapped onto a
/// color frame for texturing.
#[derive(Debug, Default)]
pub struct PointCloudBlock {
    mapped: Option<VideoStreamProfile>,
}

impl PointCloudBlock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map subsequent calculations onto `color`'s image for texture coordinates.
    pub fn map_to(&mut self, color: &ColorFrame) {
        self.mapped = Some(color.profile());
    }

    /// Deproject every pixel of `depth`.
    pub fn calculate(&self, depth: &DepthFrame) -> Points {
        let profile = depth.profile();
        let intrinsics = depth.intrinsics();
        let (w, h) = (profile.width, profile.height);

        let scale = depth.depth_scale();
        let mut vertices = Vec::with_capacity(profile.pixel_count());
        let mut texture_coordinates = Vec::with_capacity(profile.pixel_count());
        let mut invalid = 0usize;

        for (v, row) in depth.data().chunks_exact((w as usize).max(1)).enumerate() {
            for (u, &raw) in row.iter().enumerate() {
                // Zero means no measurement.
                if raw == 0 {
                    invalid += 1;
                    vertices.push(Vec3::ZERO);
                    texture_coordinates.push([0.0, 0.0]);
                    continue;
                }

                let (u, v) = (u as f32, v as f32);
                vertices.push(intrinsics.deproject(u, v, f32::from(raw) * scale));
                texture_coordinates.push(match self.mapped {
                    Some(_) => [(u + 0.5) / w as f32, (v + 0.5) / h as f32],
                    None => [0.0, 0.0],
                });
            }
        }

        debug!(
            "Calculated {} vertices from depth frame {} ({} without depth)",
            vertices.len(),
            depth.frame_number,
            invalid
        );

        Points {
            vertices,
            texture_coordinates,
            profile,
        }
    }
}
