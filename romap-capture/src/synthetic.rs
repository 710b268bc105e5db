//! Deterministic depth camera for running the pipeline without hardware.
//!
//! The scene is a flat wall with a box in front of it. A band of columns on the
//! left edge reports no depth, like the blind strip of a stereo depth sensor.

use crate::source::{
    CameraStream, CaptureError, ColorFrame, DepthFrame, FrameSet, Intrinsics, VideoStreamProfile,
};
use image::{Rgb, RgbImage};
use serde::Deserialize;
use tracing::{debug, info};

/// Stream configuration for a capture device.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    /// Frame sets discarded before the capture.
    pub warmup_frames: usize,
    pub horizontal_fov_deg: f32,
    /// Distance to the back wall in meters.
    pub wall_distance: f32,
    /// Distance to the front face of the box in meters.
    pub box_distance: f32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            fps: 30,
            warmup_frames: 29,
            horizontal_fov_deg: 87.0,
            wall_distance: 1.5,
            box_distance: 0.6,
        }
    }
}

/// Meters per raw depth unit (millimeters).
const DEPTH_SCALE: f32 = 0.001;

/// Synthetic depth + color source.
pub struct SyntheticCamera {
    config: CaptureConfig,
    intrinsics: Intrinsics,
    frame_count: u64,
    active: bool,
}

impl SyntheticCamera {
    /// Open the synthetic device with the given stream configuration.
    pub fn new(config: CaptureConfig) -> Result<Self, CaptureError> {
        if config.width == 0 || config.height == 0 {
            return Err(CaptureError::OpenFailed(format!(
                "invalid resolution {}x{}",
                config.width, config.height
            )));
        }
        if config.fps == 0 {
            return Err(CaptureError::OpenFailed("frame rate must be positive".to_string()));
        }
        if !(config.horizontal_fov_deg > 0.0 && config.horizontal_fov_deg < 180.0) {
            return Err(CaptureError::UnsupportedFormat(format!(
                "horizontal field of view {}",
                config.horizontal_fov_deg
            )));
        }

        let intrinsics =
            Intrinsics::from_fov(config.width, config.height, config.horizontal_fov_deg);
        info!(
            "Synthetic camera opened: {}x{} @ {} fps",
            config.width, config.height, config.fps
        );

        Ok(Self {
            config,
            intrinsics,
            frame_count: 0,
            active: true,
        })
    }

    pub fn profile(&self) -> VideoStreamProfile {
        VideoStreamProfile::new(self.config.width, self.config.height, self.config.fps)
    }

    pub fn frames_captured(&self) -> u64 {
        self.frame_count
    }

    fn to_raw(meters: f32) -> u16 {
        (meters / DEPTH_SCALE).round().clamp(0.0, u16::MAX as f32) as u16
    }

    fn render_depth(&self) -> Vec<u16> {
        let (w, h) = (self.config.width, self.config.height);
        let wall = Self::to_raw(self.config.wall_distance);
        let front = Self::to_raw(self.config.box_distance);
        let blind = w / 12;

        let mut data = Vec::with_capacity(w as usize * h as usize);
        for v in 0..h {
            for u in 0..w {
                let in_box = (w / 3..2 * w / 3).contains(&u) && (h / 3..2 * h / 3).contains(&v);
                data.push(if u < blind {
                    0
                } else if in_box {
                    front
                } else {
                    wall
                });
            }
        }
        data
    }

    fn render_color(&self) -> RgbImage {
        let (w, h) = (self.config.width, self.config.height);
        let shade = (self.frame_count % 256) as u8;
        RgbImage::from_fn(w, h, |u, v| {
            Rgb([(u * 255 / w) as u8, (v * 255 / h) as u8, shade])
        })
    }
}

impl CameraStream for SyntheticCamera {
    fn wait_for_frames(&mut self) -> Result<FrameSet, CaptureError> {
        if !self.active {
            return Err(CaptureError::StreamEnded);
        }

        self.frame_count += 1;
        let timestamp = self.frame_count as f64 / f64::from(self.config.fps);

        let depth = DepthFrame::new(
            self.profile(),
            self.intrinsics,
            DEPTH_SCALE,
            self.render_depth(),
            self.frame_count,
            timestamp,
        )?;
        let color =
            ColorFrame::new(self.render_color(), self.config.fps, self.frame_count, timestamp);

        debug!("Captured frame set {} at {:.3}s", self.frame_count, timestamp);
        Ok(FrameSet { depth, color })
    }

    fn frame_rate(&self) -> Option<f32> {
        Some(self.config.fps as f32)
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn stop(&mut self) {
        if self.active {
            self.active = false;
            info!("Synthetic capture stopped after {} frames", self.frame_count);
        }
    }
}

impl Drop for SyntheticCamera {
    fn drop(&mut self) {
        self.stop();
    }
}
