//! Common capture source types and traits.

use glam::Vec3;
use image::{Pixel, Rgb, RgbImage};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during capture.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("Failed to open device: {0}")]
    OpenFailed(String),

    #[error("Failed to capture frame: {0}")]
    CaptureFailed(String),

    #[error("Stream ended")]
    StreamEnded,

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Frame buffer holds {actual} samples, {width}x{height} needs {expected}")]
    ResolutionMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Resolution and rate of a video stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoStreamProfile {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

impl VideoStreamProfile {
    pub fn new(width: u32, height: u32, fps: u32) -> Self {
        Self { width, height, fps }
    }

    /// Number of pixels in one frame.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Pinhole intrinsics of the depth sensor, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intrinsics {
    pub fx: f32,
    pub fy: f32,
    pub ppx: f32,
    pub ppy: f32,
}

impl Intrinsics {
    /// Square-pixel intrinsics for a sensor with the given horizontal field of view.
    pub fn from_fov(width: u32, height: u32, horizontal_fov_deg: f32) -> Self {
        let f = (width as f32 * 0.5) / (horizontal_fov_deg.to_radians() * 0.5).tan();
        Self {
            fx: f,
            fy: f,
            ppx: width as f32 * 0.5,
            ppy: height as f32 * 0.5,
        }
    }

    /// Deproject pixel `(u, v)` at `depth` meters into camera space.
    pub fn deproject(&self, u: f32, v: f32, depth: f32) -> Vec3 {
        Vec3::new(
            (u - self.ppx) * depth / self.fx,
            (v - self.ppy) * depth / self.fy,
            depth,
        )
    }
}

/// A depth frame in raw sensor units (z16).
#[derive(Debug, Clone)]
pub struct DepthFrame {
    profile: VideoStreamProfile,
    intrinsics: Intrinsics,
    /// Meters per raw depth unit.
    depth_scale: f32,
    data: Vec<u16>,
    /// Frame number.
    pub frame_number: u64,
    /// Frame timestamp in seconds (relative to stream start).
    pub timestamp: f64,
}

impl DepthFrame {
    pub fn new(
        profile: VideoStreamProfile,
        intrinsics: Intrinsics,
        depth_scale: f32,
        data: Vec<u16>,
        frame_number: u64,
        timestamp: f64,
    ) -> Result<Self, CaptureError> {
        if data.len() != profile.pixel_count() {
            return Err(CaptureError::ResolutionMismatch {
                width: profile.width,
                height: profile.height,
                expected: profile.pixel_count(),
                actual: data.len(),
            });
        }
        Ok(Self {
            profile,
            intrinsics,
            depth_scale,
            data,
            frame_number,
            timestamp,
        })
    }

    pub fn profile(&self) -> VideoStreamProfile {
        self.profile
    }

    pub fn intrinsics(&self) -> Intrinsics {
        self.intrinsics
    }

    pub fn depth_scale(&self) -> f32 {
        self.depth_scale
    }

    /// Raw depth samples, row-major.
    pub fn data(&self) -> &[u16] {
        &self.data
    }
}

/// A color frame.
#[derive(Debug, Clone)]
pub struct ColorFrame {
    /// RGB image data.
    pub image: RgbImage,
    pub fps: u32,
    /// Frame number.
    pub frame_number: u64,
    /// Frame timestamp in seconds (relative to stream start).
    pub timestamp: f64,
}

impl ColorFrame {
    pub fn new(image: RgbImage, fps: u32, frame_number: u64, timestamp: f64) -> Self {
        Self {
            image,
            fps,
            frame_number,
            timestamp,
        }
    }

    pub fn profile(&self) -> VideoStreamProfile {
        let (width, height) = self.image.dimensions();
        VideoStreamProfile::new(width, height, self.fps)
    }

    /// Bits used to encode one pixel (24 for RGB8).
    pub fn bits_per_pixel(&self) -> u8 {
        Rgb::<u8>::CHANNEL_COUNT * 8
    }
}

/// A synchronized depth + color pair.
#[derive(Debug, Clone)]
pub struct FrameSet {
    pub depth: DepthFrame,
    pub color: ColorFrame,
}

impl FrameSet {
    pub fn depth_frame(&self) -> &DepthFrame {
        &self.depth
    }

    pub fn color_frame(&self) -> &ColorFrame {
        &self.color
    }
}

/// A depth camera delivering synchronized depth/color frame sets.
pub trait CameraStream {
    /// Block until the next frame set is available.
    fn wait_for_frames(&mut self) -> Result<FrameSet, CaptureError>;

    /// Get the frame rate, if known.
    fn frame_rate(&self) -> Option<f32>;

    /// Check if the stream is still active.
    fn is_active(&self) -> bool;

    /// Stop streaming.
    fn stop(&mut self);

    /// Discard `frames` frame sets so auto-exposure can settle.
    fn warm_up(&mut self, frames: usize) -> Result<(), CaptureError> {
        for _ in 0..frames {
            self.wait_for_frames()?;
        }
        debug!("Discarded {} warm-up frames", frames);
        Ok(())
    }
}
