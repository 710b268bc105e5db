//! Romap Capture - depth + color frame sources
//!
//! This crate provides the `CameraStream` trait for devices that deliver
//! synchronized depth/color frame sets, plus the depth-to-vertex computation
//! applied to a captured depth frame:
//!
//! - Synthetic camera (deterministic scene, no hardware required)
//! - `PointCloudBlock` for deprojecting depth frames into camera-space vertices
//!
//! ## Example
//!
//! ```ignore
//! use romap_capture::{CameraStream, CaptureConfig, PointCloudBlock, SyntheticCamera};
//!
//! let mut camera = SyntheticCamera::new(CaptureConfig::default())?;
//! camera.warm_up(29)?;
//! let frames = camera.wait_for_frames()?;
//! let mut pc = PointCloudBlock::new();
//! pc.map_to(&frames.color);
//! let points = pc.calculate(&frames.depth);
//! ```

mod pointcloud;
mod source;
mod synthetic;

pub use pointcloud::{PointCloudBlock, Points};
pub use source::{
    CameraStream, CaptureError, ColorFrame, DepthFrame, FrameSet, Intrinsics, VideoStreamProfile,
};
pub use synthetic::{CaptureConfig, SyntheticCamera};
