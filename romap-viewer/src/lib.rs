//! Romap Viewer
//!
//! The viewer side of the capture program: a `PointCloudViewer` trait with
//! `add_point_cloud` / `spin_once` / `was_stopped`, and a console implementation
//! that prints the cloud and idles until the user asks it to stop.

mod console;
mod viewer;

pub use console::ConsoleViewer;
pub use viewer::{PointCloudViewer, StopSignal, ViewerConfig, ViewerError};
