//! Viewer interface shared by all point cloud viewers.

use romap_data::PointCloud;
use serde::Deserialize;
use std::io::BufRead;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while viewing a cloud.
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("No point cloud has been added to the viewer")]
    NoCloud,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Viewer settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub title: String,
    /// Background color (RGB, 0-1 range).
    pub background: [f32; 3],
    pub point_size: f32,
    /// Delay between two `spin_once` calls of the view loop, in milliseconds.
    pub spin_interval_ms: u64,
    /// Stop on its own after this many spins.
    pub max_spins: Option<u32>,
    /// Print every point when a cloud is added.
    pub dump_points: bool,
}

impl ViewerConfig {
    pub fn spin_interval(&self) -> Duration {
        Duration::from_millis(self.spin_interval_ms)
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "Room Map".to_string(),
            background: [0.0, 0.0, 0.0],
            point_size: 1.0,
            spin_interval_ms: 100,
            max_spins: None,
            dump_points: true,
        }
    }
}

/// Thread-safe flag a user (or anything else) raises to close the viewer.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Raise the signal once a line (or EOF) arrives on `input`.
    pub fn watch<R: BufRead + Send + 'static>(&self, mut input: R) -> JoinHandle<()> {
        let signal = self.clone();
        std::thread::spawn(move || {
            let mut line = String::new();
            let _ = input.read_line(&mut line);
            debug!("Stop requested from input");
            signal.raise();
        })
    }
}

/// Something that can display a point cloud until told to stop.
pub trait PointCloudViewer {
    /// Add a cloud under the given id and render it.
    fn add_point_cloud(&mut self, cloud: &PointCloud, id: &str) -> Result<(), ViewerError>;

    /// Process one iteration of the view loop, waiting up to `interval`.
    fn spin_once(&mut self, interval: Duration) -> Result<(), ViewerError>;

    /// True once the viewer should close.
    fn was_stopped(&self) -> bool;

    /// Spin until stopped. Returns the number of spins performed.
    fn run(&mut self, interval: Duration) -> Result<u32, ViewerError> {
        let mut spins = 0;
        while !self.was_stopped() {
            self.spin_once(interval)?;
            spins += 1;
        }
        info!("Viewer closed after {} spins", spins);
        Ok(spins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_signal_is_shared() {
        let signal = StopSignal::new();
        let clone = signal.clone();
        assert!(!signal.is_raised());
        clone.raise();
        assert!(signal.is_raised());
    }

    #[test]
    fn test_watch_raises_on_line() {
        let signal = StopSignal::new();
        signal
            .watch(std::io::Cursor::new(b"\n".to_vec()))
            .join()
            .unwrap();
        assert!(signal.is_raised());
    }

    #[test]
    fn test_default_config() {
        let config = ViewerConfig::default();
        assert_eq!(config.title, "Room Map");
        assert_eq!(config.spin_interval(), Duration::from_millis(100));
        assert_eq!(config.max_spins, None);
    }
}
