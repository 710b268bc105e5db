//! Program configuration.
//!
//! Every section has defaults that reproduce a plain capture: 29 warm-up frames,
//! a z pass-through on [0, 1] meters and output to `Captured_Frame.pcd`. A JSON
//! file may override any subset of fields, and command-line flags override both.

use crate::errors::AppError;
use romap_capture::CaptureConfig;
use romap_data::{Axis, PassThrough};
use romap_viewer::ViewerConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_OUTPUT: &str = "Captured_Frame.pcd";

/// Pass-through filter settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub axis: Axis,
    pub min: f32,
    pub max: f32,
    pub negative: bool,
}

impl FilterConfig {
    pub fn pass_through(&self) -> PassThrough {
        PassThrough::new(self.axis, self.min, self.max).negative(self.negative)
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            axis: Axis::Z,
            min: 0.0,
            max: 1.0,
            negative: false,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Top-level configuration for a capture run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub output: PathBuf,
    /// Load the written file back and show it.
    pub view: bool,
    pub capture: CaptureConfig,
    pub filter: FilterConfig,
    pub viewer: ViewerConfig,
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            view: true,
            capture: CaptureConfig::default(),
            filter: FilterConfig::default(),
            viewer: ViewerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load from a JSON file, or use defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(text)?)
    }
}
