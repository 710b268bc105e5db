//! Text viewer that prints a cloud and idles until stopped.

use crate::viewer::{PointCloudViewer, StopSignal, ViewerConfig, ViewerError};
use romap_data::PointCloud;
use std::io::{BufRead, BufReader, Write};
use std::time::Duration;
use tracing::{debug, info};

/// Console viewer writing to any `Write` sink (stdout by default).
pub struct ConsoleViewer<W: Write> {
    config: ViewerConfig,
    out: W,
    stop: StopSignal,
    /// Watched for a stop request once a cloud is on screen.
    stop_input: Option<Box<dyn BufRead + Send>>,
    cloud_id: Option<String>,
    spins: u32,
}

impl ConsoleViewer<std::io::Stdout> {
    /// Viewer printing to stdout.
    pub fn stdout(config: ViewerConfig) -> Self {
        Self::new(config, std::io::stdout())
    }
}

impl<W: Write> ConsoleViewer<W> {
    pub fn new(config: ViewerConfig, out: W) -> Self {
        info!(
            "Viewer '{}' ready (background {:?}, point size {})",
            config.title, config.background, config.point_size
        );
        Self {
            config,
            out,
            stop: StopSignal::new(),
            stop_input: None,
            cloud_id: None,
            spins: 0,
        }
    }

    /// Use an externally owned stop signal.
    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = stop;
        self
    }

    /// Close when a line arrives on `input`. Watching starts with the first
    /// added cloud.
    pub fn stop_on_input<R: BufRead + Send + 'static>(mut self, input: R) -> Self {
        self.stop_input = Some(Box::new(input));
        self
    }

    /// Close when Enter is pressed.
    pub fn stop_on_enter(self) -> Self {
        self.stop_on_input(BufReader::new(std::io::stdin()))
    }

    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    pub fn spins(&self) -> u32 {
        self.spins
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> PointCloudViewer for ConsoleViewer<W> {
    fn add_point_cloud(&mut self, cloud: &PointCloud, id: &str) -> Result<(), ViewerError> {
        writeln!(
            self.out,
            "Loaded {} data points from {} with the following fields: ",
            cloud.width as u64 * cloud.height as u64,
            id
        )?;

        if self.config.dump_points {
            for p in cloud.iter_positions() {
                writeln!(self.out, "    {} {} {}", p.x, p.y, p.z)?;
            }
        }
        self.out.flush()?;

        if let Some(input) = self.stop_input.take() {
            let _ = self.stop.watch(input);
            info!("Press Enter to close the viewer");
        }

        self.cloud_id = Some(id.to_string());
        debug!("Added cloud '{}' with {} points", id, cloud.len());
        Ok(())
    }

    fn spin_once(&mut self, interval: Duration) -> Result<(), ViewerError> {
        if self.cloud_id.is_none() {
            return Err(ViewerError::NoCloud);
        }
        if !interval.is_zero() {
            std::thread::sleep(interval);
        }
        self.spins += 1;
        Ok(())
    }

    fn was_stopped(&self) -> bool {
        self.stop.is_raised() || self.config.max_spins.is_some_and(|max| self.spins >= max)
    }
}
