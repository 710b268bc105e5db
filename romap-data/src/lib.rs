//! Romap Data Crate
//!
//! Point cloud types and the CPU-side processing applied to a captured depth frame:
//! conversion of depth vertices into a structured cloud, pass-through filtering
//! along one axis, and ASCII PCD storage.

pub mod convert;
pub mod error;
pub mod filter;
pub mod pcd;
pub mod types;

pub use convert::build_point_cloud;
pub use error::{CloudError, PcdError};
pub use filter::{PassThrough, filter_by_axis_range};
pub use pcd::{read_pcd, write_pcd_ascii};
pub use types::{Axis, Point, PointCloud};
