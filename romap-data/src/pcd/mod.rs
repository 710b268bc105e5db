//! ASCII PCD (v0.7) storage for point clouds.

mod header;
mod reader;
mod writer;

pub use header::{DataFormat, PcdHeader};
pub use reader::{read_pcd, read_pcd_from};
pub use writer::{write_pcd_ascii, write_pcd_ascii_to};
