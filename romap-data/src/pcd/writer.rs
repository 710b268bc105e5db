use super::header::PcdHeader;
use crate::error::PcdError;
use crate::types::{PointCloud, flat_width};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Write a cloud to `path` as ASCII PCD with `x y z rgba` fields.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn write_pcd_ascii(path: impl AsRef<Path>, cloud: &PointCloud) -> Result<(), PcdError> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write_pcd_ascii_to(&mut writer, cloud)?;
    writer.flush()?;

    info!("Wrote {} points", cloud.len());
    Ok(())
}

/// Write ASCII PCD to any writer.
pub fn write_pcd_ascii_to<W: Write>(writer: &mut W, cloud: &PointCloud) -> Result<(), PcdError> {
    // A grid that doesn't describe the points is written flat.
    let (width, height) = if cloud.is_organized() {
        (cloud.width, cloud.height)
    } else {
        (flat_width(cloud.len())?, 1)
    };

    let header = PcdHeader::xyzrgba(width, height, cloud.len());
    writer.write_all(header.render().as_bytes())?;

    for p in &cloud.points {
        writeln!(
            writer,
            "{} {} {} {}",
            p.position.x,
            p.position.y,
            p.position.z,
            p.rgba_packed()
        )?;
    }

    Ok(())
}
