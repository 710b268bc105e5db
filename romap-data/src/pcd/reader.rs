use super::header::{DataFormat, PcdHeader};
use crate::error::PcdError;
use crate::types::{Point, PointCloud};
use glam::Vec3;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

/// Load an ASCII PCD file.
///
/// Files without an `rgba` (or `rgb`) field load with zero color and alpha.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn read_pcd(path: impl AsRef<Path>) -> Result<PointCloud, PcdError> {
    let file = File::open(path.as_ref())?;
    let cloud = read_pcd_from(BufReader::new(file))?;
    info!(
        "Loaded {} points ({}x{}, dense={})",
        cloud.len(),
        cloud.width,
        cloud.height,
        cloud.is_dense
    );
    Ok(cloud)
}

/// Load ASCII PCD from any reader.
pub fn read_pcd_from<R: Read>(mut reader: R) -> Result<PointCloud, PcdError> {
    let mut raw = Vec::new();
    reader.read_to_end(&mut raw)?;
    // Binary bodies are not UTF-8; the header always is.
    let text = String::from_utf8_lossy(&raw);

    let (header, header_lines) = PcdHeader::parse(&text)?;
    if header.data != DataFormat::Ascii {
        return Err(PcdError::Unsupported(format!("DATA {:?}", header.data)));
    }

    let ix = header.field_index("x").ok_or(PcdError::MissingHeader("x field"))?;
    let iy = header.field_index("y").ok_or(PcdError::MissingHeader("y field"))?;
    let iz = header.field_index("z").ok_or(PcdError::MissingHeader("z field"))?;
    let icolor = header
        .field_index("rgba")
        .or_else(|| header.field_index("rgb"));

    // POINTS comes from the file; never reserve more than the body can hold.
    let body_lines = text.lines().count().saturating_sub(header_lines);
    let mut points = Vec::with_capacity(header.points.min(body_lines));
    for (offset, line) in text.lines().enumerate().skip(header_lines) {
        let line_no = offset + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let columns: Vec<&str> = trimmed.split_whitespace().collect();
        if columns.len() != header.fields.len() {
            return Err(PcdError::InvalidData {
                line: line_no,
                reason: format!(
                    "expected {} columns, found {}",
                    header.fields.len(),
                    columns.len()
                ),
            });
        }

        let coord = |i: usize| -> Result<f32, PcdError> {
            columns[i].parse::<f32>().map_err(|e| PcdError::InvalidData {
                line: line_no,
                reason: format!("{} '{}': {}", header.fields[i], columns[i], e),
            })
        };
        let position = Vec3::new(coord(ix)?, coord(iy)?, coord(iz)?);

        let point = match icolor {
            Some(ic) => {
                let rgba = parse_color(columns[ic], header.field_type(ic)).ok_or_else(|| {
                    PcdError::InvalidData {
                        line: line_no,
                        reason: format!("bad color value '{}'", columns[ic]),
                    }
                })?;
                Point::from_rgba_packed(position, rgba)
            }
            None => Point::new(position, 0),
        };
        points.push(point);
    }

    if points.len() != header.points {
        return Err(PcdError::PointCountMismatch {
            declared: header.points,
            actual: points.len(),
        });
    }

    let is_dense = points.iter().all(Point::is_finite);
    let grid = (header.width as usize).checked_mul(header.height as usize);
    let cloud = if grid == Some(points.len()) {
        PointCloud {
            points,
            width: header.width,
            height: header.height,
            is_dense,
        }
    } else {
        debug!(
            "Header grid {}x{} does not match {} points, loading unstructured",
            header.width,
            header.height,
            points.len()
        );
        PointCloud::unstructured(points)?
    };

    Ok(cloud)
}

/// Colors are stored as packed integers (`U`) or as the float reinterpretation of
/// the same bits (`F`), depending on the writer.
fn parse_color(raw: &str, ty: char) -> Option<u32> {
    match ty {
        'F' => raw.parse::<f32>().ok().map(f32::to_bits),
        _ => raw.parse::<u32>().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pcd::write_pcd_ascii;
    use proptest::prelude::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_roundtrip_structured_cloud() {
        let cloud = PointCloud {
            points: vec![
                Point::new(Vec3::new(0.0, 0.0, 0.0), 24),
                Point::new(Vec3::new(-0.25, 0.5, 0.75), 24),
                Point::new(Vec3::new(1.0, 2.0, 3.0), 24),
                Point::new(Vec3::new(0.125, -4.5, 0.001), 24),
            ],
            width: 2,
            height: 2,
            is_dense: true,
        };
        let tmp = NamedTempFile::new().unwrap();
        write_pcd_ascii(tmp.path(), &cloud).unwrap();
        let loaded = read_pcd(tmp.path()).unwrap();
        assert_eq!(loaded, cloud);
    }

    #[test]
    fn test_empty_cloud_roundtrip() {
        let tmp = NamedTempFile::new().unwrap();
        write_pcd_ascii(tmp.path(), &PointCloud::new()).unwrap();
        let loaded = read_pcd(tmp.path()).unwrap();
        assert!(loaded.is_empty());
        assert_eq!(loaded.height, 1);
    }

    #[test]
    fn test_xyz_only_file() {
        let text = "VERSION 0.7\nFIELDS x y z\nSIZE 4 4 4\nTYPE F F F\nCOUNT 1 1 1\n\
                    WIDTH 2\nHEIGHT 1\nPOINTS 2\nDATA ascii\n1 2 3\n4 5 6\n";
        let cloud = read_pcd_from(text.as_bytes()).unwrap();
        assert_eq!(cloud.len(), 2);
        assert_eq!(cloud.points[1].position, Vec3::new(4.0, 5.0, 6.0));
        assert_eq!(cloud.points[1].alpha, 0);
    }

    #[test]
    fn test_float_packed_rgb() {
        let packed = 0x18ff_8000u32;
        let text = format!(
            "FIELDS x y z rgb\nTYPE F F F F\nWIDTH 1\nPOINTS 1\nDATA ascii\n0 0 1 {}\n",
            f32::from_bits(packed)
        );
        let cloud = read_pcd_from(text.as_bytes()).unwrap();
        assert_eq!(cloud.points[0].color, [0xff, 0x80, 0x00]);
        assert_eq!(cloud.points[0].alpha, 0x18);
    }

    #[test]
    fn test_nan_points_are_not_dense() {
        let text = "FIELDS x y z\nWIDTH 2\nPOINTS 2\nDATA ascii\nnan nan nan\n1 1 1\n";
        let cloud = read_pcd_from(text.as_bytes()).unwrap();
        assert_eq!(cloud.len(), 2);
        assert!(!cloud.is_dense);
    }

    #[test]
    fn test_binary_is_unsupported() {
        let text = "FIELDS x y z\nWIDTH 1\nPOINTS 1\nDATA binary\n\0\0\0\0";
        let err = read_pcd_from(text.as_bytes()).unwrap_err();
        assert!(matches!(err, PcdError::Unsupported(_)));
    }

    #[test]
    fn test_column_count_mismatch() {
        let text = "FIELDS x y z\nWIDTH 1\nPOINTS 1\nDATA ascii\n1 2\n";
        let err = read_pcd_from(text.as_bytes()).unwrap_err();
        assert!(matches!(err, PcdError::InvalidData { line: 5, .. }));
    }

    #[test]
    fn test_point_count_mismatch() {
        let text = "FIELDS x y z\nWIDTH 3\nPOINTS 3\nDATA ascii\n1 2 3\n";
        let err = read_pcd_from(text.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            PcdError::PointCountMismatch { declared: 3, actual: 1 }
        ));
    }

    #[test]
    fn test_huge_declared_point_count() {
        let text = "FIELDS x y z\nWIDTH 1\nPOINTS 18446744073709551615\nDATA ascii\n1 2 3\n";
        let err = read_pcd_from(text.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            PcdError::PointCountMismatch { declared: usize::MAX, actual: 1 }
        ));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_huge_grid_without_points_line() {
        let text = "FIELDS x y z\nWIDTH 4294967295\nHEIGHT 4294967295\nDATA ascii\n1 2 3\n";
        let err = read_pcd_from(text.as_bytes()).unwrap_err();
        assert!(matches!(err, PcdError::PointCountMismatch { actual: 1, .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = read_pcd("/nonexistent/romap/missing.pcd").unwrap_err();
        assert!(matches!(err, PcdError::Io(_)));
    }

    proptest! {
        #[test]
        fn pcd_roundtrip_preserves_points(
            pts in prop::collection::vec(
                (-100.0f32..100.0f32, -100.0f32..100.0f32, 0.0f32..10.0f32, any::<u8>()),
                0..100
            )
        ) {
            let cloud = PointCloud::unstructured(
                pts.iter()
                    .map(|&(x, y, z, a)| Point::new(Vec3::new(x, y, z), a))
                    .collect(),
            )
            .unwrap();
            let mut buf = Vec::new();
            crate::pcd::write_pcd_ascii_to(&mut buf, &cloud).unwrap();
            let loaded = read_pcd_from(buf.as_slice()).unwrap();
            prop_assert_eq!(loaded, cloud);
        }
    }
}
