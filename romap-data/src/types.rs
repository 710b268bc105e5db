//! Core point cloud types.
//!
//! These mirror the layout of an XYZRGBA point: a camera-relative position plus a
//! packed color with a separate alpha byte. Clouds are structured (width x height)
//! when they come straight from a depth frame and flat (width = len, height = 1)
//! once they have been filtered.

use crate::error::CloudError;
use glam::Vec3;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// A colored point in camera space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// Position in meters, relative to the depth sensor.
    pub position: Vec3,
    /// RGB color.
    pub color: [u8; 3],
    /// Alpha / metadata channel.
    pub alpha: u8,
}

impl Point {
    /// Create a point with a black color and the given alpha.
    pub fn new(position: Vec3, alpha: u8) -> Self {
        Self {
            position,
            color: [0, 0, 0],
            alpha,
        }
    }

    /// Pack color and alpha the way the PCD `rgba` field stores them.
    pub fn rgba_packed(&self) -> u32 {
        let [r, g, b] = self.color;
        (u32::from(self.alpha) << 24) | (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
    }

    /// Inverse of [`Point::rgba_packed`].
    pub fn from_rgba_packed(position: Vec3, rgba: u32) -> Self {
        Self {
            position,
            color: [(rgba >> 16) as u8, (rgba >> 8) as u8, rgba as u8],
            alpha: (rgba >> 24) as u8,
        }
    }

    /// Coordinate along one axis.
    pub fn coordinate(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.position.x,
            Axis::Y => self.position.y,
            Axis::Z => self.position.z,
        }
    }

    /// True when every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(Vec3::ZERO, 0)
    }
}

/// An ordered collection of points with structured-grid metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud {
    pub points: Vec<Point>,
    /// Grid width (or point count for unstructured clouds).
    pub width: u32,
    /// Grid height (1 for unstructured clouds).
    pub height: u32,
    /// Whether every grid cell holds a valid point.
    pub is_dense: bool,
}

impl PointCloud {
    /// An empty, unstructured cloud.
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
            width: 0,
            height: 1,
            is_dense: true,
        }
    }

    /// Wrap a flat list of points as an unstructured cloud (`height == 1`).
    ///
    /// The cloud is dense only when every point is finite.
    pub fn unstructured(points: Vec<Point>) -> Result<Self, CloudError> {
        let width = flat_width(points.len())?;
        let is_dense = points.iter().all(Point::is_finite);
        Ok(Self {
            points,
            width,
            height: 1,
            is_dense,
        })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// True when `width * height` describes the point count.
    pub fn is_organized(&self) -> bool {
        self.height > 1 && (self.width as usize) * (self.height as usize) == self.points.len()
    }

    pub fn iter_positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.points.iter().map(|p| p.position)
    }

    /// The alpha of the first point. Clouds built from a frame carry the color
    /// frame's bits-per-pixel here.
    pub fn bits_per_pixel(&self) -> Option<u8> {
        self.points.first().map(|p| p.alpha)
    }
}

impl Default for PointCloud {
    fn default() -> Self {
        Self::new()
    }
}

/// Width of a flat cloud holding `count` points.
pub(crate) fn flat_width(count: usize) -> Result<u32, CloudError> {
    u32::try_from(count).map_err(|_| CloudError::TooManyPoints { count })
}

/// Coordinate axis selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Field name as it appears in a PCD header.
    pub fn field_name(&self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

impl FromStr for Axis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "x" | "X" => Ok(Axis::X),
            "y" | "Y" => Ok(Axis::Y),
            "z" | "Z" => Ok(Axis::Z),
            other => Err(format!("unknown axis '{}', expected one of x/y/z", other)),
        }
    }
}
