//! Pass-through (axis range) filtering.

use crate::error::CloudError;
use crate::types::{Axis, Point, PointCloud};
use tracing::debug;

/// Keeps points whose coordinate along one axis lies in a closed interval.
///
/// The output is always unstructured: `width` is the kept count and `height` is
/// 1. It is marked dense only when every kept point is finite. A NaN on the
/// selected axis never passes, in either mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassThrough {
    axis: Axis,
    low: f32,
    high: f32,
    negative: bool,
}

impl PassThrough {
    pub fn new(axis: Axis, low: f32, high: f32) -> Self {
        Self {
            axis,
            low,
            high,
            negative: false,
        }
    }

    /// Keep the points outside the interval instead of inside it.
    pub fn negative(mut self, negative: bool) -> Self {
        self.negative = negative;
        self
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn limits(&self) -> (f32, f32) {
        (self.low, self.high)
    }

    fn accepts(&self, point: &Point) -> bool {
        let v = point.coordinate(self.axis);
        if v.is_nan() {
            return false;
        }
        let inside = self.low <= v && v <= self.high;
        inside != self.negative
    }

    /// Run the filter. The input is left untouched.
    pub fn filter(&self, cloud: &PointCloud) -> Result<PointCloud, CloudError> {
        // NaN bounds compare false, so they land here too.
        if !(self.low <= self.high) {
            return Err(CloudError::InvalidRange {
                low: self.low,
                high: self.high,
            });
        }

        let kept: Vec<Point> = cloud
            .points
            .iter()
            .filter(|p| self.accepts(p))
            .copied()
            .collect();

        debug!(
            "Pass-through on {} in [{}, {}]{}: kept {} of {} points",
            self.axis,
            self.low,
            self.high,
            if self.negative { " (negative)" } else { "" },
            kept.len(),
            cloud.len()
        );

        PointCloud::unstructured(kept)
    }
}

/// Keep the points with `low <= coordinate(axis) <= high`, in input order.
pub fn filter_by_axis_range(
    cloud: &PointCloud,
    axis: Axis,
    low: f32,
    high: f32,
) -> Result<PointCloud, CloudError> {
    PassThrough::new(axis, low, high).filter(cloud)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::build_point_cloud;
    use glam::Vec3;
    use proptest::prelude::*;

    fn sample_cloud() -> PointCloud {
        let vertices = vec![
            Vec3::new(1.0, 10.0, 100.0),
            Vec3::new(2.0, 20.0, 200.0),
            Vec3::new(3.0, 30.0, 300.0),
            Vec3::new(4.0, 40.0, 400.0),
            Vec3::new(5.0, 50.0, 500.0),
        ];
        build_point_cloud(&vertices, 24, 5, 1).unwrap()
    }

    fn xs(cloud: &PointCloud) -> Vec<f32> {
        cloud.points.iter().map(|p| p.position.x).collect()
    }

    #[test]
    fn test_depth_scenario() {
        let vertices = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 0.5),
            Vec3::new(0.0, 0.0, 1.5),
        ];
        let cloud = build_point_cloud(&vertices, 24, 3, 1).unwrap();
        let filtered = filter_by_axis_range(&cloud, Axis::Z, 0.0, 1.0).unwrap();

        assert_eq!(
            filtered.points,
            vec![
                Point::new(Vec3::new(0.0, 0.0, 0.0), 24),
                Point::new(Vec3::new(0.0, 0.0, 0.5), 24),
            ]
        );
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let cloud = sample_cloud();
        let result = filter_by_axis_range(&cloud, Axis::X, 2.0, 4.0).unwrap();
        assert_eq!(xs(&result), vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_each_axis() {
        let cloud = sample_cloud();
        let y = filter_by_axis_range(&cloud, Axis::Y, 20.0, 30.0).unwrap();
        assert_eq!(xs(&y), vec![2.0, 3.0]);
        let z = filter_by_axis_range(&cloud, Axis::Z, 450.0, 500.0).unwrap();
        assert_eq!(xs(&z), vec![5.0]);
    }

    #[test]
    fn test_result_is_unstructured_and_dense() {
        let cloud = sample_cloud();
        let result = filter_by_axis_range(&cloud, Axis::X, 0.0, 10.0).unwrap();
        assert_eq!(result.width, 5);
        assert_eq!(result.height, 1);
        assert!(result.is_dense);
    }

    #[test]
    fn test_empty_input() {
        let result = filter_by_axis_range(&PointCloud::new(), Axis::Z, 0.0, 1.0).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.width, 0);
    }

    #[test]
    fn test_nothing_in_range_is_not_an_error() {
        let result = filter_by_axis_range(&sample_cloud(), Axis::X, 10.0, 20.0).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_inverted_range_fails() {
        let err = filter_by_axis_range(&sample_cloud(), Axis::Z, 1.0, 0.0).unwrap_err();
        assert_eq!(err, CloudError::InvalidRange { low: 1.0, high: 0.0 });
    }

    #[test]
    fn test_nan_bound_fails() {
        let err = filter_by_axis_range(&sample_cloud(), Axis::Z, f32::NAN, 1.0).unwrap_err();
        assert!(matches!(err, CloudError::InvalidRange { .. }));
    }

    #[test]
    fn test_degenerate_range_keeps_exact_matches() {
        let result = filter_by_axis_range(&sample_cloud(), Axis::X, 3.0, 3.0).unwrap();
        assert_eq!(xs(&result), vec![3.0]);
    }

    #[test]
    fn test_negative_keeps_outside() {
        let result = PassThrough::new(Axis::X, 2.0, 4.0)
            .negative(true)
            .filter(&sample_cloud())
            .unwrap();
        assert_eq!(xs(&result), vec![1.0, 5.0]);
    }

    #[test]
    fn test_nan_points_in_both_modes() {
        let cloud = cloud_from(&[(f32::NAN, 0.0, 0.5), (0.0, 0.0, f32::NAN), (0.0, 0.0, 2.0)]);

        let inside = filter_by_axis_range(&cloud, Axis::Z, 0.0, 1.0).unwrap();
        assert_eq!(inside.len(), 1);
        assert!(inside.points[0].position.x.is_nan());
        assert!(!inside.is_dense);

        let outside = PassThrough::new(Axis::Z, 0.0, 1.0)
            .negative(true)
            .filter(&cloud)
            .unwrap();
        assert_eq!(outside.points, vec![cloud.points[2]]);
        assert!(outside.is_dense);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let cloud = sample_cloud();
        let before = cloud.clone();
        let _ = filter_by_axis_range(&cloud, Axis::X, 2.0, 3.0).unwrap();
        assert_eq!(cloud, before);
    }

    fn cloud_from(pts: &[(f32, f32, f32)]) -> PointCloud {
        PointCloud::unstructured(
            pts.iter()
                .map(|&(x, y, z)| Point::new(Vec3::new(x, y, z), 24))
                .collect(),
        )
        .unwrap()
    }

    proptest! {
        #[test]
        fn filter_is_sound_complete_and_ordered(
            pts in prop::collection::vec(
                (-10.0f32..10.0f32, -10.0f32..10.0f32, -10.0f32..10.0f32),
                0..300
            ),
            low in -10.0f32..0.0f32,
            high in 0.0f32..10.0f32,
        ) {
            let cloud = cloud_from(&pts);
            let result = filter_by_axis_range(&cloud, Axis::Z, low, high).unwrap();

            let expected: Vec<Point> = cloud
                .points
                .iter()
                .filter(|p| low <= p.position.z && p.position.z <= high)
                .copied()
                .collect();

            for p in &result.points {
                prop_assert!(p.position.z >= low && p.position.z <= high);
            }
            prop_assert_eq!(result.points, expected);
        }

        #[test]
        fn negative_is_complement(
            pts in prop::collection::vec(
                (-10.0f32..10.0f32, -10.0f32..10.0f32, -10.0f32..10.0f32),
                0..300
            ),
            low in -10.0f32..0.0f32,
            high in 0.0f32..10.0f32,
        ) {
            let cloud = cloud_from(&pts);
            let inside = PassThrough::new(Axis::Y, low, high).filter(&cloud).unwrap();
            let outside = PassThrough::new(Axis::Y, low, high)
                .negative(true)
                .filter(&cloud)
                .unwrap();
            prop_assert_eq!(inside.len() + outside.len(), cloud.len());

            // Interleaving the two outputs by input position gives back the input.
            let (mut a, mut b) = (inside.points.iter(), outside.points.iter());
            for p in &cloud.points {
                let next = if low <= p.position.y && p.position.y <= high {
                    a.next()
                } else {
                    b.next()
                };
                prop_assert_eq!(next, Some(p));
            }
            prop_assert!(a.next().is_none());
            prop_assert!(b.next().is_none());
        }
    }
}
