use crate::core::Point2D;
use crate::core::primitives::segment_at;

use super::{CurveInterpolator, CurvePath, short_path, short_point_at};

/// Straight segments between consecutive points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinearInterpolator;

impl CurveInterpolator for LinearInterpolator {
    fn create_path(&self, points: &[Point2D]) -> CurvePath {
        if let Some(path) = short_path(points) {
            return path;
        }

        let mut path = CurvePath::with_capacity(points.len());
        path.move_to(points[0]);
        for point in &points[1..] {
            path.line_to(*point);
        }
        path
    }

    fn point_at(&self, points: &[Point2D], t: f64) -> Option<Point2D> {
        if let Some(sampled) = short_point_at(points, t) {
            return sampled;
        }

        let (index, local) = segment_at(t, points.len() - 1);
        Some(points[index].lerp(points[index + 1], local))
    }
}
