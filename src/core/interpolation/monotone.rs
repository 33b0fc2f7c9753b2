use crate::core::Point2D;
use crate::core::primitives::{GEOMETRY_EPSILON, segment_at};

use super::{CurveInterpolator, CurvePath, hermite_basis, short_path, short_point_at};

/// Fritsch–Carlson monotone cubic interpolation.
///
/// Between any two consecutive points the curve stays inside their y range,
/// so it never overshoots local extrema. Points are expected in ascending x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MonotoneCubicInterpolator;

/// Computes per-point tangents (dy/dx) with the Fritsch–Carlson correction.
///
/// Requires at least two points; shorter input returns zero tangents.
#[must_use]
pub fn monotone_tangents(points: &[Point2D]) -> Vec<f64> {
    let n = points.len();
    if n < 2 {
        return vec![0.0; n];
    }

    let slopes: Vec<f64> = points
        .windows(2)
        .map(|pair| {
            let dx = pair[1].x - pair[0].x;
            if dx.abs() > GEOMETRY_EPSILON {
                (pair[1].y - pair[0].y) / dx
            } else {
                0.0
            }
        })
        .collect();

    let mut tangents = vec![0.0; n];
    tangents[0] = slopes[0];
    tangents[n - 1] = slopes[n - 2];
    for k in 1..n - 1 {
        let (left, right) = (slopes[k - 1], slopes[k]);
        tangents[k] = if left * right <= 0.0 {
            0.0
        } else {
            (left + right) / 2.0
        };
    }

    for (k, &slope) in slopes.iter().enumerate() {
        if slope.abs() <= GEOMETRY_EPSILON {
            tangents[k] = 0.0;
            tangents[k + 1] = 0.0;
            continue;
        }
        let alpha = tangents[k] / slope;
        let beta = tangents[k + 1] / slope;
        let magnitude = alpha * alpha + beta * beta;
        if magnitude > 9.0 {
            let tau = 3.0 / magnitude.sqrt();
            tangents[k] = tau * alpha * slope;
            tangents[k + 1] = tau * beta * slope;
        }
    }

    tangents
}

impl CurveInterpolator for MonotoneCubicInterpolator {
    fn create_path(&self, points: &[Point2D]) -> CurvePath {
        if let Some(path) = short_path(points) {
            return path;
        }

        let tangents = monotone_tangents(points);
        let mut path = CurvePath::with_capacity(points.len());
        path.move_to(points[0]);
        for k in 0..points.len() - 1 {
            let (from, to) = (points[k], points[k + 1]);
            let third = (to.x - from.x) / 3.0;
            path.cubic_to(
                Point2D::new(from.x + third, from.y + tangents[k] * third),
                Point2D::new(to.x - third, to.y - tangents[k + 1] * third),
                to,
            );
        }
        path
    }

    fn point_at(&self, points: &[Point2D], t: f64) -> Option<Point2D> {
        if let Some(sampled) = short_point_at(points, t) {
            return sampled;
        }

        let tangents = monotone_tangents(points);
        let (k, u) = segment_at(t, points.len() - 1);
        let (from, to) = (points[k], points[k + 1]);
        let dx = to.x - from.x;
        let (h00, h10, h01, h11) = hermite_basis(u);
        Some(Point2D::new(
            from.x + u * dx,
            h00 * from.y + h10 * dx * tangents[k] + h01 * to.y + h11 * dx * tangents[k + 1],
        ))
    }
}
