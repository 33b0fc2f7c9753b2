use crate::core::Point2D;
use crate::core::primitives::segment_at;

use super::{CurveInterpolator, CurvePath, hermite_basis, short_path, short_point_at};

/// Cardinal spline through every control point.
///
/// `tension` is clamped to `[0, 1]`: 0 gives Catmull-Rom tangents, 1 gives
/// zero tangents (straight-looking joins with eased segments). The first and
/// last segments use virtual points obtained by reflecting the second and
/// second-to-last points through the end points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardinalInterpolator {
    tension: f64,
}

impl Default for CardinalInterpolator {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl CardinalInterpolator {
    #[must_use]
    pub fn new(tension: f64) -> Self {
        let tension = if tension.is_finite() {
            tension.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self { tension }
    }

    #[must_use]
    pub fn tension(self) -> f64 {
        self.tension
    }

    /// Tangent vectors (per unit parameter) at every control point.
    fn tangents(self, points: &[Point2D]) -> Vec<Point2D> {
        let n = points.len();
        let factor = (1.0 - self.tension) / 2.0;
        let before_first = points[0] * 2.0 - points[1];
        let after_last = points[n - 1] * 2.0 - points[n - 2];

        (0..n)
            .map(|i| {
                let prev = if i == 0 { before_first } else { points[i - 1] };
                let next = if i == n - 1 { after_last } else { points[i + 1] };
                (next - prev) * factor
            })
            .collect()
    }
}

impl CurveInterpolator for CardinalInterpolator {
    fn create_path(&self, points: &[Point2D]) -> CurvePath {
        if let Some(path) = short_path(points) {
            return path;
        }

        let tangents = self.tangents(points);
        let mut path = CurvePath::with_capacity(points.len());
        path.move_to(points[0]);
        for i in 0..points.len() - 1 {
            path.cubic_to(
                points[i] + tangents[i] * (1.0 / 3.0),
                points[i + 1] - tangents[i + 1] * (1.0 / 3.0),
                points[i + 1],
            );
        }
        path
    }

    fn point_at(&self, points: &[Point2D], t: f64) -> Option<Point2D> {
        if let Some(sampled) = short_point_at(points, t) {
            return sampled;
        }

        let tangents = self.tangents(points);
        let (i, u) = segment_at(t, points.len() - 1);
        let (h00, h10, h01, h11) = hermite_basis(u);
        Some(
            points[i] * h00 + tangents[i] * h10 + points[i + 1] * h01 + tangents[i + 1] * h11,
        )
    }
}

/// Catmull-Rom spline: the zero-tension cardinal spline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CatmullRomInterpolator;

impl CurveInterpolator for CatmullRomInterpolator {
    fn create_path(&self, points: &[Point2D]) -> CurvePath {
        CardinalInterpolator::new(0.0).create_path(points)
    }

    fn point_at(&self, points: &[Point2D], t: f64) -> Option<Point2D> {
        CardinalInterpolator::new(0.0).point_at(points, t)
    }
}
