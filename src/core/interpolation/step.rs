use serde::{Deserialize, Serialize};

use crate::core::Point2D;
use crate::core::primitives::segment_at;

use super::{CurveInterpolator, CurvePath, short_path, short_point_at};

/// Where the vertical transition sits between two points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepPosition {
    /// Jump at the start of the segment, then hold the next value.
    Before,
    /// Hold the current value, then jump at the next point.
    #[default]
    After,
    /// Jump halfway between the two points.
    Middle,
}

/// Piecewise-constant interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepInterpolator {
    position: StepPosition,
}

impl StepInterpolator {
    #[must_use]
    pub const fn new(position: StepPosition) -> Self {
        Self { position }
    }

    #[must_use]
    pub const fn position(self) -> StepPosition {
        self.position
    }
}

impl CurveInterpolator for StepInterpolator {
    fn create_path(&self, points: &[Point2D]) -> CurvePath {
        if let Some(path) = short_path(points) {
            return path;
        }

        let per_segment = if self.position == StepPosition::Middle { 3 } else { 2 };
        let mut path = CurvePath::with_capacity(1 + (points.len() - 1) * per_segment);
        path.move_to(points[0]);
        for pair in points.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            match self.position {
                StepPosition::Before => path.line_to(Point2D::new(from.x, to.y)),
                StepPosition::After => path.line_to(Point2D::new(to.x, from.y)),
                StepPosition::Middle => {
                    let mid_x = (from.x + to.x) / 2.0;
                    path.line_to(Point2D::new(mid_x, from.y));
                    path.line_to(Point2D::new(mid_x, to.y));
                }
            }
            path.line_to(to);
        }
        path
    }

    fn point_at(&self, points: &[Point2D], t: f64) -> Option<Point2D> {
        if let Some(sampled) = short_point_at(points, t) {
            return sampled;
        }

        let (index, local) = segment_at(t, points.len() - 1);
        let (from, to) = (points[index], points[index + 1]);
        let y = match self.position {
            StepPosition::Before if local > 0.0 => to.y,
            StepPosition::After if local >= 1.0 => to.y,
            StepPosition::Middle if local >= 0.5 => to.y,
            _ => from.y,
        };
        Some(Point2D::new(from.x + (to.x - from.x) * local, y))
    }
}
