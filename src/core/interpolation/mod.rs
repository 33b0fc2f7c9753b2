//! Curve interpolation: ordered point sequences to drawable paths.
//!
//! Every interpolator is a stateless value implementing [`CurveInterpolator`].
//! Inputs with fewer than three points are handled the same way by the whole
//! family: no points yield an empty path, one point yields a point path and
//! two points yield a straight segment.

mod cardinal;
mod linear;
mod monotone;
mod path;
mod step;

pub use cardinal::{CardinalInterpolator, CatmullRomInterpolator};
pub use linear::LinearInterpolator;
pub use monotone::{MonotoneCubicInterpolator, monotone_tangents};
pub use path::{CurvePath, PathCommand};
pub use step::{StepInterpolator, StepPosition};

use serde::{Deserialize, Serialize};

use crate::core::Point2D;
use crate::core::primitives::clamp_unit;

/// Turns ordered points into a path, or samples a point along that path.
pub trait CurveInterpolator {
    fn create_path(&self, points: &[Point2D]) -> CurvePath;

    /// Samples the curve at `t` in `[0, 1]` (clamped).
    ///
    /// Returns `None` only for empty input.
    fn point_at(&self, points: &[Point2D], t: f64) -> Option<Point2D>;
}

/// Serializable interpolation selector used by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Interpolation {
    #[default]
    Linear,
    MonotoneCubic,
    CatmullRom,
    Cardinal {
        tension: f64,
    },
    Step {
        position: StepPosition,
    },
}

impl CurveInterpolator for Interpolation {
    fn create_path(&self, points: &[Point2D]) -> CurvePath {
        match *self {
            Self::Linear => LinearInterpolator.create_path(points),
            Self::MonotoneCubic => MonotoneCubicInterpolator.create_path(points),
            Self::CatmullRom => CatmullRomInterpolator.create_path(points),
            Self::Cardinal { tension } => CardinalInterpolator::new(tension).create_path(points),
            Self::Step { position } => StepInterpolator::new(position).create_path(points),
        }
    }

    fn point_at(&self, points: &[Point2D], t: f64) -> Option<Point2D> {
        match *self {
            Self::Linear => LinearInterpolator.point_at(points, t),
            Self::MonotoneCubic => MonotoneCubicInterpolator.point_at(points, t),
            Self::CatmullRom => CatmullRomInterpolator.point_at(points, t),
            Self::Cardinal { tension } => CardinalInterpolator::new(tension).point_at(points, t),
            Self::Step { position } => StepInterpolator::new(position).point_at(points, t),
        }
    }
}

/// Shared handling for inputs shorter than three points.
pub(crate) fn short_path(points: &[Point2D]) -> Option<CurvePath> {
    match points {
        [] => Some(CurvePath::new()),
        [only] => Some(CurvePath::point(*only)),
        [from, to] => {
            let mut path = CurvePath::with_capacity(2);
            path.move_to(*from);
            path.line_to(*to);
            Some(path)
        }
        _ => None,
    }
}

/// Sampling counterpart of [`short_path`]. The outer `None` means "three or
/// more points, use the real algorithm".
pub(crate) fn short_point_at(points: &[Point2D], t: f64) -> Option<Option<Point2D>> {
    match points {
        [] => Some(None),
        [only] => Some(Some(*only)),
        [from, to] => Some(Some(from.lerp(*to, clamp_unit(t)))),
        _ => None,
    }
}

/// Cubic Hermite basis `(h00, h10, h01, h11)` at `u`.
#[must_use]
pub(crate) fn hermite_basis(u: f64) -> (f64, f64, f64, f64) {
    let u2 = u * u;
    let u3 = u2 * u;
    (
        2.0 * u3 - 3.0 * u2 + 1.0,
        u3 - 2.0 * u2 + u,
        -2.0 * u3 + 3.0 * u2,
        u3 - u2,
    )
}
