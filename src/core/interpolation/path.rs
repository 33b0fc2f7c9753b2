use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Point2D, Rect};

/// One drawing instruction in screen or data space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathCommand {
    MoveTo(Point2D),
    LineTo(Point2D),
    CubicTo {
        ctrl1: Point2D,
        ctrl2: Point2D,
        to: Point2D,
    },
}

impl PathCommand {
    #[must_use]
    pub fn end_point(self) -> Point2D {
        match self {
            Self::MoveTo(point) | Self::LineTo(point) => point,
            Self::CubicTo { to, .. } => to,
        }
    }
}

/// Backend-neutral path consumed by renderers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CurvePath {
    commands: Vec<PathCommand>,
}

impl CurvePath {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            commands: Vec::with_capacity(capacity),
        }
    }

    /// Degenerate path marking a single location.
    #[must_use]
    pub fn point(at: Point2D) -> Self {
        Self {
            commands: vec![PathCommand::MoveTo(at)],
        }
    }

    pub fn move_to(&mut self, point: Point2D) {
        self.commands.push(PathCommand::MoveTo(point));
    }

    pub fn line_to(&mut self, point: Point2D) {
        self.commands.push(PathCommand::LineTo(point));
    }

    pub fn cubic_to(&mut self, ctrl1: Point2D, ctrl2: Point2D, to: Point2D) {
        self.commands.push(PathCommand::CubicTo { ctrl1, ctrl2, to });
    }

    #[must_use]
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    #[must_use]
    pub fn is_point(&self) -> bool {
        matches!(self.commands.as_slice(), [PathCommand::MoveTo(_)])
    }

    /// Number of drawing commands after the initial move.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| !matches!(command, PathCommand::MoveTo(_)))
            .count()
    }

    #[must_use]
    pub fn start_point(&self) -> Option<Point2D> {
        self.commands.first().map(|command| command.end_point())
    }

    #[must_use]
    pub fn end_point(&self) -> Option<Point2D> {
        self.commands.last().map(|command| command.end_point())
    }

    /// Bounding box of all vertices and control points.
    ///
    /// Cubic segments lie inside their control hull, so this never
    /// under-reports the painted area.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        let mut vertices = self.commands.iter().flat_map(|command| {
            let points: SmallVec<[Point2D; 3]> = match *command {
                PathCommand::MoveTo(p) | PathCommand::LineTo(p) => SmallVec::from_slice(&[p]),
                PathCommand::CubicTo { ctrl1, ctrl2, to } => {
                    SmallVec::from_slice(&[ctrl1, ctrl2, to])
                }
            };
            points
        });
        let first = vertices.next()?;
        let (mut min, mut max) = (first, first);
        for p in vertices {
            min = Point2D::new(min.x.min(p.x), min.y.min(p.y));
            max = Point2D::new(max.x.max(p.x), max.y.max(p.y));
        }
        Some(Rect::new(min.x, min.y, max.x - min.x, max.y - min.y))
    }

    /// Samples the path into a polyline, `steps` samples per cubic segment.
    #[must_use]
    pub fn flatten(&self, steps: usize) -> Vec<Point2D> {
        let steps = steps.max(1);
        let mut out = Vec::with_capacity(self.commands.len() * steps);
        let mut cursor = Point2D::ORIGIN;
        for command in &self.commands {
            match *command {
                PathCommand::MoveTo(p) | PathCommand::LineTo(p) => {
                    out.push(p);
                    cursor = p;
                }
                PathCommand::CubicTo { ctrl1, ctrl2, to } => {
                    for step in 1..=steps {
                        let t = step as f64 / steps as f64;
                        out.push(cubic_point(cursor, ctrl1, ctrl2, to, t));
                    }
                    cursor = to;
                }
            }
        }
        out
    }

    /// Applies `map` to every vertex and control point.
    #[must_use]
    pub fn map_points<F>(&self, mut map: F) -> Self
    where
        F: FnMut(Point2D) -> Point2D,
    {
        let commands = self
            .commands
            .iter()
            .map(|command| match *command {
                PathCommand::MoveTo(p) => PathCommand::MoveTo(map(p)),
                PathCommand::LineTo(p) => PathCommand::LineTo(map(p)),
                PathCommand::CubicTo { ctrl1, ctrl2, to } => PathCommand::CubicTo {
                    ctrl1: map(ctrl1),
                    ctrl2: map(ctrl2),
                    to: map(to),
                },
            })
            .collect();
        Self { commands }
    }
}

fn cubic_point(from: Point2D, ctrl1: Point2D, ctrl2: Point2D, to: Point2D, t: f64) -> Point2D {
    let mt = 1.0 - t;
    let a = mt * mt * mt;
    let b = 3.0 * mt * mt * t;
    let c = 3.0 * mt * t * t;
    let d = t * t * t;
    Point2D::new(
        from.x * a + ctrl1.x * b + ctrl2.x * c + to.x * d,
        from.y * a + ctrl1.y * b + ctrl2.y * c + to.y * d,
    )
}

#[cfg(test)]
mod tests {
    use super::CurvePath;
    use crate::core::Point2D;

    #[test]
    fn flatten_reaches_cubic_end_points() {
        let mut path = CurvePath::new();
        path.move_to(Point2D::new(0.0, 0.0));
        path.cubic_to(
            Point2D::new(1.0, 3.0),
            Point2D::new(2.0, 3.0),
            Point2D::new(3.0, 0.0),
        );

        let samples = path.flatten(8);
        assert_eq!(samples.len(), 9);
        assert_eq!(samples[0], Point2D::new(0.0, 0.0));
        let last = samples[samples.len() - 1];
        assert!(last.distance_to(Point2D::new(3.0, 0.0)) <= 1e-12);
    }

    #[test]
    fn bounds_cover_control_points() {
        let mut path = CurvePath::new();
        path.move_to(Point2D::new(0.0, 0.0));
        path.cubic_to(
            Point2D::new(1.0, -2.0),
            Point2D::new(2.0, 5.0),
            Point2D::new(3.0, 1.0),
        );
        let bounds = path.bounds().expect("non-empty path");
        assert_eq!(bounds.y, -2.0);
        assert_eq!(bounds.bottom(), 5.0);
        assert!(CurvePath::new().bounds().is_none());
    }
}
