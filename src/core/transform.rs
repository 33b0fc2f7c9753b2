#[cfg(feature = "parallel-projection")]
use rayon::prelude::*;
use serde::Serialize;
use tracing::trace;

use crate::core::{Bounds, Point2D, Rect, Viewport, ZoomLimits};
use crate::error::{ChartError, ChartResult};

/// Point count above which `project_points` fans out with rayon.
#[cfg(feature = "parallel-projection")]
const PARALLEL_PROJECTION_THRESHOLD: usize = 16_384;

/// Bit-exact identity of a transform, usable as a memoization key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransformKey([u64; 12]);

/// Maps data space to screen space and back.
///
/// Data values are normalized by the axis bounds, y is flipped so larger
/// values sit higher on screen, the result is scaled into `screen_rect` and
/// finally the viewport's pan/zoom is applied in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoordinateTransform {
    x_bounds: Bounds,
    y_bounds: Bounds,
    screen_rect: Rect,
    viewport: Viewport,
}

impl CoordinateTransform {
    /// Builds a transform. Viewport bound overrides replace the data bounds.
    pub fn new(
        x_bounds: Bounds,
        y_bounds: Bounds,
        screen_rect: Rect,
        viewport: Viewport,
    ) -> ChartResult<Self> {
        if screen_rect.is_empty() || !screen_rect.x.is_finite() || !screen_rect.y.is_finite() {
            return Err(ChartError::InvalidViewport {
                width: screen_rect.width,
                height: screen_rect.height,
            });
        }
        Ok(Self {
            x_bounds: viewport.resolve_x_bounds(x_bounds),
            y_bounds: viewport.resolve_y_bounds(y_bounds),
            screen_rect,
            viewport,
        })
    }

    #[must_use]
    pub fn x_bounds(&self) -> Bounds {
        self.x_bounds
    }

    #[must_use]
    pub fn y_bounds(&self) -> Bounds {
        self.y_bounds
    }

    #[must_use]
    pub fn screen_rect(&self) -> Rect {
        self.screen_rect
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn origin(&self) -> Point2D {
        Point2D::new(self.screen_rect.x, self.screen_rect.y)
    }

    #[must_use]
    pub fn data_to_screen_x(&self, x: f64) -> f64 {
        let base = self.screen_rect.x + self.x_bounds.normalize(x) * self.screen_rect.width;
        self.screen_rect.x + (base - self.screen_rect.x) * self.viewport.scale_x
            + self.viewport.translate_x
    }

    #[must_use]
    pub fn data_to_screen_y(&self, y: f64) -> f64 {
        let base =
            self.screen_rect.y + (1.0 - self.y_bounds.normalize(y)) * self.screen_rect.height;
        self.screen_rect.y + (base - self.screen_rect.y) * self.viewport.scale_y
            + self.viewport.translate_y
    }

    #[must_use]
    pub fn data_to_screen(&self, point: Point2D) -> Point2D {
        Point2D::new(self.data_to_screen_x(point.x), self.data_to_screen_y(point.y))
    }

    #[must_use]
    pub fn screen_to_data_x(&self, x: f64) -> f64 {
        let base = self.screen_rect.x
            + (x - self.screen_rect.x - self.viewport.translate_x) / self.viewport.scale_x;
        let ratio = (base - self.screen_rect.x) / self.screen_rect.width;
        self.x_bounds.denormalize(ratio)
    }

    #[must_use]
    pub fn screen_to_data_y(&self, y: f64) -> f64 {
        let base = self.screen_rect.y
            + (y - self.screen_rect.y - self.viewport.translate_y) / self.viewport.scale_y;
        let ratio = 1.0 - (base - self.screen_rect.y) / self.screen_rect.height;
        self.y_bounds.denormalize(ratio)
    }

    #[must_use]
    pub fn screen_to_data(&self, point: Point2D) -> Point2D {
        Point2D::new(self.screen_to_data_x(point.x), self.screen_to_data_y(point.y))
    }

    /// Zooms both axes by `factor` around a screen-space focal point.
    ///
    /// Returns the scale actually applied after clamping.
    pub fn zoom(&mut self, factor: f64, focal: Point2D, limits: ZoomLimits) -> Point2D {
        self.zoom_axes(Point2D::new(factor, factor), focal, limits)
    }

    /// Per-axis variant of [`CoordinateTransform::zoom`].
    pub fn zoom_axes(&mut self, factor: Point2D, focal: Point2D, limits: ZoomLimits) -> Point2D {
        self.viewport = self.viewport.zoomed(factor, focal, self.origin(), limits);
        trace!(
            scale_x = self.viewport.scale_x,
            scale_y = self.viewport.scale_y,
            "transform zoom applied"
        );
        Point2D::new(self.viewport.scale_x, self.viewport.scale_y)
    }

    pub fn pan(&mut self, delta: Point2D) {
        self.viewport = self.viewport.panned(delta);
    }

    /// Data-space extents currently covered by the screen rect.
    #[must_use]
    pub fn visible_data_bounds(&self) -> (Bounds, Bounds) {
        let rect = self.screen_rect;
        let top_left = self.screen_to_data(Point2D::new(rect.x, rect.y));
        let bottom_right = self.screen_to_data(Point2D::new(rect.right(), rect.bottom()));
        (
            Bounds::new(top_left.x, bottom_right.x),
            Bounds::new(bottom_right.y, top_left.y),
        )
    }

    /// Projects a batch of data points into screen space.
    #[must_use]
    pub fn project_points(&self, points: &[Point2D]) -> Vec<Point2D> {
        #[cfg(feature = "parallel-projection")]
        {
            if points.len() >= PARALLEL_PROJECTION_THRESHOLD {
                return points
                    .par_iter()
                    .map(|point| self.data_to_screen(*point))
                    .collect();
            }
        }

        points.iter().map(|point| self.data_to_screen(*point)).collect()
    }

    #[must_use]
    pub fn fingerprint(&self) -> TransformKey {
        let vp = self.viewport;
        let rect = self.screen_rect;
        TransformKey([
            self.x_bounds.min().to_bits(),
            self.x_bounds.max().to_bits(),
            self.y_bounds.min().to_bits(),
            self.y_bounds.max().to_bits(),
            rect.x.to_bits(),
            rect.y.to_bits(),
            rect.width.to_bits(),
            rect.height.to_bits(),
            vp.scale_x.to_bits(),
            vp.scale_y.to_bits(),
            vp.translate_x.to_bits(),
            vp.translate_y.to_bits(),
        ])
    }
}
