use std::rc::Rc;

use crate::cache::DirtyRegion;
use crate::core::{CurvePath, DataPointIndex, PathCommand, Point2D, Rect, Viewport};
use crate::error::{ChartError, ChartResult};

/// Screen-space path for one visible series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesGeometry {
    pub series_index: usize,
    pub path: Rc<CurvePath>,
    /// Original index of the first point in the culled window.
    pub window_start: usize,
    pub point_count: usize,
}

/// Interaction state a backend highlights on top of the series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerState {
    Hovered,
    Selected,
    HoveredSelected,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointMarker {
    pub owner: DataPointIndex,
    pub position: Point2D,
    pub state: MarkerState,
}

/// Backend-agnostic scene for one chart draw pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub surface: Rect,
    pub viewport: Viewport,
    pub series: Vec<SeriesGeometry>,
    pub markers: Vec<PointMarker>,
    /// Invalidation that triggered this pass, `None` for forced redraws.
    pub dirty: Option<DirtyRegion>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(surface: Rect, viewport: Viewport) -> Self {
        Self {
            surface,
            viewport,
            series: Vec::new(),
            markers: Vec::new(),
            dirty: None,
        }
    }

    /// Region a backend has to repaint: the dirty rect, or the whole surface.
    #[must_use]
    pub fn paint_rect(&self) -> Rect {
        match &self.dirty {
            Some(dirty) if !dirty.full_repaint => dirty.rect,
            _ => self.surface,
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.surface.is_empty() {
            return Err(ChartError::InvalidViewport {
                width: self.surface.width,
                height: self.surface.height,
            });
        }

        for geometry in &self.series {
            let finite = geometry.path.commands().iter().all(|command| match *command {
                PathCommand::MoveTo(point) | PathCommand::LineTo(point) => point.is_finite(),
                PathCommand::CubicTo { ctrl1, ctrl2, to } => {
                    ctrl1.is_finite() && ctrl2.is_finite() && to.is_finite()
                }
            });
            if !finite {
                return Err(ChartError::InvalidData(format!(
                    "series {} geometry must be finite",
                    geometry.series_index
                )));
            }
        }
        for marker in &self.markers {
            if !marker.position.is_finite() {
                return Err(ChartError::InvalidData(
                    "marker position must be finite".to_owned(),
                ));
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty() && self.markers.is_empty()
    }
}
