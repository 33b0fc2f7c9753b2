use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::core::Rect;
use crate::error::{ChartError, ChartResult};
use crate::render::CanvasLayerKind;

/// Dirty coverage above which a full repaint is cheaper than a partial one.
pub const DEFAULT_FULL_REPAINT_THRESHOLD: f64 = 0.7;

/// Why part of the surface was invalidated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirtyReason {
    Data { series_index: usize },
    Viewport,
    Hover,
    Selection,
    SeriesVisibility,
    Resize,
    Layer(CanvasLayerKind),
    Explicit,
}

/// One entry of the per-frame change log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirtyChange {
    pub rect: Option<Rect>,
    pub reason: DirtyReason,
}

/// Accumulated invalidation for the next paint.
#[derive(Debug, Clone, PartialEq)]
pub struct DirtyRegion {
    pub rect: Rect,
    pub full_repaint: bool,
    pub layers: SmallVec<[CanvasLayerKind; 6]>,
    pub change_log: SmallVec<[DirtyChange; 8]>,
}

/// Accumulates invalidated rectangles between paints.
///
/// Dirty rects are unioned into one bounding rect. Once that rect covers
/// more than `threshold` of the surface, or a surface-covering layer is
/// invalidated, the tracker escalates to a full repaint and ignores further
/// marks until [`DirtyRegionTracker::reset`].
#[derive(Debug, Clone)]
pub struct DirtyRegionTracker {
    full_bounds: Rect,
    threshold: f64,
    accumulated: Option<Rect>,
    needs_full_repaint: bool,
    layers: SmallVec<[CanvasLayerKind; 6]>,
    change_log: SmallVec<[DirtyChange; 8]>,
    completed_paints: u64,
}

impl DirtyRegionTracker {
    #[must_use]
    pub fn new(full_bounds: Rect) -> Self {
        Self {
            full_bounds,
            threshold: DEFAULT_FULL_REPAINT_THRESHOLD,
            accumulated: None,
            needs_full_repaint: false,
            layers: SmallVec::new(),
            change_log: SmallVec::new(),
            completed_paints: 0,
        }
    }

    pub fn with_threshold(full_bounds: Rect, threshold: f64) -> ChartResult<Self> {
        if !threshold.is_finite() || threshold <= 0.0 || threshold > 1.0 {
            return Err(ChartError::InvalidConfig(
                "full repaint threshold must be in (0, 1]".to_owned(),
            ));
        }
        let mut tracker = Self::new(full_bounds);
        tracker.threshold = threshold;
        Ok(tracker)
    }

    pub fn mark_dirty(&mut self, rect: Rect, reason: DirtyReason) {
        if self.needs_full_repaint {
            return;
        }
        let Some(clipped) = rect
            .intersection(self.full_bounds)
            .filter(|clipped| !clipped.is_empty())
        else {
            trace!(?reason, "dirty rect outside surface ignored");
            return;
        };
        self.change_log.push(DirtyChange {
            rect: Some(clipped),
            reason,
        });
        let accumulated = match self.accumulated {
            Some(current) => current.union(clipped),
            None => clipped,
        };
        self.accumulated = Some(accumulated);

        let full_area = self.full_bounds.area();
        if full_area > 0.0 && accumulated.area() > full_area * self.threshold {
            self.escalate(reason);
        }
    }

    pub fn mark_layer_dirty(&mut self, layer: CanvasLayerKind) {
        if self.needs_full_repaint {
            return;
        }
        if layer.covers_surface() {
            self.escalate(DirtyReason::Layer(layer));
            return;
        }
        if !self.layers.contains(&layer) {
            self.layers.push(layer);
        }
        self.change_log.push(DirtyChange {
            rect: None,
            reason: DirtyReason::Layer(layer),
        });
    }

    /// Escalates straight to a full repaint.
    pub fn mark_all_dirty(&mut self, reason: DirtyReason) {
        if !self.needs_full_repaint {
            self.escalate(reason);
        }
    }

    /// Resizes the surface; everything becomes dirty.
    pub fn set_full_bounds(&mut self, full_bounds: Rect) {
        if self.full_bounds == full_bounds {
            return;
        }
        self.full_bounds = full_bounds;
        self.needs_full_repaint = false;
        self.escalate(DirtyReason::Resize);
    }

    #[must_use]
    pub fn needs_full_repaint(&self) -> bool {
        self.needs_full_repaint
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.needs_full_repaint || self.accumulated.is_some() || !self.layers.is_empty()
    }

    /// Snapshot of pending invalidation, `None` when nothing is dirty.
    #[must_use]
    pub fn dirty_region(&self) -> Option<DirtyRegion> {
        if !self.is_dirty() {
            return None;
        }
        let rect = if self.needs_full_repaint {
            self.full_bounds
        } else {
            self.accumulated.unwrap_or(self.full_bounds)
        };
        Some(DirtyRegion {
            rect,
            full_repaint: self.needs_full_repaint,
            layers: self.layers.clone(),
            change_log: self.change_log.clone(),
        })
    }

    /// Clears all state; call once per completed paint.
    pub fn reset(&mut self) {
        self.accumulated = None;
        self.needs_full_repaint = false;
        self.layers.clear();
        self.change_log.clear();
        self.completed_paints = self.completed_paints.wrapping_add(1);
    }

    #[must_use]
    pub fn full_bounds(&self) -> Rect {
        self.full_bounds
    }

    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    #[must_use]
    pub fn completed_paints(&self) -> u64 {
        self.completed_paints
    }

    fn escalate(&mut self, reason: DirtyReason) {
        debug!(?reason, "dirty tracker escalated to full repaint");
        self.needs_full_repaint = true;
        self.accumulated = Some(self.full_bounds);
        self.change_log.push(DirtyChange {
            rect: Some(self.full_bounds),
            reason,
        });
    }
}
