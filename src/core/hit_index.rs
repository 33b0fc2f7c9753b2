//! Per-frame spatial index resolving pointer positions to data points.
//!
//! Regions are bucketed into a uniform grid laid over the destination rect.
//! Regions partly outside the rect are clamped into the edge cells, so
//! queries near the border still see them.

use ordered_float::OrderedFloat;
use smallvec::SmallVec;
use tracing::trace;

use crate::core::{DataPointIndex, Point2D, Rect};

const DEFAULT_GRID_CELLS: usize = 32;

/// Screen-space region registered for one data point.
#[derive(Debug, Clone, PartialEq)]
pub struct HitRegion<P> {
    pub bounds: Rect,
    pub owner: DataPointIndex,
    pub payload: P,
}

/// Outcome of [`SpatialHitIndex::find_nearest`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitResult<'a, P> {
    pub owner: DataPointIndex,
    pub payload: &'a P,
    pub bounds: Rect,
    /// Distance from the query point to the region centre.
    pub distance: f64,
    /// Whether the query point lies inside the region bounds.
    pub contained: bool,
}

#[derive(Debug, Clone)]
pub struct SpatialHitIndex<P> {
    regions: Vec<HitRegion<P>>,
    cells: Vec<SmallVec<[usize; 4]>>,
    bounds: Rect,
    cols: usize,
    rows: usize,
    generation: u64,
}

impl<P> Default for SpatialHitIndex<P> {
    fn default() -> Self {
        Self::new(Rect::from_size(1.0, 1.0))
    }
}

impl<P> SpatialHitIndex<P> {
    #[must_use]
    pub fn new(bounds: Rect) -> Self {
        Self::with_grid(bounds, DEFAULT_GRID_CELLS, DEFAULT_GRID_CELLS)
    }

    #[must_use]
    pub fn with_grid(bounds: Rect, cols: usize, rows: usize) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        Self {
            regions: Vec::new(),
            cells: vec![SmallVec::new(); cols * rows],
            bounds,
            cols,
            rows,
            generation: 0,
        }
    }

    /// Drops every region and re-targets the grid for a new frame.
    pub fn rebuild(&mut self, bounds: Rect) {
        self.regions.clear();
        for cell in &mut self.cells {
            cell.clear();
        }
        self.bounds = bounds;
        self.generation = self.generation.wrapping_add(1);
        trace!(generation = self.generation, "hit index rebuilt");
    }

    pub fn register_data_point(&mut self, bounds: Rect, owner: DataPointIndex, payload: P) {
        let id = self.regions.len();
        let (min_col, min_row) = self.cell_coords(Point2D::new(bounds.x, bounds.y));
        let (max_col, max_row) = self.cell_coords(Point2D::new(bounds.right(), bounds.bottom()));
        for row in min_row..=max_row {
            for col in min_col..=max_col {
                self.cells[row * self.cols + col].push(id);
            }
        }
        self.regions.push(HitRegion {
            bounds,
            owner,
            payload,
        });
    }

    /// Finds the region under `point`.
    ///
    /// Regions containing `point` win over regions merely within `radius` of
    /// their centre. Within each group the closest centre wins, and exact
    /// ties go to the most recently registered region (top-most in paint
    /// order).
    #[must_use]
    pub fn find_nearest(&self, point: Point2D, radius: Option<f64>) -> Option<HitResult<'_, P>> {
        if self.regions.is_empty() || !point.is_finite() {
            return None;
        }
        let radius = radius.filter(|r| r.is_finite() && *r >= 0.0).unwrap_or(0.0);

        let (min_col, min_row) = self.cell_coords(Point2D::new(point.x - radius, point.y - radius));
        let (max_col, max_row) = self.cell_coords(Point2D::new(point.x + radius, point.y + radius));

        // (not contained, distance, newest first)
        let mut best: Option<((bool, OrderedFloat<f64>, std::cmp::Reverse<usize>), usize)> = None;
        for row in min_row..=max_row {
            for col in min_col..=max_col {
                for &id in &self.cells[row * self.cols + col] {
                    let region = &self.regions[id];
                    let contained = region.bounds.contains(point);
                    let distance = region.bounds.center().distance_to(point);
                    if !contained && distance > radius {
                        continue;
                    }
                    let rank = (!contained, OrderedFloat(distance), std::cmp::Reverse(id));
                    if best.as_ref().is_none_or(|(current, _)| rank < *current) {
                        best = Some((rank, id));
                    }
                }
            }
        }

        best.map(|((not_contained, distance, _), id)| {
            let region = &self.regions[id];
            HitResult {
                owner: region.owner,
                payload: &region.payload,
                bounds: region.bounds,
                distance: distance.into_inner(),
                contained: !not_contained,
            }
        })
    }

    /// Regions registered for one series, in registration order.
    pub fn regions_for_series(&self, series_index: usize) -> impl Iterator<Item = &HitRegion<P>> {
        self.regions
            .iter()
            .filter(move |region| region.owner.series_index == series_index)
    }

    #[must_use]
    pub fn regions(&self) -> &[HitRegion<P>] {
        &self.regions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Incremented on every [`SpatialHitIndex::rebuild`].
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    fn cell_coords(&self, pos: Point2D) -> (usize, usize) {
        let cell_width = self.bounds.width / self.cols as f64;
        let cell_height = self.bounds.height / self.rows as f64;
        let axis = |value: f64, start: f64, size: f64, count: usize| -> usize {
            if size.is_nan() || size <= 0.0 || !value.is_finite() {
                return 0;
            }
            let raw = ((value - start) / size).floor();
            if raw <= 0.0 {
                0
            } else {
                (raw as usize).min(count - 1)
            }
        };
        (
            axis(pos.x, self.bounds.x, cell_width, self.cols),
            axis(pos.y, self.bounds.y, cell_height, self.rows),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::SpatialHitIndex;
    use crate::core::{DataPointIndex, Point2D, Rect};

    #[test]
    fn regions_outside_the_grid_are_clamped_into_edge_cells() {
        let mut index = SpatialHitIndex::with_grid(Rect::from_size(100.0, 100.0), 4, 4);
        index.register_data_point(
            Rect::new(-20.0, -20.0, 10.0, 10.0),
            DataPointIndex::new(0, 0),
            "outside",
        );
        let hit = index
            .find_nearest(Point2D::new(-15.0, -15.0), None)
            .expect("clamped region must be found");
        assert_eq!(*hit.payload, "outside");
    }

    #[test]
    fn contained_region_beats_closer_radius_match() {
        let mut index = SpatialHitIndex::new(Rect::from_size(100.0, 100.0));
        index.register_data_point(
            Rect::new(0.0, 0.0, 40.0, 40.0),
            DataPointIndex::new(0, 0),
            "large",
        );
        index.register_data_point(
            Rect::around(Point2D::new(45.0, 45.0), 1.0),
            DataPointIndex::new(0, 1),
            "marker",
        );
        let hit = index
            .find_nearest(Point2D::new(39.0, 39.0), Some(10.0))
            .expect("hit");
        assert_eq!(*hit.payload, "large");
        assert!(hit.contained);
    }
}
