use std::rc::Rc;
use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::cache::{DirtyReason, DirtyRegionTracker, LruCache, LruCacheStats};
use crate::core::{
    Bounds, CoordinateTransform, CurveInterpolator, CurvePath, DataPointIndex, Interpolation,
    Point2D, Rect, SpatialHitIndex, TransformKey, ViewportCuller, XValue,
};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{ListenerId, ViewportController, ViewportObserver};
use crate::render::{
    CanvasLayerKind, MarkerState, PointMarker, RenderFrame, Renderer, SeriesGeometry,
};

use super::ChartEngineConfig;

/// One data series, sorted ascending by x.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesData {
    points: Vec<Point2D>,
    revision: u64,
}

impl SeriesData {
    #[must_use]
    pub fn points(&self) -> &[Point2D] {
        &self.points
    }

    /// Bumped on every mutation; part of the geometry cache key.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn x_bounds(&self) -> Option<Bounds> {
        Bounds::from_values(self.points.iter().map(|point| point.x)).ok()
    }

    fn y_bounds(&self) -> Option<Bounds> {
        Bounds::from_values(self.points.iter().map(|point| point.y)).ok()
    }
}

/// Summary of one render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    pub series_rendered: usize,
    pub points_total: usize,
    pub points_in_window: usize,
    pub geometry_cache_hits: usize,
    pub geometry_cache_misses: usize,
    pub hit_regions: usize,
    pub full_repaint: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct GeometryKey {
    series_index: usize,
    revision: u64,
    transform: TransformKey,
    start: usize,
    end: usize,
}

#[derive(Debug, Clone)]
struct CachedGeometry {
    path: Rc<CurvePath>,
    screen_points: Rc<[Point2D]>,
}

/// Main orchestration facade consumed by host applications.
///
/// `ChartEngine` owns series data, the viewport controller and the per-frame
/// collaborators (culler, interpolator, hit index, dirty tracker, geometry
/// cache) and drives them in a fixed order on every [`ChartEngine::render`].
pub struct ChartEngine<R: Renderer> {
    renderer: R,
    config: ChartEngineConfig,
    series: Vec<SeriesData>,
    next_revision: u64,
    controller: ViewportController,
    culler: ViewportCuller,
    interpolation: Interpolation,
    hit_index: SpatialHitIndex<Point2D>,
    dirty: DirtyRegionTracker,
    geometry_cache: LruCache<GeometryKey, CachedGeometry>,
    last_transform: Option<CoordinateTransform>,
    last_stats: FrameStats,
}

impl<R: Renderer> ChartEngine<R> {
    pub fn new(renderer: R, config: ChartEngineConfig) -> ChartResult<Self> {
        config.validate()?;
        let surface = Rect::from_size(config.surface_width, config.surface_height);
        let controller = ViewportController::new(surface, config.zoom_limits)?
            .with_animation(config.animation_duration(), config.easing);
        let mut dirty = DirtyRegionTracker::with_threshold(surface, config.full_repaint_threshold)?;
        dirty.mark_all_dirty(DirtyReason::Explicit);

        debug!(
            width = config.surface_width,
            height = config.surface_height,
            "chart engine created"
        );
        Ok(Self {
            renderer,
            culler: config.culler(),
            interpolation: config.interpolation,
            series: Vec::new(),
            next_revision: 0,
            controller,
            hit_index: SpatialHitIndex::new(surface),
            dirty,
            geometry_cache: LruCache::new(config.geometry_cache_capacity),
            last_transform: None,
            last_stats: FrameStats::default(),
            config,
        })
    }

    #[must_use]
    pub fn config(&self) -> &ChartEngineConfig {
        &self.config
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    #[must_use]
    pub fn controller(&self) -> &ViewportController {
        &self.controller
    }

    #[must_use]
    pub fn hit_index(&self) -> &SpatialHitIndex<Point2D> {
        &self.hit_index
    }

    #[must_use]
    pub fn dirty_tracker(&self) -> &DirtyRegionTracker {
        &self.dirty
    }

    #[must_use]
    pub fn geometry_cache_stats(&self) -> LruCacheStats {
        self.geometry_cache.stats()
    }

    #[must_use]
    pub fn last_frame_stats(&self) -> FrameStats {
        self.last_stats
    }

    #[must_use]
    pub fn surface(&self) -> Rect {
        self.controller.surface()
    }

    /// Whether a render pass would produce something new.
    #[must_use]
    pub fn needs_render(&self) -> bool {
        self.dirty.is_dirty() || self.controller.is_animating()
    }

    #[must_use]
    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    #[must_use]
    pub fn series(&self, series_index: usize) -> Option<&SeriesData> {
        self.series.get(series_index)
    }

    /// Appends a new series and returns its index.
    pub fn add_series(&mut self, points: Vec<Point2D>) -> ChartResult<usize> {
        let series_index = self.series.len();
        self.set_series(series_index, points)?;
        Ok(series_index)
    }

    /// Replaces (or appends, when `series_index == series_count()`) a series.
    ///
    /// Points must be finite and sorted ascending by x.
    pub fn set_series(&mut self, series_index: usize, points: Vec<Point2D>) -> ChartResult<()> {
        if series_index > self.series.len() {
            return Err(ChartError::InvalidData(format!(
                "series index {series_index} out of range for {} series",
                self.series.len()
            )));
        }
        validate_series_points(&points)?;
        let revision = self.bump_revision();
        let data = SeriesData { points, revision };
        if series_index == self.series.len() {
            self.series.push(data);
        } else {
            self.series[series_index] = data;
        }
        self.invalidate_series(series_index);
        debug!(
            series_index,
            points = self.series[series_index].points.len(),
            "series data set"
        );
        Ok(())
    }

    /// Same as [`ChartEngine::set_series`] for typed x values.
    pub fn set_series_values(
        &mut self,
        series_index: usize,
        values: &[(XValue, f64)],
    ) -> ChartResult<()> {
        let points = values
            .iter()
            .map(|(x, y)| Ok(Point2D::new(x.ordinate()?, *y)))
            .collect::<ChartResult<Vec<_>>>()?;
        self.set_series(series_index, points)
    }

    /// Appends one point; its x must not precede the current last point.
    pub fn append_point(&mut self, series_index: usize, point: Point2D) -> ChartResult<()> {
        if !point.is_finite() {
            return Err(ChartError::InvalidData(
                "appended point must be finite".to_owned(),
            ));
        }
        let revision = self.bump_revision();
        let Some(series) = self.series.get_mut(series_index) else {
            return Err(ChartError::InvalidData(format!(
                "series index {series_index} does not exist"
            )));
        };
        if let Some(last) = series.points.last() {
            if point.x < last.x {
                return Err(ChartError::InvalidData(
                    "appended point must not precede the last point on x".to_owned(),
                ));
            }
        }
        series.points.push(point);
        series.revision = revision;
        self.invalidate_series(series_index);
        Ok(())
    }

    /// Switches the curve algorithm; cached geometry is discarded.
    pub fn set_interpolation(&mut self, interpolation: Interpolation) -> ChartResult<()> {
        let mut config = self.config;
        config.interpolation = interpolation;
        config.validate()?;
        if self.interpolation == interpolation {
            return Ok(());
        }
        self.config = config;
        self.interpolation = interpolation;
        self.geometry_cache.clear();
        self.dirty.mark_layer_dirty(CanvasLayerKind::Series);
        Ok(())
    }

    pub fn set_surface_size(&mut self, width: f64, height: f64) -> ChartResult<()> {
        let mut config = self.config;
        config.surface_width = width;
        config.surface_height = height;
        config.validate()?;
        let surface = Rect::from_size(width, height);
        self.controller.set_surface(surface)?;
        self.config = config;
        self.dirty.set_full_bounds(surface);
        Ok(())
    }

    /// Transform for the current data, surface and viewport.
    pub fn current_transform(&self) -> ChartResult<CoordinateTransform> {
        let (x_bounds, y_bounds) = self.data_bounds();
        CoordinateTransform::new(
            x_bounds,
            y_bounds,
            self.controller.surface(),
            self.controller.viewport(),
        )
    }

    /// Runs one render pass: cull, interpolate, register hit regions, draw,
    /// then reset the dirty tracker.
    pub fn render(&mut self) -> ChartResult<FrameStats> {
        let transform = self.current_transform()?;
        let surface = transform.screen_rect();
        let (visible_x, _) = transform.visible_data_bounds();
        let fingerprint = transform.fingerprint();
        let hit_radius = self.config.hit_radius_px;

        let mut stats = FrameStats {
            full_repaint: self.dirty.needs_full_repaint(),
            ..FrameStats::default()
        };
        let mut frame = RenderFrame::new(surface, transform.viewport());
        frame.dirty = self.dirty.dirty_region();

        self.hit_index.rebuild(surface);
        for (series_index, series) in self.series.iter().enumerate() {
            if !self.controller.is_series_visible(series_index) || series.points.is_empty() {
                continue;
            }
            stats.points_total += series.points.len();

            let window = self.culler.cull(&series.points, visible_x, |point| point.x);
            stats.points_in_window += window.len();

            let key = GeometryKey {
                series_index,
                revision: series.revision,
                transform: fingerprint,
                start: window.start,
                end: window.end,
            };
            let geometry = if let Some(cached) = self.geometry_cache.get(&key) {
                stats.geometry_cache_hits += 1;
                cached.clone()
            } else {
                stats.geometry_cache_misses += 1;
                let screen_points = transform.project_points(window.window);
                let path = self.interpolation.create_path(&screen_points);
                let geometry = CachedGeometry {
                    path: Rc::new(path),
                    screen_points: screen_points.into(),
                };
                self.geometry_cache.put(key, geometry.clone());
                geometry
            };

            for (window_index, screen) in geometry.screen_points.iter().enumerate() {
                let bounds = Rect::around(*screen, hit_radius);
                if !bounds.intersects(surface) {
                    continue;
                }
                let point_index = window.data_index(window_index);
                self.hit_index.register_data_point(
                    bounds,
                    DataPointIndex::new(series_index, point_index),
                    series.points[point_index],
                );
            }

            frame.series.push(SeriesGeometry {
                series_index,
                path: geometry.path,
                window_start: window.start,
                point_count: window.len(),
            });
            stats.series_rendered += 1;
        }
        stats.hit_regions = self.hit_index.len();
        frame.markers = self.collect_markers(&transform);

        self.renderer.render(&frame)?;
        self.dirty.reset();
        self.last_transform = Some(transform);
        self.last_stats = stats;

        debug!(
            series = stats.series_rendered,
            points_in_window = stats.points_in_window,
            cache_hits = stats.geometry_cache_hits,
            hit_regions = stats.hit_regions,
            full_repaint = stats.full_repaint,
            "frame rendered"
        );
        Ok(stats)
    }

    /// Resolves a pointer position into the hovered data point.
    pub fn pointer_move(&mut self, position: Point2D) -> Option<DataPointIndex> {
        let hovered = self
            .hit_index
            .find_nearest(position, Some(self.config.hit_radius_px))
            .map(|hit| hit.owner);
        let previous = self.controller.hovered();
        if self.controller.set_hovered(hovered) {
            self.mark_point_dirty(previous, DirtyReason::Hover);
            self.mark_point_dirty(hovered, DirtyReason::Hover);
        }
        hovered
    }

    pub fn pointer_leave(&mut self) {
        let previous = self.controller.hovered();
        if self.controller.set_hovered(None) {
            self.mark_point_dirty(previous, DirtyReason::Hover);
        }
    }

    /// Toggles selection of the point under `position`; a click on empty
    /// space clears the selection.
    pub fn pointer_click(&mut self, position: Point2D) -> Option<DataPointIndex> {
        let hit = self
            .hit_index
            .find_nearest(position, Some(self.config.hit_radius_px))
            .map(|hit| hit.owner);
        match hit {
            Some(owner) => {
                if self.controller.toggle_selection(owner) {
                    self.mark_point_dirty(Some(owner), DirtyReason::Selection);
                }
            }
            None => {
                let previous: Vec<DataPointIndex> =
                    self.controller.selection().iter().copied().collect();
                if self.controller.clear_selection() {
                    for owner in previous {
                        self.mark_point_dirty(Some(owner), DirtyReason::Selection);
                    }
                }
            }
        }
        hit
    }

    pub fn select_point(&mut self, point: DataPointIndex) -> bool {
        let changed = self.controller.select_point(point);
        if changed {
            self.mark_point_dirty(Some(point), DirtyReason::Selection);
        }
        changed
    }

    pub fn deselect_point(&mut self, point: DataPointIndex) -> bool {
        let changed = self.controller.deselect_point(point);
        if changed {
            self.mark_point_dirty(Some(point), DirtyReason::Selection);
        }
        changed
    }

    pub fn pan(&mut self, delta: Point2D) -> bool {
        let changed = self.controller.pan(delta);
        self.mark_viewport_dirty(changed)
    }

    pub fn zoom(&mut self, factor: f64, focal: Point2D) -> bool {
        let changed = self.controller.zoom(factor, focal);
        self.mark_viewport_dirty(changed)
    }

    pub fn animate_zoom(&mut self, factor: f64, focal: Point2D) -> bool {
        self.controller.animate_zoom(factor, focal)
    }

    /// Animates the viewport so the data ranges fill the surface.
    pub fn zoom_to_range(&mut self, x_range: Bounds, y_range: Option<Bounds>) -> ChartResult<bool> {
        let transform = self.current_transform()?;
        Ok(self.controller.zoom_to_range(&transform, x_range, y_range))
    }

    pub fn animate_reset(&mut self) -> bool {
        self.controller.animate_reset()
    }

    /// Advances animations to frame-clock time `now`.
    pub fn tick(&mut self, now: Duration) -> bool {
        let changed = self.controller.tick(now);
        self.mark_viewport_dirty(changed)
    }

    pub fn toggle_series_visibility(&mut self, series_index: usize) -> bool {
        let changed = self.controller.toggle_series_visibility(series_index);
        self.mark_visibility_dirty(changed)
    }

    pub fn isolate_series(&mut self, series_index: usize) -> bool {
        let changed = self
            .controller
            .isolate_series(series_index, self.series.len());
        self.mark_visibility_dirty(changed)
    }

    pub fn show_all_series(&mut self) -> bool {
        let changed = self.controller.show_all_series();
        self.mark_visibility_dirty(changed)
    }

    pub fn add_listener<O>(&mut self, observer: O) -> ListenerId
    where
        O: ViewportObserver + 'static,
    {
        self.controller.add_listener(observer)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.controller.remove_listener(id)
    }

    fn bump_revision(&mut self) -> u64 {
        self.next_revision = self.next_revision.wrapping_add(1);
        self.next_revision
    }

    fn invalidate_series(&mut self, series_index: usize) {
        let evicted = self
            .geometry_cache
            .evict_where(|key, _| key.series_index == series_index);
        trace!(series_index, evicted, "series geometry invalidated");
        // Data changes may move the shared axis bounds.
        self.dirty.mark_all_dirty(DirtyReason::Data { series_index });
    }

    fn visible_series(&self) -> impl Iterator<Item = &SeriesData> {
        self.series
            .iter()
            .enumerate()
            .filter(move |(index, _)| self.controller.is_series_visible(*index))
            .map(|(_, series)| series)
    }

    fn data_bounds(&self) -> (Bounds, Bounds) {
        let x_bounds = Bounds::union(self.visible_series().filter_map(SeriesData::x_bounds))
            .unwrap_or(Bounds::DEFAULT);
        let y_bounds = match Bounds::union(self.visible_series().filter_map(SeriesData::y_bounds)) {
            Ok(bounds) => bounds,
            Err(_) => {
                trace!("no visible series data, default bounds used");
                Bounds::DEFAULT
            }
        };
        let y_bounds = if self.config.include_zero_baseline {
            y_bounds.including_zero()
        } else {
            y_bounds
        };
        (x_bounds, y_bounds.with_top_padding(self.config.y_top_padding_ratio))
    }

    fn collect_markers(&self, transform: &CoordinateTransform) -> Vec<PointMarker> {
        let hovered = self.controller.hovered();
        let mut markers = Vec::new();
        for owner in self.controller.selection() {
            let state = if hovered == Some(*owner) {
                MarkerState::HoveredSelected
            } else {
                MarkerState::Selected
            };
            if let Some(position) = self.screen_position(transform, *owner) {
                markers.push(PointMarker {
                    owner: *owner,
                    position,
                    state,
                });
            }
        }
        if let Some(owner) = hovered {
            if !self.controller.is_selected(owner) {
                if let Some(position) = self.screen_position(transform, owner) {
                    markers.push(PointMarker {
                        owner,
                        position,
                        state: MarkerState::Hovered,
                    });
                }
            }
        }
        markers
    }

    fn screen_position(
        &self,
        transform: &CoordinateTransform,
        owner: DataPointIndex,
    ) -> Option<Point2D> {
        if !self.controller.is_series_visible(owner.series_index) {
            return None;
        }
        let point = self
            .series
            .get(owner.series_index)?
            .points
            .get(owner.point_index)?;
        Some(transform.data_to_screen(*point))
    }

    fn mark_point_dirty(&mut self, owner: Option<DataPointIndex>, reason: DirtyReason) {
        let Some(owner) = owner else {
            return;
        };
        let position = self
            .last_transform
            .and_then(|transform| self.screen_position(&transform, owner));
        match position {
            // Markers extend one hit radius past the hit region.
            Some(position) => {
                let radius = self.config.hit_radius_px;
                self.dirty
                    .mark_dirty(Rect::around(position, radius).inflate(radius), reason);
            }
            None => self.dirty.mark_layer_dirty(CanvasLayerKind::Overlay),
        }
    }

    fn mark_viewport_dirty(&mut self, changed: bool) -> bool {
        if changed {
            self.dirty.mark_all_dirty(DirtyReason::Viewport);
        }
        changed
    }

    fn mark_visibility_dirty(&mut self, changed: bool) -> bool {
        if changed {
            self.dirty.mark_all_dirty(DirtyReason::SeriesVisibility);
        }
        changed
    }
}

fn validate_series_points(points: &[Point2D]) -> ChartResult<()> {
    if points.iter().any(|point| !point.is_finite()) {
        return Err(ChartError::InvalidData(
            "series points must be finite".to_owned(),
        ));
    }
    if points.windows(2).any(|pair| pair[1].x < pair[0].x) {
        warn!(points = points.len(), "unsorted series rejected");
        return Err(ChartError::InvalidData(
            "series points must be sorted ascending by x".to_owned(),
        ));
    }
    Ok(())
}
