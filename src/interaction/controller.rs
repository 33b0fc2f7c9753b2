use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::{Bounds, CoordinateTransform, DataPointIndex, Point2D, Rect, Viewport, ZoomLimits};
use crate::error::{ChartError, ChartResult};

use super::Easing;

pub const DEFAULT_ANIMATION_DURATION: Duration = Duration::from_millis(250);

/// State change broadcast to registered observers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViewportEvent {
    /// Viewport moved; `animating` is false on direct mutations and on the
    /// final tick of an animation.
    ViewportChanged { viewport: Viewport, animating: bool },
    SelectionChanged { selection: Vec<DataPointIndex> },
    HoverChanged { hovered: Option<DataPointIndex> },
    SeriesVisibilityChanged { hidden: Vec<usize> },
}

/// Receives controller notifications.
///
/// Closures taking `&ViewportEvent` implement this trait directly.
pub trait ViewportObserver {
    fn on_viewport_event(&mut self, event: &ViewportEvent);
}

impl<F> ViewportObserver for F
where
    F: FnMut(&ViewportEvent),
{
    fn on_viewport_event(&mut self, event: &ViewportEvent) {
        self(event);
    }
}

/// Handle returned by [`ViewportController::add_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// In-flight transition between two viewports.
///
/// `started_at` stays `None` until the first [`ViewportController::tick`]
/// after the request, which anchors the animation to the host clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportAnimation {
    pub from: Viewport,
    pub to: Viewport,
    pub started_at: Option<Duration>,
    pub duration: Duration,
    pub easing: Easing,
}

impl ViewportAnimation {
    /// Linear progress in `[0, 1]` at clock time `now`.
    #[must_use]
    pub fn progress(&self, now: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let Some(started_at) = self.started_at else {
            return 0.0;
        };
        let elapsed = now.saturating_sub(started_at);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }
}

/// Owns pan/zoom, selection, hover and series visibility state.
///
/// Every mutation is synchronous and produces at most one notification;
/// requests that leave the state unchanged notify nobody and return `false`.
/// Animations advance only through [`ViewportController::tick`], driven by
/// an external frame clock; starting one replaces any animation in flight.
pub struct ViewportController {
    viewport: Viewport,
    limits: ZoomLimits,
    surface: Rect,
    selection: IndexSet<DataPointIndex>,
    hovered: Option<DataPointIndex>,
    hidden_series: BTreeSet<usize>,
    animation: Option<ViewportAnimation>,
    animation_duration: Duration,
    easing: Easing,
    listeners: IndexMap<ListenerId, Box<dyn ViewportObserver>>,
    next_listener_id: u64,
}

impl fmt::Debug for ViewportController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewportController")
            .field("viewport", &self.viewport)
            .field("limits", &self.limits)
            .field("surface", &self.surface)
            .field("selection", &self.selection)
            .field("hovered", &self.hovered)
            .field("hidden_series", &self.hidden_series)
            .field("animation", &self.animation)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl ViewportController {
    pub fn new(surface: Rect, limits: ZoomLimits) -> ChartResult<Self> {
        validate_surface(surface)?;
        let limits = limits.validate()?;
        Ok(Self {
            viewport: Viewport::IDENTITY,
            limits,
            surface,
            selection: IndexSet::new(),
            hovered: None,
            hidden_series: BTreeSet::new(),
            animation: None,
            animation_duration: DEFAULT_ANIMATION_DURATION,
            easing: Easing::default(),
            listeners: IndexMap::new(),
            next_listener_id: 0,
        })
    }

    #[must_use]
    pub fn with_animation(mut self, duration: Duration, easing: Easing) -> Self {
        self.animation_duration = duration;
        self.easing = easing;
        self
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn limits(&self) -> ZoomLimits {
        self.limits
    }

    #[must_use]
    pub fn surface(&self) -> Rect {
        self.surface
    }

    #[must_use]
    pub fn selection(&self) -> &IndexSet<DataPointIndex> {
        &self.selection
    }

    #[must_use]
    pub fn is_selected(&self, point: DataPointIndex) -> bool {
        self.selection.contains(&point)
    }

    #[must_use]
    pub fn hovered(&self) -> Option<DataPointIndex> {
        self.hovered
    }

    #[must_use]
    pub fn hidden_series(&self) -> &BTreeSet<usize> {
        &self.hidden_series
    }

    #[must_use]
    pub fn is_series_visible(&self, series_index: usize) -> bool {
        !self.hidden_series.contains(&series_index)
    }

    #[must_use]
    pub fn animation(&self) -> Option<&ViewportAnimation> {
        self.animation.as_ref()
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    #[must_use]
    pub fn animation_duration(&self) -> Duration {
        self.animation_duration
    }

    #[must_use]
    pub fn easing(&self) -> Easing {
        self.easing
    }

    pub fn set_animation(&mut self, duration: Duration, easing: Easing) {
        self.animation_duration = duration;
        self.easing = easing;
    }

    /// Updates the destination rect; the viewport itself is not touched.
    pub fn set_surface(&mut self, surface: Rect) -> ChartResult<()> {
        validate_surface(surface)?;
        self.surface = surface;
        Ok(())
    }

    /// Replaces the zoom clamp and re-clamps the current viewport.
    pub fn set_zoom_limits(&mut self, limits: ZoomLimits) -> ChartResult<bool> {
        self.limits = limits.validate()?;
        let clamped = self.viewport.clamped(self.limits, self.surface);
        Ok(self.apply_viewport(clamped))
    }

    /// Jumps to `viewport`, cancelling any animation.
    pub fn set_viewport(&mut self, viewport: Viewport) -> bool {
        self.animation = None;
        let clamped = viewport.clamped(self.limits, self.surface);
        self.apply_viewport(clamped)
    }

    /// Translates the viewport by a screen-space delta.
    pub fn pan(&mut self, delta: Point2D) -> bool {
        if !delta.is_finite() || (delta.x == 0.0 && delta.y == 0.0) {
            return false;
        }
        self.animation = None;
        let next = self.viewport.panned(delta);
        self.apply_viewport(next)
    }

    /// Zooms both axes by `factor` around a screen-space focal point.
    pub fn zoom(&mut self, factor: f64, focal: Point2D) -> bool {
        self.zoom_axes(Point2D::new(factor, factor), focal)
    }

    pub fn zoom_axes(&mut self, factor: Point2D, focal: Point2D) -> bool {
        self.animation = None;
        let next = self
            .viewport
            .zoomed(factor, focal, self.origin(), self.limits);
        if same_scale(&next, &self.viewport) {
            trace!("zoom request clamped to current scale");
            return false;
        }
        self.apply_viewport(next)
    }

    /// Animated variant of [`ViewportController::zoom`].
    pub fn animate_zoom(&mut self, factor: f64, focal: Point2D) -> bool {
        let target = self.viewport.zoomed(
            Point2D::new(factor, factor),
            focal,
            self.origin(),
            self.limits,
        );
        if same_scale(&target, &self.viewport) {
            return false;
        }
        self.animate_to(target)
    }

    /// Animates so the data ranges fill the surface.
    ///
    /// `transform` supplies the data bounds the ranges are relative to.
    /// When the required scale is clamped, the range is centred instead of
    /// aligned to the edges. `y_range = None` keeps the current y mapping.
    pub fn zoom_to_range(
        &mut self,
        transform: &CoordinateTransform,
        x_range: Bounds,
        y_range: Option<Bounds>,
    ) -> bool {
        let rect = self.surface;
        let mut target = self.viewport;

        let x_bounds = transform.x_bounds();
        let (scale_x, translate_x) = fit_axis(
            x_bounds.normalize(x_range.min()),
            x_bounds.normalize(x_range.max()),
            rect.width,
            |scale| self.limits.clamp_x(scale),
        );
        target.scale_x = scale_x;
        target.translate_x = translate_x;

        if let Some(y_range) = y_range {
            let y_bounds = transform.y_bounds();
            // Screen y grows downward, so the range maximum sits at the top.
            let (scale_y, translate_y) = fit_axis(
                1.0 - y_bounds.normalize(y_range.max()),
                1.0 - y_bounds.normalize(y_range.min()),
                rect.height,
                |scale| self.limits.clamp_y(scale),
            );
            target.scale_y = scale_y;
            target.translate_y = translate_y;
        }

        debug!(
            x_min = x_range.min(),
            x_max = x_range.max(),
            scale_x = target.scale_x,
            "zoom to range requested"
        );
        self.animate_to(target)
    }

    /// Animates back to unit scale and zero translation.
    ///
    /// Explicit bound overrides on the viewport are preserved.
    pub fn animate_reset(&mut self) -> bool {
        let target = Viewport {
            scale_x: 1.0,
            scale_y: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
            ..self.viewport
        };
        self.animate_to(target)
    }

    /// Advances the running animation to clock time `now`.
    ///
    /// The first tick after a request anchors the animation at `now` and
    /// leaves the viewport at its start. Returns `true` when the viewport
    /// changed.
    pub fn tick(&mut self, now: Duration) -> bool {
        let Some(mut animation) = self.animation else {
            return false;
        };
        if animation.started_at.is_none() {
            animation.started_at = Some(now);
            self.animation = Some(animation);
        }
        let progress = animation.progress(now);
        let finished = progress >= 1.0;
        let next = if finished {
            self.animation = None;
            animation.to
        } else {
            animation.from.lerp(&animation.to, animation.easing.apply(progress))
        };
        trace!(progress, finished, "viewport animation tick");

        if next == self.viewport && !finished {
            return false;
        }
        self.viewport = next;
        self.notify(ViewportEvent::ViewportChanged {
            viewport: next,
            animating: !finished,
        });
        true
    }

    pub fn cancel_animation(&mut self) -> bool {
        self.animation.take().is_some()
    }

    pub fn select_point(&mut self, point: DataPointIndex) -> bool {
        if !self.selection.insert(point) {
            return false;
        }
        self.notify_selection();
        true
    }

    pub fn deselect_point(&mut self, point: DataPointIndex) -> bool {
        if !self.selection.shift_remove(&point) {
            return false;
        }
        self.notify_selection();
        true
    }

    /// Flips membership of `point`; always a state change.
    pub fn toggle_selection(&mut self, point: DataPointIndex) -> bool {
        if !self.selection.shift_remove(&point) {
            self.selection.insert(point);
        }
        self.notify_selection();
        true
    }

    pub fn clear_selection(&mut self) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        self.selection.clear();
        self.notify_selection();
        true
    }

    pub fn set_hovered(&mut self, hovered: Option<DataPointIndex>) -> bool {
        if self.hovered == hovered {
            return false;
        }
        self.hovered = hovered;
        self.notify(ViewportEvent::HoverChanged { hovered });
        true
    }

    pub fn toggle_series_visibility(&mut self, series_index: usize) -> bool {
        if !self.hidden_series.remove(&series_index) {
            self.hidden_series.insert(series_index);
        }
        self.notify_visibility();
        true
    }

    /// Hides every series in `0..total` except `series_index`.
    pub fn isolate_series(&mut self, series_index: usize, total: usize) -> bool {
        if series_index >= total {
            warn!(series_index, total, "isolate request outside series range ignored");
            return false;
        }
        let hidden: BTreeSet<usize> = (0..total).filter(|index| *index != series_index).collect();
        if hidden == self.hidden_series {
            return false;
        }
        self.hidden_series = hidden;
        self.notify_visibility();
        true
    }

    pub fn show_all_series(&mut self) -> bool {
        if self.hidden_series.is_empty() {
            return false;
        }
        self.hidden_series.clear();
        self.notify_visibility();
        true
    }

    /// Registers an observer; notifications follow registration order.
    pub fn add_listener<O>(&mut self, observer: O) -> ListenerId
    where
        O: ViewportObserver + 'static,
    {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id = self.next_listener_id.wrapping_add(1);
        self.listeners.insert(id, Box::new(observer));
        id
    }

    /// Returns `true` when a listener was removed.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.shift_remove(&id).is_some()
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn origin(&self) -> Point2D {
        Point2D::new(self.surface.x, self.surface.y)
    }

    fn animate_to(&mut self, target: Viewport) -> bool {
        let target = target.clamped(self.limits, self.surface);
        if target == self.viewport {
            self.animation = None;
            return false;
        }
        if self.animation_duration.is_zero() {
            self.animation = None;
            return self.apply_viewport(target);
        }
        if self.animation.is_some() {
            debug!("in-flight viewport animation replaced");
        }
        self.animation = Some(ViewportAnimation {
            from: self.viewport,
            to: target,
            started_at: None,
            duration: self.animation_duration,
            easing: self.easing,
        });
        true
    }

    fn apply_viewport(&mut self, next: Viewport) -> bool {
        if next == self.viewport {
            return false;
        }
        self.viewport = next;
        self.notify(ViewportEvent::ViewportChanged {
            viewport: next,
            animating: false,
        });
        true
    }

    fn notify_selection(&mut self) {
        let selection = self.selection.iter().copied().collect();
        self.notify(ViewportEvent::SelectionChanged { selection });
    }

    fn notify_visibility(&mut self) {
        let hidden = self.hidden_series.iter().copied().collect();
        self.notify(ViewportEvent::SeriesVisibilityChanged { hidden });
    }

    fn notify(&mut self, event: ViewportEvent) {
        trace!(listeners = self.listeners.len(), ?event, "viewport event");
        for observer in self.listeners.values_mut() {
            observer.on_viewport_event(&event);
        }
    }
}

fn same_scale(a: &Viewport, b: &Viewport) -> bool {
    a.scale_x == b.scale_x && a.scale_y == b.scale_y
}

fn validate_surface(surface: Rect) -> ChartResult<()> {
    if surface.is_empty() || !surface.x.is_finite() || !surface.y.is_finite() {
        return Err(ChartError::InvalidViewport {
            width: surface.width,
            height: surface.height,
        });
    }
    Ok(())
}

/// Scale and translate that map normalized `[start, end]` onto `[0, extent]`.
fn fit_axis(start: f64, end: f64, extent: f64, clamp: impl Fn(f64) -> f64) -> (f64, f64) {
    let span = (end - start).abs();
    let requested = if span > 0.0 { 1.0 / span } else { f64::MAX };
    let scale = clamp(requested);
    let center = (start + end) * 0.5 * extent;
    let translate = extent * 0.5 - center * scale;
    (scale, translate)
}

#[cfg(test)]
mod tests {
    use super::fit_axis;

    #[test]
    fn fit_axis_aligns_unclamped_range_to_edges() {
        let (scale, translate) = fit_axis(0.25, 0.75, 400.0, |s| s);
        assert!((scale - 2.0).abs() <= 1e-12);
        assert!((0.25 * 400.0 * scale + translate).abs() <= 1e-9);
        assert!((0.75 * 400.0 * scale + translate - 400.0).abs() <= 1e-9);
    }

    #[test]
    fn fit_axis_centres_clamped_range() {
        let (scale, translate) = fit_axis(0.4, 0.6, 100.0, |s: f64| s.min(2.0));
        assert_eq!(scale, 2.0);
        assert!((0.5 * 100.0 * scale + translate - 50.0).abs() <= 1e-9);
    }
}
