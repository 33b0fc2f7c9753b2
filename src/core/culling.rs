use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::Bounds;
use crate::error::{ChartError, ChartResult};

pub const DEFAULT_CULL_THRESHOLD: usize = 50;
pub const DEFAULT_CULL_MARGIN_RATIO: f64 = 0.1;

/// Sub-slice of a sorted series that is worth drawing.
///
/// `start..end` are indices into the original slice; use
/// [`CullResult::data_index`] to recover original point identities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CullResult<'a, T> {
    pub window: &'a [T],
    pub start: usize,
    pub end: usize,
}

impl<T> CullResult<'_, T> {
    #[must_use]
    pub fn data_index(&self, window_index: usize) -> usize {
        self.start + window_index
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.window.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }
}

/// Binary-search culling for x-sorted series.
///
/// The visible range is widened by `margin_ratio` of its span on both sides
/// and the located window keeps one extra element on each side so lines
/// entering the viewport are drawn from their true off-screen neighbour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportCuller {
    pub threshold: usize,
    pub margin_ratio: f64,
}

impl Default for ViewportCuller {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_CULL_THRESHOLD,
            margin_ratio: DEFAULT_CULL_MARGIN_RATIO,
        }
    }
}

impl ViewportCuller {
    #[must_use]
    pub const fn new(threshold: usize, margin_ratio: f64) -> Self {
        Self {
            threshold,
            margin_ratio,
        }
    }

    pub fn validate(self) -> ChartResult<Self> {
        if !self.margin_ratio.is_finite() || self.margin_ratio < 0.0 {
            return Err(ChartError::InvalidConfig(
                "cull margin ratio must be finite and >= 0".to_owned(),
            ));
        }
        Ok(self)
    }

    /// Returns the window of `data` relevant to `visible_x`.
    ///
    /// `data` must be sorted ascending by `key`; unsorted input yields an
    /// unspecified window (the order is not checked).
    pub fn cull<'a, T, F>(&self, data: &'a [T], visible_x: Bounds, key: F) -> CullResult<'a, T>
    where
        F: Fn(&T) -> f64,
    {
        if data.len() < self.threshold {
            return CullResult {
                window: data,
                start: 0,
                end: data.len(),
            };
        }

        let range = visible_x.expanded(self.margin_ratio);
        let first_visible = data.partition_point(|item| key(item) < range.min());
        let past_last_visible = data.partition_point(|item| key(item) <= range.max());

        let start = first_visible.saturating_sub(1);
        let end = (past_last_visible + 1).min(data.len()).max(start);

        trace!(
            total = data.len(),
            first_visible,
            past_last_visible,
            start,
            end,
            "viewport cull"
        );

        CullResult {
            window: &data[start..end],
            start,
            end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ViewportCuller;
    use crate::core::Bounds;

    #[test]
    fn small_series_are_not_culled() {
        let data: Vec<f64> = (0..10).map(f64::from).collect();
        let culled = ViewportCuller::default().cull(&data, Bounds::new(3.0, 4.0), |v| *v);
        assert_eq!(culled.len(), 10);
        assert_eq!((culled.start, culled.end), (0, 10));
    }

    #[test]
    fn window_is_padded_by_one_on_each_side() {
        let data: Vec<f64> = (0..100).map(f64::from).collect();
        let culler = ViewportCuller::new(0, 0.0);
        let culled = culler.cull(&data, Bounds::new(10.5, 20.5), |v| *v);
        assert_eq!(culled.start, 10);
        assert_eq!(culled.end, 22);
        assert_eq!(culled.window.first(), Some(&10.0));
        assert_eq!(culled.window.last(), Some(&21.0));
        assert_eq!(culled.data_index(1), 11);
    }

    #[test]
    fn range_past_the_data_keeps_the_last_point() {
        let data: Vec<f64> = (0..100).map(f64::from).collect();
        let culled = ViewportCuller::new(0, 0.0).cull(&data, Bounds::new(500.0, 600.0), |v| *v);
        assert_eq!(culled.window, &[99.0]);
    }
}
