use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ChartError, ChartResult};

/// Headroom added above the y range so the top-most value is not clipped.
pub const DEFAULT_TOP_PADDING_RATIO: f64 = 0.05;

/// Relative half-width given to a degenerate range of large magnitude.
const DEGENERATE_PAD_RATIO: f64 = 1e-9;

#[derive(Deserialize)]
struct RawBounds {
    min: f64,
    max: f64,
}

impl From<RawBounds> for Bounds {
    fn from(raw: RawBounds) -> Self {
        Self::new(raw.min, raw.max)
    }
}

/// Immutable numeric range with `min <= max` and a non-zero span.
///
/// Every constructor normalizes its input: swapped ends are reordered,
/// a degenerate range widens to `[v - pad, v + pad]` and non-finite ends
/// fall back to [`Bounds::DEFAULT`]. `pad` is 1 for ordinary magnitudes and
/// grows with `|v|` so the span stays representable (e.g. nanosecond
/// timestamps). Deserialization goes through the same normalization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawBounds")]
pub struct Bounds {
    min: f64,
    max: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Bounds {
    /// Safe fallback range.
    pub const DEFAULT: Self = Self { min: 0.0, max: 1.0 };

    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        if !min.is_finite() || !max.is_finite() {
            warn!(min, max, "non-finite bounds replaced with default range");
            return Self::DEFAULT;
        }
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        if min == max {
            return Self::widened(min);
        }
        Self { min, max }
    }

    fn widened(value: f64) -> Self {
        let pad = (value.abs() * DEGENERATE_PAD_RATIO).max(1.0);
        let min = value - pad;
        let max = value + pad;
        // At the edge of the f64 range only one side can move.
        Self {
            min: if min.is_finite() { min } else { value },
            max: if max.is_finite() { max } else { value },
        }
    }

    /// Computes min/max over `values`, skipping non-finite entries.
    ///
    /// Returns [`ChartError::EmptyInput`] when nothing finite remains; callers
    /// pick their own fallback range in that case.
    pub fn from_values<I>(values: I) -> ChartResult<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for value in values.into_iter().filter(|v| v.is_finite()) {
            min = min.min(value);
            max = max.max(value);
        }
        if min > max {
            return Err(ChartError::EmptyInput);
        }
        Ok(Self::new(min, max))
    }

    #[must_use]
    pub fn from_values_or<I>(values: I, fallback: Self) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        Self::from_values(values).unwrap_or(fallback)
    }

    /// Folds several ranges into their union.
    pub fn union<I>(bounds: I) -> ChartResult<Self>
    where
        I: IntoIterator<Item = Self>,
    {
        bounds
            .into_iter()
            .reduce(Self::union_with)
            .ok_or(ChartError::EmptyInput)
    }

    #[must_use]
    pub fn union_with(self, other: Self) -> Self {
        Self::new(self.min.min(other.min), self.max.max(other.max))
    }

    /// Extends the range so it contains 0 (bar baselines).
    #[must_use]
    pub fn including_zero(self) -> Self {
        Self::new(self.min.min(0.0), self.max.max(0.0))
    }

    /// Adds `ratio * span` above `max`.
    #[must_use]
    pub fn with_top_padding(self, ratio: f64) -> Self {
        if !ratio.is_finite() || ratio <= 0.0 {
            return self;
        }
        Self::new(self.min, self.max + self.span() * ratio)
    }

    /// Adds `ratio * span` on both sides.
    #[must_use]
    pub fn expanded(self, ratio: f64) -> Self {
        if !ratio.is_finite() || ratio <= 0.0 {
            return self;
        }
        let margin = self.span() * ratio;
        Self::new(self.min - margin, self.max + margin)
    }

    #[must_use]
    pub const fn min(self) -> f64 {
        self.min
    }

    #[must_use]
    pub const fn max(self) -> f64 {
        self.max
    }

    #[must_use]
    pub fn span(self) -> f64 {
        self.max - self.min
    }

    #[must_use]
    pub fn contains(self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Position of `value` inside the range, `0` at `min` and `1` at `max`.
    #[must_use]
    pub fn normalize(self, value: f64) -> f64 {
        (value - self.min) / self.span()
    }

    #[must_use]
    pub fn denormalize(self, ratio: f64) -> f64 {
        self.min + ratio * self.span()
    }
}
