use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{ChartError, ChartResult};

/// Values closer than this are treated as equal by geometry code.
pub const GEOMETRY_EPSILON: f64 = 1e-12;

pub fn decimal_to_f64(value: Decimal, field_name: &str) -> ChartResult<f64> {
    value.to_f64().ok_or_else(|| {
        ChartError::InvalidData(format!("{field_name} cannot be represented as f64"))
    })
}

#[must_use]
pub fn datetime_to_unix_seconds(time: DateTime<Utc>) -> f64 {
    time.timestamp_millis() as f64 / 1000.0
}

/// Clamps a parameter into `[0, 1]`; non-finite input maps to `0`.
#[must_use]
pub fn clamp_unit(t: f64) -> f64 {
    if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 }
}

/// Maps `t` onto one of `segment_count` segments and returns the segment
/// index with the local parameter inside it.
///
/// `t == 1.0` lands on the end of the last segment rather than past it.
#[must_use]
pub fn segment_at(t: f64, segment_count: usize) -> (usize, f64) {
    debug_assert!(segment_count > 0);
    let scaled = clamp_unit(t) * segment_count as f64;
    let index = (scaled.floor() as usize).min(segment_count - 1);
    (index, scaled - index as f64)
}

#[cfg(test)]
mod tests {
    use super::{clamp_unit, segment_at};

    #[test]
    fn segment_at_clamps_last_segment() {
        assert_eq!(segment_at(1.0, 3), (2, 1.0));
        assert_eq!(segment_at(0.0, 3), (0, 0.0));
        let (index, local) = segment_at(0.5, 3);
        assert_eq!(index, 1);
        assert!((local - 0.5).abs() <= 1e-12);
    }

    #[test]
    fn clamp_unit_handles_nan() {
        assert_eq!(clamp_unit(f64::NAN), 0.0);
        assert_eq!(clamp_unit(7.0), 1.0);
        assert_eq!(clamp_unit(-1.0), 0.0);
    }
}
