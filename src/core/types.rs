use std::ops::{Add, Mul, Sub};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::primitives::{datetime_to_unix_seconds, decimal_to_f64};
use crate::error::ChartResult;

/// Plain 2D point, in data space or screen space depending on context.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

impl Add for Point2D {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2D {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point2D {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl From<(f64, f64)> for Point2D {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Axis-aligned screen rectangle. `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Creates a rectangle; negative or non-finite sizes collapse to zero.
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        let sanitize = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        Self {
            x,
            y,
            width: sanitize(width),
            height: sanitize(height),
        }
    }

    #[must_use]
    pub fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Square of side `2 * radius` centred on `center`.
    #[must_use]
    pub fn around(center: Point2D, radius: f64) -> Self {
        let radius = radius.abs();
        Self::new(center.x - radius, center.y - radius, radius * 2.0, radius * 2.0)
    }

    #[must_use]
    pub fn right(self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn center(self) -> Point2D {
        Point2D::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    #[must_use]
    pub fn area(self) -> f64 {
        self.width * self.height
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Inclusive containment test.
    #[must_use]
    pub fn contains(self, point: Point2D) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    #[must_use]
    pub fn intersects(self, other: Self) -> bool {
        self.x <= other.right()
            && self.right() >= other.x
            && self.y <= other.bottom()
            && self.bottom() >= other.y
    }

    #[must_use]
    pub fn union(self, other: Self) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Self::new(
            x,
            y,
            self.right().max(other.right()) - x,
            self.bottom().max(other.bottom()) - y,
        )
    }

    /// Overlapping part of both rectangles, `None` when disjoint.
    #[must_use]
    pub fn intersection(self, other: Self) -> Option<Self> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right < x || bottom < y {
            return None;
        }
        Some(Self::new(x, y, right - x, bottom - y))
    }

    #[must_use]
    pub fn inflate(self, amount: f64) -> Self {
        Self::new(
            self.x - amount,
            self.y - amount,
            self.width + amount * 2.0,
            self.height + amount * 2.0,
        )
    }
}

/// Stable identity of one data point across frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DataPointIndex {
    pub series_index: usize,
    pub point_index: usize,
}

impl DataPointIndex {
    #[must_use]
    pub const fn new(series_index: usize, point_index: usize) -> Self {
        Self {
            series_index,
            point_index,
        }
    }
}

/// Raw x value as supplied by the data layer.
///
/// Every variant resolves to a single `f64` ordinate; transform, interpolation
/// and culling only ever see that ordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum XValue {
    Number(f64),
    /// Resolved to unix seconds.
    Time(DateTime<Utc>),
    Decimal(Decimal),
    /// Category slot index on a band axis.
    Category(usize),
}

impl XValue {
    pub fn ordinate(self) -> ChartResult<f64> {
        match self {
            Self::Number(value) => Ok(value),
            Self::Time(time) => Ok(datetime_to_unix_seconds(time)),
            Self::Decimal(value) => decimal_to_f64(value, "x value"),
            Self::Category(slot) => Ok(slot as f64),
        }
    }
}

impl From<f64> for XValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<DateTime<Utc>> for XValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Time(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{Point2D, Rect, XValue};
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    #[test]
    fn rect_union_and_intersection() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);

        assert_eq!(a.union(b), Rect::new(0.0, 0.0, 15.0, 15.0));
        assert_eq!(a.intersection(b), Some(Rect::new(5.0, 5.0, 5.0, 5.0)));
        assert_eq!(a.intersection(Rect::new(20.0, 20.0, 1.0, 1.0)), None);
    }

    #[test]
    fn rect_rejects_negative_size() {
        let rect = Rect::new(1.0, 1.0, -4.0, f64::NAN);
        assert!(rect.is_empty());
        assert_eq!(rect.area(), 0.0);
    }

    #[test]
    fn x_values_resolve_to_ordinates() {
        let time = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().expect("valid time");
        assert_eq!(XValue::Time(time).ordinate().expect("time"), 1_704_067_200.0);
        assert_eq!(XValue::Category(3).ordinate().expect("category"), 3.0);
        assert_eq!(
            XValue::Decimal(Decimal::new(125, 2)).ordinate().expect("decimal"),
            1.25
        );
        assert_eq!(XValue::from(2.5).ordinate().expect("number"), 2.5);
    }

    #[test]
    fn typed_x_values_survive_json() {
        let time = Utc
            .with_ymd_and_hms(2024, 1, 1, 12, 30, 0)
            .single()
            .expect("valid time");
        for value in [
            XValue::Time(time),
            XValue::Decimal(Decimal::new(125, 2)),
            XValue::Category(4),
        ] {
            let json = serde_json::to_string(&value).expect("serialize");
            let restored: XValue = serde_json::from_str(&json).expect("parse");
            assert_eq!(restored, value);
        }
    }

    #[test]
    fn rect_inflate_grows_every_side() {
        let rect = Rect::new(10.0, 10.0, 4.0, 6.0).inflate(2.0);
        assert_eq!(rect, Rect::new(8.0, 8.0, 8.0, 10.0));
        assert!(Rect::around(Point2D::new(5.0, 5.0), 1.0).inflate(1.0).contains(Point2D::new(3.0, 3.0)));
    }

    #[test]
    fn point_lerp_midpoint() {
        let mid = Point2D::new(0.0, 0.0).lerp(Point2D::new(2.0, 4.0), 0.5);
        assert_eq!(mid, Point2D::new(1.0, 2.0));
    }
}
