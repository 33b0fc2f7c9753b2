use serde::{Deserialize, Serialize};

use crate::core::{Bounds, Point2D, Rect};
use crate::error::{ChartError, ChartResult};

/// Per-axis zoom clamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomLimits {
    pub min_zoom_x: f64,
    pub max_zoom_x: f64,
    pub min_zoom_y: f64,
    pub max_zoom_y: f64,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self::uniform(1.0, 10.0)
    }
}

impl ZoomLimits {
    #[must_use]
    pub const fn uniform(min_zoom: f64, max_zoom: f64) -> Self {
        Self {
            min_zoom_x: min_zoom,
            max_zoom_x: max_zoom,
            min_zoom_y: min_zoom,
            max_zoom_y: max_zoom,
        }
    }

    pub fn validate(self) -> ChartResult<Self> {
        for (axis, min, max) in [
            ("x", self.min_zoom_x, self.max_zoom_x),
            ("y", self.min_zoom_y, self.max_zoom_y),
        ] {
            if !min.is_finite() || !max.is_finite() || min <= 0.0 || min > max {
                return Err(ChartError::InvalidConfig(format!(
                    "zoom limits for {axis} axis must be finite with 0 < min <= max"
                )));
            }
        }
        Ok(self)
    }

    #[must_use]
    pub fn clamp_x(self, scale: f64) -> f64 {
        clamp_scale(scale, self.min_zoom_x, self.max_zoom_x)
    }

    #[must_use]
    pub fn clamp_y(self, scale: f64) -> f64 {
        clamp_scale(scale, self.min_zoom_y, self.max_zoom_y)
    }
}

fn clamp_scale(scale: f64, min: f64, max: f64) -> f64 {
    if !scale.is_finite() || scale <= 0.0 {
        return min;
    }
    scale.clamp(min, max)
}

/// Pan/zoom state layered over the data-to-screen mapping.
///
/// Scale and translate live in screen space and are applied about the
/// destination rect origin: `screen = origin + (base - origin) * scale + translate`.
/// The optional bounds override the data-derived axis ranges when set.
/// Deserialized values must carry finite, positive scales and finite
/// translations and overrides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawViewport")]
pub struct Viewport {
    pub x_min: Option<f64>,
    pub x_max: Option<f64>,
    pub y_min: Option<f64>,
    pub y_max: Option<f64>,
    pub scale_x: f64,
    pub scale_y: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

#[derive(Deserialize)]
struct RawViewport {
    #[serde(default)]
    x_min: Option<f64>,
    #[serde(default)]
    x_max: Option<f64>,
    #[serde(default)]
    y_min: Option<f64>,
    #[serde(default)]
    y_max: Option<f64>,
    scale_x: f64,
    scale_y: f64,
    translate_x: f64,
    translate_y: f64,
}

impl TryFrom<RawViewport> for Viewport {
    type Error = ChartError;

    fn try_from(raw: RawViewport) -> ChartResult<Self> {
        for (axis, scale) in [("x", raw.scale_x), ("y", raw.scale_y)] {
            if !scale.is_finite() || scale <= 0.0 {
                return Err(ChartError::InvalidConfig(format!(
                    "viewport {axis} scale must be finite and > 0"
                )));
            }
        }
        let overrides = [raw.x_min, raw.x_max, raw.y_min, raw.y_max];
        if !raw.translate_x.is_finite()
            || !raw.translate_y.is_finite()
            || overrides.iter().flatten().any(|value| !value.is_finite())
        {
            return Err(ChartError::InvalidConfig(
                "viewport translation and bound overrides must be finite".to_owned(),
            ));
        }
        Ok(Self {
            x_min: raw.x_min,
            x_max: raw.x_max,
            y_min: raw.y_min,
            y_max: raw.y_max,
            scale_x: raw.scale_x,
            scale_y: raw.scale_y,
            translate_x: raw.translate_x,
            translate_y: raw.translate_y,
        })
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Viewport {
    pub const IDENTITY: Self = Self {
        x_min: None,
        x_max: None,
        y_min: None,
        y_max: None,
        scale_x: 1.0,
        scale_y: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
    };

    #[must_use]
    pub fn with_x_range(mut self, min: f64, max: f64) -> Self {
        self.x_min = Some(min);
        self.x_max = Some(max);
        self
    }

    #[must_use]
    pub fn with_y_range(mut self, min: f64, max: f64) -> Self {
        self.y_min = Some(min);
        self.y_max = Some(max);
        self
    }

    /// Applies the override fields on top of data-derived bounds.
    #[must_use]
    pub fn resolve_x_bounds(&self, data: Bounds) -> Bounds {
        Bounds::new(
            self.x_min.unwrap_or(data.min()),
            self.x_max.unwrap_or(data.max()),
        )
    }

    #[must_use]
    pub fn resolve_y_bounds(&self, data: Bounds) -> Bounds {
        Bounds::new(
            self.y_min.unwrap_or(data.min()),
            self.y_max.unwrap_or(data.max()),
        )
    }

    #[must_use]
    pub fn is_identity_transform(&self) -> bool {
        self.scale_x == 1.0
            && self.scale_y == 1.0
            && self.translate_x == 0.0
            && self.translate_y == 0.0
    }

    /// Screen-space forward map of a base (unzoomed) coordinate.
    #[must_use]
    pub fn apply(&self, base: Point2D, origin: Point2D) -> Point2D {
        Point2D::new(
            origin.x + (base.x - origin.x) * self.scale_x + self.translate_x,
            origin.y + (base.y - origin.y) * self.scale_y + self.translate_y,
        )
    }

    /// Inverse of [`Viewport::apply`].
    #[must_use]
    pub fn unapply(&self, screen: Point2D, origin: Point2D) -> Point2D {
        Point2D::new(
            origin.x + (screen.x - origin.x - self.translate_x) / self.scale_x,
            origin.y + (screen.y - origin.y - self.translate_y) / self.scale_y,
        )
    }

    /// Translates by a screen-space delta.
    #[must_use]
    pub fn panned(mut self, delta: Point2D) -> Self {
        if delta.is_finite() {
            self.translate_x += delta.x;
            self.translate_y += delta.y;
        }
        self
    }

    /// Multiplies the scale by `factor` per axis while keeping `focal` fixed.
    ///
    /// The requested scale is clamped to `limits` first and the translation
    /// is compensated with the clamped value, so the focal point never
    /// drifts at the zoom limits.
    #[must_use]
    pub fn zoomed(self, factor: Point2D, focal: Point2D, origin: Point2D, limits: ZoomLimits) -> Self {
        let sanitize = |f: f64| if f.is_finite() && f > 0.0 { f } else { 1.0 };
        let target_x = limits.clamp_x(self.scale_x * sanitize(factor.x));
        let target_y = limits.clamp_y(self.scale_y * sanitize(factor.y));
        self.rescaled(Point2D::new(target_x, target_y), focal, origin)
    }

    /// Sets absolute scales (already clamped by the caller) keeping `focal` fixed.
    #[must_use]
    pub fn rescaled(mut self, scale: Point2D, focal: Point2D, origin: Point2D) -> Self {
        if !focal.is_finite() {
            return self;
        }
        let base = self.unapply(focal, origin);
        self.scale_x = scale.x;
        self.scale_y = scale.y;
        self.translate_x = focal.x - origin.x - (base.x - origin.x) * scale.x;
        self.translate_y = focal.y - origin.y - (base.y - origin.y) * scale.y;
        self
    }

    /// Re-applies `limits` to the current scales, anchored at the rect centre.
    #[must_use]
    pub fn clamped(self, limits: ZoomLimits, rect: Rect) -> Self {
        let scale = Point2D::new(limits.clamp_x(self.scale_x), limits.clamp_y(self.scale_y));
        if scale.x == self.scale_x && scale.y == self.scale_y {
            return self;
        }
        let origin = Point2D::new(rect.x, rect.y);
        self.rescaled(scale, rect.center(), origin)
    }

    /// Component-wise interpolation used by animated transitions.
    ///
    /// Optional bounds interpolate when both ends carry a value; otherwise
    /// whichever end is set holds until `t` reaches 1, then the target wins.
    #[must_use]
    pub fn lerp(&self, target: &Self, t: f64) -> Self {
        let mix = |a: f64, b: f64| a + (b - a) * t;
        let mix_opt = |a: Option<f64>, b: Option<f64>| match (a, b) {
            (Some(a), Some(b)) => Some(mix(a, b)),
            _ if t >= 1.0 => b,
            _ => a.or(b),
        };
        Self {
            x_min: mix_opt(self.x_min, target.x_min),
            x_max: mix_opt(self.x_max, target.x_max),
            y_min: mix_opt(self.y_min, target.y_min),
            y_max: mix_opt(self.y_max, target.y_max),
            scale_x: mix(self.scale_x, target.scale_x),
            scale_y: mix(self.scale_y, target.scale_y),
            translate_x: mix(self.translate_x, target.translate_x),
            translate_y: mix(self.translate_y, target.translate_y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Viewport, ZoomLimits};
    use crate::core::Point2D;

    #[test]
    fn zoom_limits_reject_inverted_range() {
        assert!(ZoomLimits::uniform(2.0, 1.0).validate().is_err());
        assert!(ZoomLimits::uniform(0.0, 1.0).validate().is_err());
        assert!(ZoomLimits::default().validate().is_ok());
    }

    #[test]
    fn zoomed_keeps_focal_fixed() {
        let origin = Point2D::new(10.0, 20.0);
        let focal = Point2D::new(110.0, 70.0);
        let zoomed = Viewport::IDENTITY.zoomed(
            Point2D::new(2.0, 2.0),
            focal,
            origin,
            ZoomLimits::default(),
        );
        let base = Viewport::IDENTITY.unapply(focal, origin);
        let after = zoomed.apply(base, origin);
        assert!(after.distance_to(focal) <= 1e-9);
        assert_eq!(zoomed.scale_x, 2.0);
    }

    #[test]
    fn deserialize_rejects_degenerate_scale() {
        let zero = r#"{"scale_x": 0.0, "scale_y": 1.0, "translate_x": 0.0, "translate_y": 0.0}"#;
        assert!(serde_json::from_str::<Viewport>(zero).is_err());

        let viewport = Viewport::IDENTITY.with_x_range(1.0, 4.0);
        let json = serde_json::to_string(&viewport).expect("serialize");
        let restored: Viewport = serde_json::from_str(&json).expect("parse");
        assert_eq!(restored, viewport);

        let minimal = r#"{"scale_x": 2.0, "scale_y": 1.0, "translate_x": -5.0, "translate_y": 0.0}"#;
        let parsed: Viewport = serde_json::from_str(minimal).expect("parse");
        assert_eq!(parsed.x_min, None);
        assert_eq!(parsed.scale_x, 2.0);
    }

    #[test]
    fn lerp_snaps_missing_bounds_at_end() {
        let from = Viewport::IDENTITY;
        let to = Viewport::IDENTITY.with_x_range(0.0, 5.0);
        assert_eq!(from.lerp(&to, 0.5).x_min, Some(0.0));
        assert_eq!(from.lerp(&to, 1.0).x_max, Some(5.0));
    }
}
