use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::DEFAULT_FULL_REPAINT_THRESHOLD;
use crate::core::{
    DEFAULT_CULL_MARGIN_RATIO, DEFAULT_CULL_THRESHOLD, DEFAULT_TOP_PADDING_RATIO, Interpolation,
    ViewportCuller, ZoomLimits,
};
use crate::error::{ChartError, ChartResult};
use crate::interaction::Easing;

/// Public engine bootstrap configuration.
///
/// This type is serializable so host applications can persist/load chart setup
/// without inventing their own ad-hoc format. Every field except the surface
/// size has a default and may be omitted from JSON.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartEngineConfig {
    pub surface_width: f64,
    pub surface_height: f64,
    #[serde(default)]
    pub zoom_limits: ZoomLimits,
    #[serde(default = "default_cull_threshold")]
    pub cull_threshold: usize,
    #[serde(default = "default_cull_margin_ratio")]
    pub cull_margin_ratio: f64,
    #[serde(default)]
    pub interpolation: Interpolation,
    #[serde(default = "default_y_top_padding_ratio")]
    pub y_top_padding_ratio: f64,
    #[serde(default)]
    pub include_zero_baseline: bool,
    #[serde(default = "default_hit_radius_px")]
    pub hit_radius_px: f64,
    #[serde(default = "default_geometry_cache_capacity")]
    pub geometry_cache_capacity: usize,
    #[serde(default = "default_full_repaint_threshold")]
    pub full_repaint_threshold: f64,
    #[serde(default = "default_animation_duration_ms")]
    pub animation_duration_ms: u64,
    #[serde(default)]
    pub easing: Easing,
}

impl ChartEngineConfig {
    /// Creates a config with defaults for everything but the surface size.
    #[must_use]
    pub fn new(surface_width: f64, surface_height: f64) -> Self {
        Self {
            surface_width,
            surface_height,
            zoom_limits: ZoomLimits::default(),
            cull_threshold: default_cull_threshold(),
            cull_margin_ratio: default_cull_margin_ratio(),
            interpolation: Interpolation::default(),
            y_top_padding_ratio: default_y_top_padding_ratio(),
            include_zero_baseline: false,
            hit_radius_px: default_hit_radius_px(),
            geometry_cache_capacity: default_geometry_cache_capacity(),
            full_repaint_threshold: default_full_repaint_threshold(),
            animation_duration_ms: default_animation_duration_ms(),
            easing: Easing::default(),
        }
    }

    #[must_use]
    pub fn with_zoom_limits(mut self, limits: ZoomLimits) -> Self {
        self.zoom_limits = limits;
        self
    }

    #[must_use]
    pub fn with_culling(mut self, threshold: usize, margin_ratio: f64) -> Self {
        self.cull_threshold = threshold;
        self.cull_margin_ratio = margin_ratio;
        self
    }

    #[must_use]
    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    #[must_use]
    pub fn with_y_top_padding_ratio(mut self, ratio: f64) -> Self {
        self.y_top_padding_ratio = ratio;
        self
    }

    /// Forces the y range to include zero (bar baselines).
    #[must_use]
    pub fn with_zero_baseline(mut self, include_zero: bool) -> Self {
        self.include_zero_baseline = include_zero;
        self
    }

    #[must_use]
    pub fn with_hit_radius_px(mut self, radius: f64) -> Self {
        self.hit_radius_px = radius;
        self
    }

    #[must_use]
    pub fn with_geometry_cache_capacity(mut self, capacity: usize) -> Self {
        self.geometry_cache_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_full_repaint_threshold(mut self, threshold: f64) -> Self {
        self.full_repaint_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_animation(mut self, duration: Duration, easing: Easing) -> Self {
        self.animation_duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self.easing = easing;
        self
    }

    #[must_use]
    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }

    #[must_use]
    pub fn culler(&self) -> ViewportCuller {
        ViewportCuller::new(self.cull_threshold, self.cull_margin_ratio)
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.surface_width.is_finite()
            || !self.surface_height.is_finite()
            || self.surface_width <= 0.0
            || self.surface_height <= 0.0
        {
            return Err(ChartError::InvalidViewport {
                width: self.surface_width,
                height: self.surface_height,
            });
        }
        self.zoom_limits.validate()?;
        self.culler().validate()?;
        if !self.y_top_padding_ratio.is_finite() || self.y_top_padding_ratio < 0.0 {
            return Err(ChartError::InvalidConfig(
                "y top padding ratio must be finite and >= 0".to_owned(),
            ));
        }
        if !self.hit_radius_px.is_finite() || self.hit_radius_px < 0.0 {
            return Err(ChartError::InvalidConfig(
                "hit radius must be finite and >= 0".to_owned(),
            ));
        }
        if self.geometry_cache_capacity == 0 {
            return Err(ChartError::InvalidConfig(
                "geometry cache capacity must be > 0".to_owned(),
            ));
        }
        if !self.full_repaint_threshold.is_finite()
            || self.full_repaint_threshold <= 0.0
            || self.full_repaint_threshold > 1.0
        {
            return Err(ChartError::InvalidConfig(
                "full repaint threshold must be in (0, 1]".to_owned(),
            ));
        }
        if let Interpolation::Cardinal { tension } = self.interpolation {
            if !(0.0..=1.0).contains(&tension) {
                return Err(ChartError::InvalidConfig(
                    "cardinal tension must be in [0, 1]".to_owned(),
                ));
            }
        }
        Ok(())
    }

    /// Parses and validates a JSON config.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidConfig(format!("failed to parse engine config json: {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ChartError::InvalidConfig(format!("failed to serialize engine config json: {e}"))
        })
    }
}

fn default_cull_threshold() -> usize {
    DEFAULT_CULL_THRESHOLD
}

fn default_cull_margin_ratio() -> f64 {
    DEFAULT_CULL_MARGIN_RATIO
}

fn default_y_top_padding_ratio() -> f64 {
    DEFAULT_TOP_PADDING_RATIO
}

fn default_hit_radius_px() -> f64 {
    6.0
}

fn default_geometry_cache_capacity() -> usize {
    64
}

fn default_full_repaint_threshold() -> f64 {
    DEFAULT_FULL_REPAINT_THRESHOLD
}

fn default_animation_duration_ms() -> u64 {
    250
}
