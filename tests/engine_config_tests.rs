use std::time::Duration;

use chart_geometry::core::{Interpolation, ZoomLimits};
use chart_geometry::interaction::Easing;
use chart_geometry::{ChartEngineConfig, ChartError};

#[test]
fn minimal_json_fills_defaults() {
    let config = ChartEngineConfig::from_json_str(r#"{"surface_width": 640, "surface_height": 480}"#)
        .expect("valid config");

    assert_eq!(config, ChartEngineConfig::new(640.0, 480.0));
    assert_eq!(config.cull_threshold, 50);
    assert_eq!(config.zoom_limits, ZoomLimits::uniform(1.0, 10.0));
    assert_eq!(config.interpolation, Interpolation::Linear);
    assert!((config.y_top_padding_ratio - 0.05).abs() <= f64::EPSILON);
    assert_eq!(config.animation_duration(), Duration::from_millis(250));
    assert_eq!(config.easing, Easing::CubicOut);
}

#[test]
fn json_round_trip_preserves_builder_values() {
    let config = ChartEngineConfig::new(1024.0, 768.0)
        .with_interpolation(Interpolation::Cardinal { tension: 0.3 })
        .with_culling(200, 0.25)
        .with_hit_radius_px(10.0)
        .with_animation(Duration::from_millis(120), Easing::QuadInOut);

    let json = config.to_json_pretty().expect("serialize");
    let restored = ChartEngineConfig::from_json_str(&json).expect("parse");
    assert_eq!(restored, config);
}

#[test]
fn tagged_interpolation_and_easing_parse() {
    let config = ChartEngineConfig::from_json_str(
        r#"{
            "surface_width": 800,
            "surface_height": 600,
            "interpolation": { "kind": "cardinal", "tension": 0.75 },
            "easing": "quad_in"
        }"#,
    )
    .expect("valid config");

    assert_eq!(config.interpolation, Interpolation::Cardinal { tension: 0.75 });
    assert_eq!(config.easing, Easing::QuadIn);
}

#[test]
fn invalid_values_map_to_config_errors() {
    let threshold = ChartEngineConfig::new(800.0, 600.0).with_full_repaint_threshold(1.5);
    assert!(matches!(threshold.validate(), Err(ChartError::InvalidConfig(_))));

    let capacity = ChartEngineConfig::new(800.0, 600.0).with_geometry_cache_capacity(0);
    assert!(matches!(capacity.validate(), Err(ChartError::InvalidConfig(_))));

    let tension = ChartEngineConfig::new(800.0, 600.0)
        .with_interpolation(Interpolation::Cardinal { tension: -0.1 });
    assert!(matches!(tension.validate(), Err(ChartError::InvalidConfig(_))));

    let limits = ChartEngineConfig::new(800.0, 600.0).with_zoom_limits(ZoomLimits::uniform(0.0, 2.0));
    assert!(matches!(limits.validate(), Err(ChartError::InvalidConfig(_))));
}

#[test]
fn invalid_surface_maps_to_viewport_error() {
    let config = ChartEngineConfig::new(800.0, f64::NAN);
    assert!(matches!(
        config.validate(),
        Err(ChartError::InvalidViewport { .. })
    ));
}

#[test]
fn malformed_json_is_a_config_error() {
    let err = ChartEngineConfig::from_json_str("{ not json").expect_err("must fail");
    assert!(matches!(err, ChartError::InvalidConfig(_)));

    let missing = ChartEngineConfig::from_json_str(r#"{"surface_width": 800}"#);
    assert!(missing.is_err());
}
