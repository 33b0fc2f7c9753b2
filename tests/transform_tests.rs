use approx::assert_abs_diff_eq;
use chart_geometry::ChartError;
use chart_geometry::core::{Bounds, CoordinateTransform, Point2D, Rect, Viewport, ZoomLimits};

fn transform() -> CoordinateTransform {
    CoordinateTransform::new(
        Bounds::new(0.0, 100.0),
        Bounds::new(0.0, 50.0),
        Rect::new(10.0, 20.0, 400.0, 200.0),
        Viewport::IDENTITY,
    )
    .expect("valid transform")
}

#[test]
fn empty_screen_rect_is_rejected() {
    let err = CoordinateTransform::new(
        Bounds::DEFAULT,
        Bounds::DEFAULT,
        Rect::new(0.0, 0.0, 0.0, 100.0),
        Viewport::IDENTITY,
    )
    .expect_err("zero width");
    assert!(matches!(err, ChartError::InvalidViewport { .. }));
}

#[test]
fn y_axis_is_inverted() {
    let t = transform();
    assert_abs_diff_eq!(t.data_to_screen_y(0.0), 220.0, epsilon = 1e-12);
    assert_abs_diff_eq!(t.data_to_screen_y(50.0), 20.0, epsilon = 1e-12);
    assert_abs_diff_eq!(t.data_to_screen_x(0.0), 10.0, epsilon = 1e-12);
    assert_abs_diff_eq!(t.data_to_screen_x(100.0), 410.0, epsilon = 1e-12);
}

#[test]
fn viewport_overrides_replace_data_bounds() {
    let t = CoordinateTransform::new(
        Bounds::new(0.0, 100.0),
        Bounds::new(0.0, 50.0),
        Rect::from_size(100.0, 100.0),
        Viewport::IDENTITY.with_x_range(50.0, 60.0),
    )
    .expect("valid transform");
    assert_eq!(t.x_bounds(), Bounds::new(50.0, 60.0));
    assert_abs_diff_eq!(t.data_to_screen_x(55.0), 50.0, epsilon = 1e-12);
}

#[test]
fn zoom_keeps_focal_point_fixed() {
    let mut t = transform();
    let focal = Point2D::new(150.0, 80.0);
    let anchored = t.screen_to_data(focal);

    let applied = t.zoom(3.0, focal, ZoomLimits::default());

    assert_eq!(applied, Point2D::new(3.0, 3.0));
    let after = t.data_to_screen(anchored);
    assert_abs_diff_eq!(after.x, focal.x, epsilon = 1e-9);
    assert_abs_diff_eq!(after.y, focal.y, epsilon = 1e-9);
}

#[test]
fn zoom_beyond_limit_applies_clamped_scale_without_drift() {
    let mut t = transform();
    let focal = Point2D::new(300.0, 50.0);
    let anchored = t.screen_to_data(focal);

    let applied = t.zoom(1_000.0, focal, ZoomLimits::uniform(1.0, 4.0));

    assert_eq!(applied, Point2D::new(4.0, 4.0));
    let after = t.data_to_screen(anchored);
    assert_abs_diff_eq!(after.x, focal.x, epsilon = 1e-9);
    assert_abs_diff_eq!(after.y, focal.y, epsilon = 1e-9);
}

#[test]
fn zoom_below_minimum_is_clamped() {
    let mut t = transform();
    let applied = t.zoom(0.01, Point2D::new(100.0, 100.0), ZoomLimits::uniform(1.0, 4.0));
    assert_eq!(applied, Point2D::new(1.0, 1.0));
    assert!(t.viewport().is_identity_transform());
}

#[test]
fn visible_bounds_shrink_when_zoomed() {
    let mut t = transform();
    let (full_x, full_y) = t.visible_data_bounds();
    assert_abs_diff_eq!(full_x.min(), 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(full_x.max(), 100.0, epsilon = 1e-9);
    assert_abs_diff_eq!(full_y.max(), 50.0, epsilon = 1e-9);

    t.zoom(2.0, t.screen_rect().center(), ZoomLimits::default());
    let (zoomed_x, _) = t.visible_data_bounds();
    assert_abs_diff_eq!(zoomed_x.min(), 25.0, epsilon = 1e-9);
    assert_abs_diff_eq!(zoomed_x.max(), 75.0, epsilon = 1e-9);
}

#[test]
fn pan_moves_screen_positions() {
    let mut t = transform();
    let before = t.data_to_screen(Point2D::new(10.0, 10.0));
    t.pan(Point2D::new(25.0, -5.0));
    let after = t.data_to_screen(Point2D::new(10.0, 10.0));
    assert_abs_diff_eq!(after.x - before.x, 25.0, epsilon = 1e-12);
    assert_abs_diff_eq!(after.y - before.y, -5.0, epsilon = 1e-12);
}

#[test]
fn project_points_matches_single_point_mapping() {
    let t = transform();
    let points: Vec<Point2D> = (0..100)
        .map(|i| Point2D::new(f64::from(i), f64::from(i % 7)))
        .collect();
    let projected = t.project_points(&points);
    assert_eq!(projected.len(), points.len());
    for (data, screen) in points.iter().zip(&projected) {
        assert_eq!(*screen, t.data_to_screen(*data));
    }
}

#[test]
fn fingerprint_tracks_viewport_changes() {
    let mut t = transform();
    let before = t.fingerprint();
    assert_eq!(before, transform().fingerprint());
    t.pan(Point2D::new(1.0, 0.0));
    assert_ne!(before, t.fingerprint());
}
