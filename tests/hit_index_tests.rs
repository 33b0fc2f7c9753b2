use chart_geometry::core::{DataPointIndex, Point2D, Rect, SpatialHitIndex};

fn index() -> SpatialHitIndex<&'static str> {
    SpatialHitIndex::new(Rect::from_size(800.0, 600.0))
}

#[test]
fn empty_index_finds_nothing() {
    let index = index();
    assert!(index.find_nearest(Point2D::new(10.0, 10.0), Some(50.0)).is_none());
}

#[test]
fn containing_region_is_found() {
    let mut index = index();
    index.register_data_point(
        Rect::new(100.0, 100.0, 10.0, 10.0),
        DataPointIndex::new(0, 3),
        "a",
    );
    let hit = index
        .find_nearest(Point2D::new(105.0, 102.0), None)
        .expect("point inside region");
    assert_eq!(hit.owner, DataPointIndex::new(0, 3));
    assert_eq!(*hit.payload, "a");
    assert!(hit.contained);
}

#[test]
fn exact_overlap_prefers_last_registered_region() {
    let mut index = index();
    let bounds = Rect::new(200.0, 200.0, 20.0, 20.0);
    index.register_data_point(bounds, DataPointIndex::new(0, 0), "bottom");
    index.register_data_point(bounds, DataPointIndex::new(1, 0), "top");

    let hit = index
        .find_nearest(Point2D::new(210.0, 210.0), None)
        .expect("overlapping regions");
    assert_eq!(*hit.payload, "top");
    assert_eq!(hit.owner.series_index, 1);
}

#[test]
fn radius_matches_nearest_centre_outside_bounds() {
    let mut index = index();
    index.register_data_point(Rect::around(Point2D::new(50.0, 50.0), 2.0), DataPointIndex::new(0, 0), "far");
    index.register_data_point(Rect::around(Point2D::new(60.0, 50.0), 2.0), DataPointIndex::new(0, 1), "near");

    let probe = Point2D::new(57.0, 50.0);
    assert!(index.find_nearest(probe, None).is_none());

    let hit = index.find_nearest(probe, Some(8.0)).expect("within radius");
    assert_eq!(*hit.payload, "near");
    assert!(!hit.contained);
    assert!((hit.distance - 3.0).abs() <= 1e-12);
}

#[test]
fn containment_beats_closer_centre() {
    let mut index = index();
    index.register_data_point(Rect::new(0.0, 0.0, 100.0, 100.0), DataPointIndex::new(0, 0), "large");
    index.register_data_point(Rect::around(Point2D::new(104.0, 50.0), 1.0), DataPointIndex::new(0, 1), "small");

    let hit = index
        .find_nearest(Point2D::new(99.0, 50.0), Some(10.0))
        .expect("hit");
    assert_eq!(*hit.payload, "large");
}

#[test]
fn rebuild_drops_stale_regions() {
    let mut index = index();
    index.register_data_point(Rect::new(0.0, 0.0, 10.0, 10.0), DataPointIndex::new(0, 0), "old");
    let generation = index.generation();

    index.rebuild(Rect::from_size(800.0, 600.0));

    assert!(index.is_empty());
    assert_eq!(index.generation(), generation + 1);
    assert!(index.find_nearest(Point2D::new(5.0, 5.0), Some(20.0)).is_none());
}

#[test]
fn regions_outside_surface_are_still_queryable() {
    let mut index = index();
    index.register_data_point(Rect::new(-30.0, -30.0, 20.0, 20.0), DataPointIndex::new(2, 9), "offscreen");
    let hit = index.find_nearest(Point2D::new(-20.0, -20.0), None).expect("edge cell");
    assert_eq!(hit.owner, DataPointIndex::new(2, 9));
}

#[test]
fn regions_for_series_filters_by_owner() {
    let mut index = index();
    for i in 0..4 {
        let series = i % 2;
        index.register_data_point(
            Rect::around(Point2D::new(10.0 * i as f64, 10.0), 1.0),
            DataPointIndex::new(series, i),
            "p",
        );
    }
    let owners: Vec<usize> = index.regions_for_series(1).map(|r| r.owner.point_index).collect();
    assert_eq!(owners, vec![1, 3]);
    assert_eq!(index.len(), 4);
}
