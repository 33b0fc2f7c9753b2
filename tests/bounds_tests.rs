use chart_geometry::ChartError;
use chart_geometry::core::{Bounds, DEFAULT_TOP_PADDING_RATIO};
use proptest::prelude::*;

#[test]
fn from_values_ignores_non_finite_entries() {
    let bounds = Bounds::from_values([3.0, f64::NAN, -2.0, f64::INFINITY, 7.5]).expect("finite values");
    assert_eq!(bounds.min(), -2.0);
    assert_eq!(bounds.max(), 7.5);
}

#[test]
fn from_values_without_finite_input_is_empty_input() {
    let err = Bounds::from_values([f64::NAN, f64::NEG_INFINITY]).expect_err("no finite values");
    assert!(matches!(err, ChartError::EmptyInput));

    let err = Bounds::from_values(std::iter::empty()).expect_err("empty");
    assert!(matches!(err, ChartError::EmptyInput));
}

#[test]
fn from_values_or_uses_caller_fallback() {
    let fallback = Bounds::new(10.0, 20.0);
    assert_eq!(Bounds::from_values_or([f64::NAN], fallback), fallback);
}

#[test]
fn degenerate_range_widens_by_one_at_small_magnitude() {
    let bounds = Bounds::from_values([4.0, 4.0]).expect("finite values");
    assert_eq!(bounds.min(), 3.0);
    assert_eq!(bounds.max(), 5.0);
}

#[test]
fn degenerate_range_at_large_magnitude_keeps_positive_span() {
    let stamp = 1.7e18;
    let bounds = Bounds::new(stamp, stamp);
    assert!(bounds.span() > 0.0);
    assert!(bounds.contains(stamp));
    assert!((bounds.normalize(stamp) - 0.5).abs() <= 1e-6);

    let edge = Bounds::new(f64::MAX, f64::MAX);
    assert!(edge.span() > 0.0);
    assert_eq!(edge.max(), f64::MAX);
}

#[test]
fn union_with_merges_two_ranges() {
    let merged = Bounds::new(0.0, 2.0).union_with(Bounds::new(5.0, 6.0));
    assert_eq!((merged.min(), merged.max()), (0.0, 6.0));
}

#[test]
fn deserialized_bounds_are_normalized() {
    let swapped: Bounds = serde_json::from_str(r#"{"min": 9.0, "max": -1.0}"#).expect("parse");
    assert_eq!((swapped.min(), swapped.max()), (-1.0, 9.0));

    let degenerate: Bounds = serde_json::from_str(r#"{"min": 4.0, "max": 4.0}"#).expect("parse");
    assert_eq!((degenerate.min(), degenerate.max()), (3.0, 5.0));

    let json = serde_json::to_string(&Bounds::new(1.0, 2.0)).expect("serialize");
    let restored: Bounds = serde_json::from_str(&json).expect("parse");
    assert_eq!(restored, Bounds::new(1.0, 2.0));
}

#[test]
fn non_finite_constructor_falls_back_to_default() {
    assert_eq!(Bounds::new(f64::NAN, 1.0), Bounds::DEFAULT);
    assert_eq!(Bounds::new(0.0, f64::INFINITY), Bounds::DEFAULT);
}

#[test]
fn swapped_ends_are_reordered() {
    let bounds = Bounds::new(9.0, -1.0);
    assert_eq!((bounds.min(), bounds.max()), (-1.0, 9.0));
}

#[test]
fn including_zero_extends_positive_and_negative_ranges() {
    let positive = Bounds::new(5.0, 10.0).including_zero();
    assert_eq!((positive.min(), positive.max()), (0.0, 10.0));

    let negative = Bounds::new(-10.0, -5.0).including_zero();
    assert_eq!((negative.min(), negative.max()), (-10.0, 0.0));

    let spanning = Bounds::new(-1.0, 1.0);
    assert_eq!(spanning.including_zero(), spanning);
}

#[test]
fn union_folds_all_ranges() {
    let merged = Bounds::union([Bounds::new(0.0, 1.0), Bounds::new(-3.0, 0.5), Bounds::new(2.0, 4.0)])
        .expect("non-empty list");
    assert_eq!((merged.min(), merged.max()), (-3.0, 4.0));

    assert!(matches!(
        Bounds::union(Vec::<Bounds>::new()),
        Err(ChartError::EmptyInput)
    ));
}

#[test]
fn top_padding_only_moves_max() {
    let padded = Bounds::new(0.0, 100.0).with_top_padding(DEFAULT_TOP_PADDING_RATIO);
    assert_eq!(padded.min(), 0.0);
    assert!((padded.max() - 105.0).abs() <= 1e-12);
}

#[test]
fn expanded_adds_margin_on_both_sides() {
    let expanded = Bounds::new(10.0, 20.0).expanded(0.1);
    assert!((expanded.min() - 9.0).abs() <= 1e-12);
    assert!((expanded.max() - 21.0).abs() <= 1e-12);
}

#[test]
fn normalize_and_denormalize_are_inverse() {
    let bounds = Bounds::new(-50.0, 150.0);
    assert_eq!(bounds.normalize(-50.0), 0.0);
    assert_eq!(bounds.normalize(150.0), 1.0);
    assert!((bounds.denormalize(bounds.normalize(42.0)) - 42.0).abs() <= 1e-12);
}

proptest! {
    #[test]
    fn from_values_min_never_exceeds_max(values in prop::collection::vec(-1e12f64..1e12, 1..64)) {
        let bounds = Bounds::from_values(values).expect("finite values");
        prop_assert!(bounds.min() <= bounds.max());
        prop_assert!(bounds.span() > 0.0);
    }

    #[test]
    fn from_values_contains_every_finite_input(values in prop::collection::vec(-1e6f64..1e6, 1..64)) {
        let bounds = Bounds::from_values(values.iter().copied()).expect("finite values");
        for value in values {
            prop_assert!(bounds.contains(value));
        }
    }
}
