use std::cell::RefCell;
use std::rc::Rc;

use chart_geometry::cache::{TextLayout, TextLayoutCache, TextLayoutKey, TextMeasurer, TextMetrics};

/// Monospace measurer that hands out numbered handles.
#[derive(Default)]
struct CountingMeasurer {
    calls: usize,
}

impl TextMeasurer for CountingMeasurer {
    type Handle = usize;

    fn layout(&mut self, key: &TextLayoutKey) -> TextLayout<usize> {
        self.calls += 1;
        let font_size = key.font_size.into_inner();
        TextLayout {
            metrics: TextMetrics {
                width: key.text.chars().count() as f64 * font_size * 0.5,
                height: font_size * 1.2,
                baseline: font_size,
                line_count: 1,
            },
            handle: self.calls,
        }
    }
}

#[test]
fn repeated_measure_hits_cache() {
    let mut cache = TextLayoutCache::new(8);
    let mut measurer = CountingMeasurer::default();
    let key = TextLayoutKey::new("1,024.50", 12.0, None);

    let first = cache.measure(&key, &mut measurer);
    let second = cache.measure(&key, &mut measurer);

    assert_eq!(first, second);
    assert_eq!(measurer.calls, 1);
    assert!((first.width - 48.0).abs() <= 1e-12);
    assert_eq!(cache.stats().hits, 1);
}

#[test]
fn font_size_and_wrap_width_are_part_of_the_key() {
    let mut cache = TextLayoutCache::new(8);
    let mut measurer = CountingMeasurer::default();
    cache.measure(&TextLayoutKey::new("label", 12.0, None), &mut measurer);
    cache.measure(&TextLayoutKey::new("label", 14.0, None), &mut measurer);
    cache.measure(&TextLayoutKey::new("label", 12.0, Some(40.0)), &mut measurer);
    assert_eq!(measurer.calls, 3);
    assert_eq!(cache.len(), 3);
}

#[test]
fn evicted_handles_are_released() {
    let released = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&released);
    let mut cache = TextLayoutCache::with_release(2, move |key: TextLayoutKey, handle: usize| {
        sink.borrow_mut().push((key.text, handle));
    });
    let mut measurer = CountingMeasurer::default();

    for text in ["a", "b", "c"] {
        cache.measure(&TextLayoutKey::new(text, 10.0, None), &mut measurer);
    }
    assert_eq!(released.borrow().as_slice(), &[("a".to_owned(), 1)]);

    cache.clear();
    assert_eq!(released.borrow().len(), 3);
    assert!(cache.is_empty());
}

#[test]
fn handle_is_available_after_measure() {
    let mut cache = TextLayoutCache::new(4);
    let mut measurer = CountingMeasurer::default();
    let key = TextLayoutKey::new("x", 10.0, None);
    assert!(cache.handle(&key).is_none());
    cache.measure(&key, &mut measurer);
    assert_eq!(cache.handle(&key), Some(&1));
}
