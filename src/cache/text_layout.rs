use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use super::lru::{LruCache, LruCacheStats};

pub const DEFAULT_TEXT_LAYOUT_CAPACITY: usize = 512;

/// Identity of one shaped text run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextLayoutKey {
    pub text: String,
    pub font_size: OrderedFloat<f64>,
    pub max_width: Option<OrderedFloat<f64>>,
}

impl TextLayoutKey {
    #[must_use]
    pub fn new(text: impl Into<String>, font_size: f64, max_width: Option<f64>) -> Self {
        Self {
            text: text.into(),
            font_size: OrderedFloat(font_size),
            max_width: max_width.map(OrderedFloat),
        }
    }
}

/// Measured extents of a text run.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
    pub baseline: f64,
    pub line_count: usize,
}

/// A measured layout plus whatever native object backs it.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout<H> {
    pub metrics: TextMetrics,
    pub handle: H,
}

/// Text shaping collaborator supplied by the host toolkit.
pub trait TextMeasurer {
    type Handle;

    fn layout(&mut self, key: &TextLayoutKey) -> TextLayout<Self::Handle>;
}

/// Memoizes text layouts; evicted handles go to the release callback.
#[derive(Debug)]
pub struct TextLayoutCache<H> {
    entries: LruCache<TextLayoutKey, TextLayout<H>>,
}

impl<H> Default for TextLayoutCache<H> {
    fn default() -> Self {
        Self::new(DEFAULT_TEXT_LAYOUT_CAPACITY)
    }
}

impl<H> TextLayoutCache<H> {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: LruCache::new(capacity),
        }
    }

    /// Creates a cache whose evicted handles are passed to `release`.
    #[must_use]
    pub fn with_release<F>(capacity: usize, mut release: F) -> Self
    where
        F: FnMut(TextLayoutKey, H) + 'static,
        H: 'static,
    {
        Self {
            entries: LruCache::with_on_evict(capacity, move |key, layout: TextLayout<H>| {
                release(key, layout.handle);
            }),
        }
    }

    /// Returns cached metrics for `key`, shaping through `measurer` on a miss.
    pub fn measure<M>(&mut self, key: &TextLayoutKey, measurer: &mut M) -> TextMetrics
    where
        M: TextMeasurer<Handle = H>,
    {
        if let Some(layout) = self.entries.get(key) {
            return layout.metrics;
        }
        let layout = measurer.layout(key);
        let metrics = layout.metrics;
        self.entries.put(key.clone(), layout);
        metrics
    }

    /// Native handle for an already measured key.
    pub fn handle(&mut self, key: &TextLayoutKey) -> Option<&H> {
        self.entries.get(key).map(|layout| &layout.handle)
    }

    /// Drops every layout, releasing all handles.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn stats(&self) -> LruCacheStats {
        self.entries.stats()
    }
}
