//! Bounded caches that keep repeated and animated redraws cheap.

pub mod dirty_region;
pub mod lru;
pub mod text_layout;

pub use dirty_region::{
    DEFAULT_FULL_REPAINT_THRESHOLD, DirtyChange, DirtyReason, DirtyRegion, DirtyRegionTracker,
};
pub use lru::{EvictCallback, LruCache, LruCacheStats};
pub use text_layout::{
    DEFAULT_TEXT_LAYOUT_CAPACITY, TextLayout, TextLayoutCache, TextLayoutKey, TextMeasurer,
    TextMetrics,
};
