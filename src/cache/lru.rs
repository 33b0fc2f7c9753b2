use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use tracing::trace;

/// Called exactly once for every entry the cache drops on its own.
pub type EvictCallback<K, V> = Box<dyn FnMut(K, V)>;

/// Runtime metrics exposed by [`LruCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LruCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub size: usize,
}

struct Node<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Bounded least-recently-used cache with O(1) `get`/`put`.
///
/// Entries live in a slot arena threaded by an intrusive doubly linked list
/// (head = most recent). Entries dropped by capacity pressure, by
/// [`LruCache::clear`] or by [`LruCache::evict_where`] are handed to the
/// eviction callback so associated resources are released deterministically.
/// Values returned to the caller (`put` replacement, `remove`) are not.
pub struct LruCache<K, V> {
    map: HashMap<K, usize>,
    slots: Vec<Option<Node<K, V>>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    capacity: usize,
    on_evict: Option<EvictCallback<K, V>>,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl<K, V> fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("len", &self.map.len())
            .field("capacity", &self.capacity)
            .field("has_on_evict", &self.on_evict.is_some())
            .finish()
    }
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache holding at most `capacity` entries (minimum 1).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            map: HashMap::with_capacity(capacity),
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            tail: None,
            capacity,
            on_evict: None,
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    #[must_use]
    pub fn with_on_evict<F>(capacity: usize, on_evict: F) -> Self
    where
        F: FnMut(K, V) + 'static,
    {
        let mut cache = Self::new(capacity);
        cache.on_evict = Some(Box::new(on_evict));
        cache
    }

    /// Looks up `key` and marks it most recently used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let Some(&slot) = self.map.get(key) else {
            self.misses = self.misses.saturating_add(1);
            return None;
        };
        self.hits = self.hits.saturating_add(1);
        self.touch(slot);
        self.slots[slot].as_ref().map(|node| &node.value)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let Some(&slot) = self.map.get(key) else {
            self.misses = self.misses.saturating_add(1);
            return None;
        };
        self.hits = self.hits.saturating_add(1);
        self.touch(slot);
        self.slots[slot].as_mut().map(|node| &mut node.value)
    }

    /// Looks up `key` without affecting recency or stats.
    #[must_use]
    pub fn peek(&self, key: &K) -> Option<&V> {
        let slot = *self.map.get(key)?;
        self.slots[slot].as_ref().map(|node| &node.value)
    }

    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Inserts or replaces `key`, evicting the least recently used entry
    /// when full. Returns the replaced value, if any.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&slot) = self.map.get(&key) {
            self.touch(slot);
            return self.slots[slot]
                .as_mut()
                .map(|node| std::mem::replace(&mut node.value, value));
        }

        if self.map.len() >= self.capacity {
            self.evict_lru();
        }

        let node = Node {
            key: key.clone(),
            value,
            prev: None,
            next: None,
        };
        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(node);
                slot
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };
        self.map.insert(key, slot);
        self.push_front(slot);
        None
    }

    /// Removes `key` and returns its value to the caller (no callback).
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let slot = self.map.remove(key)?;
        self.take_slot(slot).map(|(_, value)| value)
    }

    /// Evicts every entry matching `predicate`, least recent first.
    /// Returns the number of evicted entries.
    pub fn evict_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&K, &V) -> bool,
    {
        let mut doomed = Vec::new();
        let mut cursor = self.tail;
        while let Some(slot) = cursor {
            let Some(node) = self.slots[slot].as_ref() else {
                break;
            };
            if predicate(&node.key, &node.value) {
                doomed.push(slot);
            }
            cursor = node.prev;
        }
        for slot in &doomed {
            self.evict_slot(*slot);
        }
        doomed.len()
    }

    /// Evicts every entry, least recent first.
    pub fn clear(&mut self) {
        while self.tail.is_some() {
            self.evict_lru();
        }
        self.slots.clear();
        self.free.clear();
    }

    /// Changes the capacity, evicting from the LRU end if it shrank.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        while self.map.len() > self.capacity {
            self.evict_lru();
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn stats(&self) -> LruCacheStats {
        LruCacheStats {
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            size: self.map.len(),
        }
    }

    /// Keys from most to least recently used.
    pub fn keys_by_recency(&self) -> impl Iterator<Item = &K> {
        let mut cursor = self.head;
        std::iter::from_fn(move || {
            let node = self.slots[cursor?].as_ref()?;
            cursor = node.next;
            Some(&node.key)
        })
    }

    fn evict_lru(&mut self) {
        if let Some(slot) = self.tail {
            self.evict_slot(slot);
        }
    }

    fn evict_slot(&mut self, slot: usize) {
        let Some((key, value)) = self.take_slot(slot) else {
            return;
        };
        self.map.remove(&key);
        self.evictions = self.evictions.saturating_add(1);
        trace!(size = self.map.len(), "lru entry evicted");
        if let Some(on_evict) = self.on_evict.as_mut() {
            on_evict(key, value);
        }
    }

    fn take_slot(&mut self, slot: usize) -> Option<(K, V)> {
        self.unlink(slot);
        let node = self.slots[slot].take()?;
        self.free.push(slot);
        Some((node.key, node.value))
    }

    fn touch(&mut self, slot: usize) {
        if self.head == Some(slot) {
            return;
        }
        self.unlink(slot);
        self.push_front(slot);
    }

    fn unlink(&mut self, slot: usize) {
        let Some(node) = self.slots[slot].as_mut() else {
            return;
        };
        let (prev, next) = (node.prev.take(), node.next.take());
        match prev {
            Some(prev) => {
                if let Some(prev_node) = self.slots[prev].as_mut() {
                    prev_node.next = next;
                }
            }
            None if self.head == Some(slot) => self.head = next,
            None => {}
        }
        match next {
            Some(next) => {
                if let Some(next_node) = self.slots[next].as_mut() {
                    next_node.prev = prev;
                }
            }
            None if self.tail == Some(slot) => self.tail = prev,
            None => {}
        }
    }

    fn push_front(&mut self, slot: usize) {
        let old_head = self.head;
        if let Some(node) = self.slots[slot].as_mut() {
            node.prev = None;
            node.next = old_head;
        }
        if let Some(old_node) = old_head.and_then(|old| self.slots[old].as_mut()) {
            old_node.prev = Some(slot);
        }
        self.head = Some(slot);
        if self.tail.is_none() {
            self.tail = Some(slot);
        }
    }
}
