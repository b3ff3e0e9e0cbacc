//! # Least Recently Used (LRU) Cache Core
//!
//! Single-threaded LRU structure backing [`CacheManager`](crate::manager::CacheManager).
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                           LruCore<K, V>                              │
//!   │                                                                      │
//!   │   ┌──────────────────────────────────────────────────────────────┐   │
//!   │   │  FxHashMap<K, SlotId>  (key index)                           │   │
//!   │   │                                                              │   │
//!   │   │  ┌─────────┬────────────────────────────────────────────┐    │   │
//!   │   │  │   Key   │  SlotId { index, generation }              │    │   │
//!   │   │  ├─────────┼────────────────────────────────────────────┤    │   │
//!   │   │  │   "a"   │  ────────────────────────────────────────┐ │    │   │
//!   │   │  │   "b"   │  ──────────────────────────────────┐     │ │    │   │
//!   │   │  │   "c"   │  ────────────────────────────┐     │     │ │    │   │
//!   │   │  └─────────┴──────────────────────────────┼─────┼─────┼─┘    │   │
//!   │   └───────────────────────────────────────────┼─────┼─────┼──────┘   │
//!   │                                               │     │     │          │
//!   │   ┌───────────────────────────────────────────┼─────┼─────┼──────┐   │
//!   │   │  RecencyList<Entry<K, V>>                 ▼     ▼     ▼      │   │
//!   │   │  newest ► ┌──────┐ ◄──► ┌──────┐ ◄──► ┌──────┐ ◄ oldest      │   │
//!   │   │    (MRU)  │ c    │      │ b    │      │ a    │   (LRU)       │   │
//!   │   │           └──────┘      └──────┘      └──────┘               │   │
//!   │   └──────────────────────────────────────────────────────────────┘   │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each list node owns an `Entry` holding the key and an `Arc<V>`. The index
//! maps every key to exactly one node and every node is named by exactly one
//! index key; all mutations update both sides together.
//!
//! ## LRU Operations Flow
//!
//! ```text
//!   INSERT new item (cache full, capacity = 3)
//!
//!     head ──► [A] ◄──► [B] ◄──► [C] ◄── tail
//!
//!   insert(D):
//!     1. on_evict(&C), then unlink [C] and drop its index entry
//!     2. push [D] at head
//!
//!     head ──► [D] ◄──► [A] ◄──► [B] ◄── tail
//!
//!   UPDATE existing item
//!
//!   insert(B, new):
//!     1. overwrite B's value in place (same SlotId)
//!     2. move [B] to head; nothing is evicted
//!
//!     head ──► [B] ◄──► [D] ◄──► [A] ◄── tail
//! ```
//!
//! ## Methods
//!
//! | Method               | Complexity | Description                               |
//! |----------------------|------------|-------------------------------------------|
//! | `new(capacity)`      | O(1)       | Create cache with given capacity          |
//! | `insert(k, v)`       | O(1)*      | Insert or update, may evict LRU           |
//! | `insert_with(k,v,f)` | O(1)*      | Same, calling `f(&evicted_key)` first     |
//! | `get(&k)`            | O(1)       | Get value, moves to MRU position          |
//! | `peek(&k)`           | O(1)       | Get value without affecting LRU order     |
//! | `peek_mru()`         | O(1)       | Head entry                                |
//! | `peek_lru()`         | O(1)       | Tail entry                                |
//! | `pop_lru()`          | O(1)       | Remove and return least recently used     |
//! | `remove(&k)`         | O(1)       | Remove entry by key                       |
//! | `touch(&k)`          | O(1)       | Move to MRU without returning value       |
//! | `recency_rank(&k)`   | O(n)       | Position in recency order (0 = MRU)       |
//! | `iter()`             | O(n)       | Entries MRU → LRU                         |
//! | `clear()`            | O(n)       | Remove all entries                        |
//!
//! ## Thread Safety
//!
//! `LruCore` is **not** thread-safe on its own; every reordering operation takes
//! `&mut self`. [`CacheManager`](crate::manager::CacheManager) wraps it in a
//! `parking_lot::RwLock`.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::ds::recency_list::RecencyList;
use crate::ds::slot_arena::SlotId;
use crate::error::InvariantError;
use crate::manager::DEFAULT_CAPACITY;
use crate::traits::{CoreCache, LruCacheTrait, MutableCache};

/// Recency-list payload: the key (needed to drop the index entry on eviction)
/// and the shared value.
#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: Arc<V>,
}

/// LRU cache core: `FxHashMap` key index over an arena-backed recency list.
pub struct LruCore<K, V> {
    index: FxHashMap<K, SlotId>,
    list: RecencyList<Entry<K, V>>,
    capacity: usize,
}

impl<K, V> LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a new LRU cache core with the given capacity.
    ///
    /// A capacity of 0 creates a cache that accepts no items (all inserts are
    /// no-ops). [`CacheManager`](crate::manager::CacheManager) rejects 0
    /// before it gets here.
    ///
    /// # Example
    /// ```
    /// use lrukit::policy::lru::LruCore;
    /// use lrukit::traits::CoreCache;
    ///
    /// let cache: LruCore<u32, String> = LruCore::new(100);
    /// assert!(cache.is_empty());
    /// ```
    #[inline]
    pub fn new(capacity: usize) -> Self {
        LruCore {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            list: RecencyList::with_capacity(capacity),
            capacity,
        }
    }

    /// Inserts or updates `key`, calling `on_evict` with the key of the entry
    /// about to be evicted to make room.
    ///
    /// `on_evict` runs before the victim leaves the index and the list, and at
    /// most once. Updating an existing key never evicts. Returns the previous
    /// value for an update.
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use lrukit::policy::lru::LruCore;
    ///
    /// let mut cache = LruCore::new(1);
    /// cache.insert_with("a", Arc::new(1), |_| unreachable!());
    ///
    /// let mut evicted = None;
    /// cache.insert_with("b", Arc::new(2), |key| evicted = Some(*key));
    /// assert_eq!(evicted, Some("a"));
    /// ```
    pub fn insert_with<F>(&mut self, key: K, value: Arc<V>, on_evict: F) -> Option<Arc<V>>
    where
        F: FnOnce(&K),
    {
        if let Some(&id) = self.index.get(&key) {
            let previous = self
                .list
                .update_and_promote(id, |entry| std::mem::replace(&mut entry.value, value));

            #[cfg(debug_assertions)]
            self.validate_invariants();

            return previous;
        }

        if self.capacity == 0 {
            return None;
        }

        if self.index.len() >= self.capacity {
            self.evict_with(on_evict);
        }

        let id = self.list.push_newest(Entry {
            key: key.clone(),
            value,
        });
        self.index.insert(key, id);

        #[cfg(debug_assertions)]
        self.validate_invariants();

        None
    }

    /// Evicts the tail entry, calling `on_evict` with its key before removal.
    ///
    /// No-op returning `None` on an empty cache.
    pub fn evict_with<F>(&mut self, on_evict: F) -> Option<(K, Arc<V>)>
    where
        F: FnOnce(&K),
    {
        let tail = self.list.oldest_id()?;
        if let Some(entry) = self.list.get(tail) {
            on_evict(&entry.key);
        }

        let entry = self.list.remove(tail)?;
        let indexed = self.index.remove(&entry.key);
        debug_assert_eq!(indexed, Some(tail), "index and tail node disagree");
        Some((entry.key, entry.value))
    }

    /// Read-only lookup without LRU update.
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use lrukit::policy::lru::LruCore;
    /// use lrukit::traits::CoreCache;
    ///
    /// let mut cache: LruCore<u32, String> = LruCore::new(2);
    /// cache.insert(1, Arc::new("first".to_string()));
    /// cache.insert(2, Arc::new("second".to_string()));
    ///
    /// // Peek doesn't affect LRU order
    /// assert_eq!(*cache.peek(&1).unwrap(), "first");
    ///
    /// cache.insert(3, Arc::new("third".to_string()));
    /// assert!(!cache.contains(&1));  // Evicted
    /// ```
    #[inline]
    pub fn peek(&self, key: &K) -> Option<Arc<V>> {
        let &id = self.index.get(key)?;
        self.list.get(id).map(|entry| Arc::clone(&entry.value))
    }

    /// Returns the most recently used entry without reordering.
    #[inline]
    pub fn peek_mru(&self) -> Option<(&K, &Arc<V>)> {
        self.list.newest().map(|entry| (&entry.key, &entry.value))
    }

    /// Iterates entries from most to least recently used.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &Arc<V>)> {
        self.list.iter().map(|(_, entry)| (&entry.key, &entry.value))
    }

    /// Checks that the key index and the recency list describe the same set
    /// of entries.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.index.len() != self.list.len() {
            return Err(InvariantError::new(format!(
                "index holds {} keys but recency list holds {} nodes",
                self.index.len(),
                self.list.len()
            )));
        }
        if self.capacity > 0 && self.index.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "len {} exceeds capacity {}",
                self.index.len(),
                self.capacity
            )));
        }
        self.list.check_links()?;
        for (id, entry) in self.list.iter() {
            if self.index.get(&entry.key) != Some(&id) {
                return Err(InvariantError::new(
                    "recency list node is not the target of its index key",
                ));
            }
        }
        for &id in self.index.values() {
            if !self.list.contains(id) {
                return Err(InvariantError::new("index key points at a dead slot"));
            }
        }
        Ok(())
    }

    #[cfg(debug_assertions)]
    fn validate_invariants(&self) {
        debug_assert_eq!(self.index.len(), self.list.len());
        debug_assert!(self.capacity == 0 || self.index.len() <= self.capacity);
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if let Err(err) = self.check_invariants() {
            panic!("LruCore invariant violated: {err}");
        }
    }
}

impl<K, V> CoreCache<K, Arc<V>> for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    #[inline]
    fn insert(&mut self, key: K, value: Arc<V>) -> Option<Arc<V>> {
        self.insert_with(key, value, |_| {})
    }

    #[inline]
    fn get(&mut self, key: &K) -> Option<&Arc<V>> {
        let &id = self.index.get(key)?;
        self.list.promote(id);
        self.list.get(id).map(|entry| &entry.value)
    }

    #[inline]
    fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    #[inline]
    fn len(&self) -> usize {
        self.index.len()
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        self.index.clear();
        self.list.clear();
    }
}

impl<K, V> MutableCache<K, Arc<V>> for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    #[inline]
    fn remove(&mut self, key: &K) -> Option<Arc<V>> {
        let id = self.index.remove(key)?;
        let entry = self.list.remove(id);

        #[cfg(debug_assertions)]
        self.validate_invariants();

        entry.map(|entry| entry.value)
    }
}

impl<K, V> LruCacheTrait<K, Arc<V>> for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    #[inline]
    fn pop_lru(&mut self) -> Option<(K, Arc<V>)> {
        self.evict_with(|_| {})
    }

    #[inline]
    fn peek_lru(&self) -> Option<(&K, &Arc<V>)> {
        self.list.oldest().map(|entry| (&entry.key, &entry.value))
    }

    #[inline]
    fn touch(&mut self, key: &K) -> bool {
        match self.index.get(key) {
            Some(&id) => self.list.promote(id),
            None => false,
        }
    }

    fn recency_rank(&self, key: &K) -> Option<usize> {
        let &target = self.index.get(key)?;
        self.list.iter().position(|(id, _)| id == target)
    }
}

impl<K, V> fmt::Debug for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCore")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish_non_exhaustive()
    }
}

impl<K, V> Default for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an LRU core with [`DEFAULT_CAPACITY`].
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl<K, V> Extend<(K, Arc<V>)> for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn extend<T: IntoIterator<Item = (K, Arc<V>)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}
