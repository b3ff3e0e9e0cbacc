//! Cache traits implemented by [`LruCore`](crate::policy::lru::LruCore).
//!
//! Each layer adds one capability: basic lookup and insertion, removal by key,
//! then recency queries. All of them take `&mut self` wherever recency can
//! change, so implementors are single-threaded;
//! [`CacheManager`](crate::manager::CacheManager) is the shared front end.
//!
//! ```
//! use std::sync::Arc;
//! use lrukit::policy::lru::LruCore;
//! use lrukit::traits::{CoreCache, LruCacheTrait, MutableCache};
//!
//! fn drain_oldest<C: LruCacheTrait<u32, Arc<&'static str>>>(cache: &mut C) -> Vec<u32> {
//!     std::iter::from_fn(|| cache.pop_lru().map(|(key, _)| key)).collect()
//! }
//!
//! let mut cache = LruCore::new(4);
//! cache.insert(1, Arc::new("one"));
//! cache.insert(2, Arc::new("two"));
//! cache.insert(3, Arc::new("three"));
//! cache.remove(&2);
//! assert_eq!(drain_oldest(&mut cache), vec![1, 3]);
//! ```

/// Lookup, insertion and sizing.
pub trait CoreCache<K, V> {
    /// Stores `value` under `key`; returns the replaced value on update.
    ///
    /// Inserting a new key into a full cache evicts first.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Looks up `key` and marks it most recently used.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Membership test that leaves recency alone.
    fn contains(&self, key: &K) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn capacity(&self) -> usize;

    fn clear(&mut self);
}

/// Removal by key.
pub trait MutableCache<K, V>: CoreCache<K, V> {
    /// Drops `key`, returning its value if it was present.
    fn remove(&mut self, key: &K) -> Option<V>;
}

/// Recency-order queries.
pub trait LruCacheTrait<K, V>: MutableCache<K, V> {
    /// Removes and returns the least recently used entry.
    fn pop_lru(&mut self) -> Option<(K, V)>;

    /// The least recently used entry, without reordering.
    fn peek_lru(&self) -> Option<(&K, &V)>;

    /// Marks `key` most recently used; `false` if absent.
    fn touch(&mut self, key: &K) -> bool;

    /// 0 for the most recently used key, `len() - 1` for the next victim.
    fn recency_rank(&self, key: &K) -> Option<usize>;
}
