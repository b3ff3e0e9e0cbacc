//! Builder for [`CacheManager`].
//!
//! Collects the capacity and any eviction observers, then validates once in
//! [`build`](CacheManagerBuilder::build).
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use lrukit::builder::CacheManagerBuilder;
//!
//! let evictions = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&evictions);
//!
//! let cache = CacheManagerBuilder::<u64, String>::new(2)
//!     .on_evict(move |_, _| {
//!         counter.fetch_add(1, Ordering::Relaxed);
//!     })
//!     .build()
//!     .unwrap();
//!
//! cache.put(1, "one".to_string()).unwrap();
//! cache.put(2, "two".to_string()).unwrap();
//! cache.put(3, "three".to_string()).unwrap();
//! assert_eq!(evictions.load(Ordering::Relaxed), 1);
//! ```

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use crate::error::Result;
use crate::manager::{CacheManager, DEFAULT_CAPACITY, EvictionObserver};

/// Builder for creating [`CacheManager`] instances.
pub struct CacheManagerBuilder<K, V> {
    capacity: usize,
    observers: Vec<Arc<EvictionObserver<K, V>>>,
}

impl<K, V> CacheManagerBuilder<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Create a new builder with the specified capacity.
    ///
    /// The capacity is not checked until [`build`](Self::build).
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            observers: Vec::new(),
        }
    }

    /// Overrides the capacity.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Registers an eviction observer on the manager being built.
    ///
    /// Observers are subscribed in the order they were added.
    pub fn on_evict<F>(mut self, observer: F) -> Self
    where
        F: Fn(&CacheManager<K, V>, &K) + Send + Sync + 'static,
    {
        self.observers.push(Arc::new(observer));
        self
    }

    /// Builds the manager.
    ///
    /// # Errors
    ///
    /// [`CacheError::InvalidCapacity`](crate::error::CacheError::InvalidCapacity)
    /// when the capacity is 0.
    pub fn build(self) -> Result<CacheManager<K, V>> {
        let manager = CacheManager::new(self.capacity)?;
        for observer in self.observers {
            manager.subscribe_arc(observer)?;
        }
        Ok(manager)
    }
}

impl<K, V> Default for CacheManagerBuilder<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Builder with [`DEFAULT_CAPACITY`].
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl<K, V> fmt::Debug for CacheManagerBuilder<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheManagerBuilder")
            .field("capacity", &self.capacity)
            .field("observers", &self.observers.len())
            .finish()
    }
}
