//! # Thread-Safe LRU Cache Manager
//!
//! [`CacheManager`] puts an [`LruCore`] behind a single `parking_lot::RwLock`
//! and adds the parts a shared cache needs: eviction observers, an explicit
//! disposed state, logging and (feature `metrics`) operation counters.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                        CacheManager<K, V>                            │
//!   │                                                                      │
//!   │   capacity: usize (immutable)                                        │
//!   │                                                                      │
//!   │   ┌──────────────────────────────────────────────────────────────┐   │
//!   │   │  RwLock<ManagerState>                                        │   │
//!   │   │    core: Option<LruCore<K, V>>   (None once disposed)        │   │
//!   │   │    metrics: ManagerMetrics       (feature = "metrics")       │   │
//!   │   └──────────────────────────────────────────────────────────────┘   │
//!   │                                                                      │
//!   │   ┌──────────────────────────────────────────────────────────────┐   │
//!   │   │  RwLock<ObserverRegistry>                                    │   │
//!   │   │    [(ObserverId, Arc<dyn Fn(&CacheManager, &K)>), ...]       │   │
//!   │   └──────────────────────────────────────────────────────────────┘   │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Locking
//!
//! | Method                    | Lock  | Notes                                 |
//! |---------------------------|-------|---------------------------------------|
//! | `put` / `put_arc`         | Write | May evict and notify observers        |
//! | `get`                     | Write | Promotes the entry to MRU             |
//! | `delete` / `clear`        | Write |                                       |
//! | `dispose`                 | Write | Idempotent                            |
//! | `peek` / `contains`       | Read  | No reordering                         |
//! | `most_recently_used`      | Read  | `EmptyCache` when empty               |
//! | `least_recently_used`     | Read  | `EmptyCache` when empty               |
//! | `current_size`            | Read  |                                       |
//! | `capacity`                | None  | Fixed at construction                 |
//!
//! Every operation runs entirely under one lock acquisition, so operations are
//! linearizable: a `get` never observes a half-inserted or half-evicted entry,
//! and racing `put`s on one key leave the value of whichever took the lock
//! last.
//!
//! ## Eviction Observers
//!
//! Observers run synchronously on the thread that called `put`, while the
//! write lock is held, before the evicted entry is removed. They receive the
//! manager and the evicted key.
//!
//! The cache lock is not reentrant. From inside an observer only these calls
//! are allowed:
//!
//! - [`capacity`](CacheManager::capacity)
//! - [`is_disposed`](CacheManager::is_disposed)
//! - [`subscribe`](CacheManager::subscribe) and
//!   [`unsubscribe`](CacheManager::unsubscribe)
//! - [`observer_count`](CacheManager::observer_count)
//! - `Debug` formatting (prints `<locked>` for the size)
//!
//! They only touch the observer registry, which has its own lock and is
//! released before any observer runs. Every other method, `dispose`
//! included, needs the cache lock and deadlocks. A slow observer stalls every
//! other caller for its duration.
//!
//! An observer registered or removed concurrently with an in-flight eviction
//! may or may not see that eviction.
//!
//! ## Disposal
//!
//! [`dispose`](CacheManager::dispose) drops every entry and observer and puts
//! the manager into a terminal state where all operations return
//! [`CacheError::Disposed`]. Dropping the manager releases the same resources
//! without the explicit call.
//!
//! ## Example Usage
//!
//! ```
//! use std::sync::{Arc, Mutex};
//! use lrukit::manager::CacheManager;
//!
//! let cache: CacheManager<&str, i32> = CacheManager::new(3).unwrap();
//!
//! let evicted = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&evicted);
//! cache.subscribe(move |_cache, key| sink.lock().unwrap().push(*key)).unwrap();
//!
//! cache.put("A", 1).unwrap();
//! cache.put("B", 2).unwrap();
//! cache.put("C", 3).unwrap();
//! assert_eq!(*cache.least_recently_used().unwrap(), 1);
//! assert_eq!(*cache.most_recently_used().unwrap(), 3);
//!
//! assert_eq!(cache.get(&"A").unwrap().as_deref(), Some(&1));
//! assert_eq!(*cache.most_recently_used().unwrap(), 1);
//!
//! cache.put("D", 4).unwrap();
//! assert_eq!(*evicted.lock().unwrap(), vec!["B"]);
//! assert!(!cache.contains(&"B").unwrap());
//! assert_eq!(cache.current_size().unwrap(), 3);
//! ```

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use log::{debug, info, trace, warn};
use parking_lot::RwLock;

use crate::error::{CacheError, Result};
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::ManagerMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::ManagerMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{
    CoreMetricsRecorder, ManagerMetricsRecorder, MetricsSnapshotProvider,
};
use crate::policy::lru::LruCore;
use crate::traits::{CoreCache, LruCacheTrait, MutableCache};

/// Capacity used by [`CacheManager::with_default_capacity`] and `Default`.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Callback invoked with the manager and the key being evicted.
pub type EvictionObserver<K, V> = dyn Fn(&CacheManager<K, V>, &K) + Send + Sync;

/// Handle returned by [`CacheManager::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

struct ObserverRegistry<K, V> {
    next_id: u64,
    observers: Vec<(ObserverId, Arc<EvictionObserver<K, V>>)>,
    closed: bool,
}

impl<K, V> ObserverRegistry<K, V> {
    fn new() -> Self {
        Self {
            next_id: 0,
            observers: Vec::new(),
            closed: false,
        }
    }

    fn add(&mut self, observer: Arc<EvictionObserver<K, V>>) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    fn remove(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    /// Clones the callbacks out so they can run without holding the registry lock.
    fn snapshot(&self) -> Vec<Arc<EvictionObserver<K, V>>> {
        self.observers
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect()
    }

    fn len(&self) -> usize {
        self.observers.len()
    }

    /// Drops every observer and refuses later registrations.
    fn close(&mut self) {
        self.closed = true;
        self.observers.clear();
    }
}

struct ManagerState<K, V> {
    core: Option<LruCore<K, V>>,
    #[cfg(feature = "metrics")]
    metrics: ManagerMetrics,
}

impl<K, V> ManagerState<K, V> {
    fn core(&self) -> Result<&LruCore<K, V>> {
        self.core.as_ref().ok_or_else(disposed)
    }

    fn core_mut(&mut self) -> Result<&mut LruCore<K, V>> {
        self.core.as_mut().ok_or_else(disposed)
    }
}

fn disposed() -> CacheError {
    warn!("operation rejected: cache manager has been disposed");
    CacheError::Disposed
}

/// Thread-safe, fixed-capacity LRU cache with eviction notifications.
///
/// Values are stored as `Arc<V>`; reads hand out clones of the `Arc`, so a
/// caller's handle stays valid after the entry is evicted. Share the manager
/// itself across threads with `Arc<CacheManager<K, V>>`.
pub struct CacheManager<K, V> {
    state: RwLock<ManagerState<K, V>>,
    observers: RwLock<ObserverRegistry<K, V>>,
    capacity: usize,
}

impl<K, V> CacheManager<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a manager holding at most `capacity` entries.
    ///
    /// # Errors
    ///
    /// [`CacheError::InvalidCapacity`] when `capacity` is 0.
    ///
    /// # Example
    ///
    /// ```
    /// use lrukit::error::CacheError;
    /// use lrukit::manager::CacheManager;
    ///
    /// let cache: CacheManager<u32, String> = CacheManager::new(100).unwrap();
    /// assert_eq!(cache.capacity(), 100);
    ///
    /// let err = CacheManager::<u32, String>::new(0).unwrap_err();
    /// assert_eq!(err, CacheError::InvalidCapacity(0));
    /// ```
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity(capacity));
        }
        Ok(Self::with_valid_capacity(capacity))
    }

    /// Creates a manager with [`DEFAULT_CAPACITY`] (1000) entries.
    pub fn with_default_capacity() -> Self {
        Self::with_valid_capacity(DEFAULT_CAPACITY)
    }

    fn with_valid_capacity(capacity: usize) -> Self {
        debug!("creating LRU cache manager with capacity {capacity}");
        CacheManager {
            state: RwLock::new(ManagerState {
                core: Some(LruCore::new(capacity)),
                #[cfg(feature = "metrics")]
                metrics: ManagerMetrics::default(),
            }),
            observers: RwLock::new(ObserverRegistry::new()),
            capacity,
        }
    }

    /// Stores `value` under `key` and makes it the most recently used entry.
    ///
    /// Updating an existing key replaces its value in place and never evicts.
    /// Inserting a new key into a full cache first evicts the least recently
    /// used entry, notifying every observer with its key.
    ///
    /// # Example
    ///
    /// ```
    /// use lrukit::manager::CacheManager;
    ///
    /// let cache: CacheManager<u32, String> = CacheManager::new(2).unwrap();
    /// cache.put(1, "first".to_string()).unwrap();
    /// cache.put(1, "updated".to_string()).unwrap();
    ///
    /// assert_eq!(cache.current_size().unwrap(), 1);
    /// assert_eq!(*cache.most_recently_used().unwrap(), "updated");
    /// ```
    pub fn put(&self, key: K, value: V) -> Result<()> {
        self.put_arc(key, Arc::new(value))
    }

    /// Same as [`put`](Self::put) for a value that is already shared.
    pub fn put_arc(&self, key: K, value: Arc<V>) -> Result<()> {
        let mut state = self.state.write();
        let core = state.core_mut()?;

        let mut notified = None;
        let previous = core.insert_with(key, value, |evicted| {
            notified = Some(self.notify_evicted(evicted));
        });
        let updated = previous.is_some();
        trace!(
            "put {} entry (len {}/{})",
            if updated { "updated" } else { "new" },
            core.len(),
            self.capacity
        );

        #[cfg(feature = "metrics")]
        {
            let metrics = &mut state.metrics;
            metrics.record_insert_call();
            if updated {
                metrics.record_insert_update();
            } else {
                metrics.record_insert_new();
            }
            if let Some(calls) = notified {
                metrics.record_evicted_entry();
                metrics.record_observer_calls(calls);
            }
        }
        #[cfg(not(feature = "metrics"))]
        let _ = notified;

        Ok(())
    }

    fn notify_evicted(&self, key: &K) -> usize {
        let observers = self.observers.read().snapshot();
        debug!(
            "evicting least recently used entry at capacity {}; notifying {} observer(s)",
            self.capacity,
            observers.len()
        );
        for observer in &observers {
            observer(self, key);
        }
        observers.len()
    }

    /// Returns the value for `key` and promotes it to most recently used.
    ///
    /// A missing key is `Ok(None)`, not an error.
    ///
    /// # Example
    ///
    /// ```
    /// use lrukit::manager::CacheManager;
    ///
    /// let cache: CacheManager<u32, String> = CacheManager::new(100).unwrap();
    /// cache.put(1, "value".to_string()).unwrap();
    ///
    /// assert_eq!(*cache.get(&1).unwrap().unwrap(), "value");
    /// assert!(cache.get(&999).unwrap().is_none());
    /// ```
    pub fn get(&self, key: &K) -> Result<Option<Arc<V>>> {
        let mut state = self.state.write();
        let value = state.core_mut()?.get(key).map(Arc::clone);
        trace!("get {}", if value.is_some() { "hit" } else { "miss" });

        #[cfg(feature = "metrics")]
        {
            if value.is_some() {
                state.metrics.record_get_hit();
            } else {
                state.metrics.record_get_miss();
            }
        }

        Ok(value)
    }

    /// Returns the value for `key` without changing recency order.
    pub fn peek(&self, key: &K) -> Result<Option<Arc<V>>> {
        let state = self.state.read();
        Ok(state.core()?.peek(key))
    }

    /// Removes `key`; returns whether an entry was removed.
    ///
    /// Deleting an absent key is `Ok(false)`. No observers are notified.
    ///
    /// # Example
    ///
    /// ```
    /// use lrukit::manager::CacheManager;
    ///
    /// let cache: CacheManager<u32, u32> = CacheManager::new(4).unwrap();
    /// cache.put(1, 10).unwrap();
    ///
    /// assert!(cache.delete(&1).unwrap());
    /// assert!(!cache.delete(&1).unwrap());
    /// assert!(!cache.contains(&1).unwrap());
    /// ```
    pub fn delete(&self, key: &K) -> Result<bool> {
        let mut state = self.state.write();
        let removed = state.core_mut()?.remove(key).is_some();
        trace!("delete {}", if removed { "hit" } else { "miss" });

        #[cfg(feature = "metrics")]
        {
            if removed {
                state.metrics.record_delete_hit();
            } else {
                state.metrics.record_delete_miss();
            }
        }

        Ok(removed)
    }

    /// Returns `true` if `key` is cached. Does not affect recency order.
    pub fn contains(&self, key: &K) -> Result<bool> {
        let state = self.state.read();
        Ok(state.core()?.contains(key))
    }

    /// Removes every entry without notifying observers.
    pub fn clear(&self) -> Result<()> {
        let mut state = self.state.write();
        let core = state.core_mut()?;
        let dropped = core.len();
        core.clear();
        debug!("cleared {dropped} entries");

        #[cfg(feature = "metrics")]
        state.metrics.record_clear();

        Ok(())
    }

    /// Returns the value at the head of the recency order.
    ///
    /// # Errors
    ///
    /// [`CacheError::EmptyCache`] when there are no entries.
    pub fn most_recently_used(&self) -> Result<Arc<V>> {
        let state = self.state.read();
        state
            .core()?
            .peek_mru()
            .map(|(_, value)| Arc::clone(value))
            .ok_or(CacheError::EmptyCache)
    }

    /// Returns the value at the tail of the recency order: the next eviction
    /// victim.
    ///
    /// # Errors
    ///
    /// [`CacheError::EmptyCache`] when there are no entries.
    pub fn least_recently_used(&self) -> Result<Arc<V>> {
        let state = self.state.read();
        state
            .core()?
            .peek_lru()
            .map(|(_, value)| Arc::clone(value))
            .ok_or(CacheError::EmptyCache)
    }

    /// Returns the number of cached entries.
    pub fn current_size(&self) -> Result<usize> {
        let state = self.state.read();
        Ok(state.core()?.len())
    }

    /// Returns `true` if no entries are cached.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.current_size()? == 0)
    }

    /// Maximum number of entries. Fixed at construction; available after disposal.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Keys ordered from most to least recently used.
    pub fn keys_by_recency(&self) -> Result<Vec<K>> {
        let state = self.state.read();
        Ok(state.core()?.iter().map(|(key, _)| key.clone()).collect())
    }

    /// Registers an eviction observer.
    ///
    /// Observers are called in registration order. See the module docs for
    /// the reentrancy rules.
    ///
    /// # Errors
    ///
    /// [`CacheError::Disposed`] once the manager has been disposed.
    pub fn subscribe<F>(&self, observer: F) -> Result<ObserverId>
    where
        F: Fn(&CacheManager<K, V>, &K) + Send + Sync + 'static,
    {
        self.subscribe_arc(Arc::new(observer))
    }

    pub(crate) fn subscribe_arc(&self, observer: Arc<EvictionObserver<K, V>>) -> Result<ObserverId> {
        let mut registry = self.observers.write();
        if registry.closed {
            return Err(disposed());
        }
        let id = registry.add(observer);
        debug!("subscribed eviction observer {id:?} ({} total)", registry.len());
        Ok(id)
    }

    /// Removes an observer; returns `false` if `id` was not registered.
    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        let mut registry = self.observers.write();
        let removed = registry.remove(id);
        if removed {
            debug!("unsubscribed eviction observer {id:?} ({} left)", registry.len());
        }
        removed
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.observers.read().len()
    }

    /// Releases every entry and observer and marks the manager disposed.
    ///
    /// Returns `true` for the call that performed the disposal and `false`
    /// afterwards. Every later cache operation fails with
    /// [`CacheError::Disposed`].
    ///
    /// # Example
    ///
    /// ```
    /// use lrukit::error::CacheError;
    /// use lrukit::manager::CacheManager;
    ///
    /// let cache: CacheManager<u32, u32> = CacheManager::new(4).unwrap();
    /// cache.put(1, 1).unwrap();
    ///
    /// assert!(cache.dispose());
    /// assert!(!cache.dispose());
    /// assert_eq!(cache.get(&1), Err(CacheError::Disposed));
    /// ```
    pub fn dispose(&self) -> bool {
        let mut state = self.state.write();
        let Some(core) = state.core.take() else {
            return false;
        };
        drop(state);

        let released = core.len();
        drop(core);
        self.observers.write().close();
        info!("cache manager disposed; released {released} entries");
        true
    }

    /// Returns `true` once [`dispose`](Self::dispose) has run.
    ///
    /// Reads the observer registry only, so it is callable from an observer.
    pub fn is_disposed(&self) -> bool {
        self.observers.read().closed
    }
}

#[cfg(feature = "metrics")]
impl<K, V> CacheManager<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Copies the operation counters. Size reads as 0 after disposal.
    pub fn metrics_snapshot(&self) -> ManagerMetricsSnapshot {
        let state = self.state.read();
        let m = &state.metrics;
        ManagerMetricsSnapshot {
            get_calls: m.get_calls,
            get_hits: m.get_hits,
            get_misses: m.get_misses,
            insert_calls: m.insert_calls,
            insert_updates: m.insert_updates,
            insert_new: m.insert_new,
            evicted_entries: m.evicted_entries,
            observer_calls: m.observer_calls,
            delete_calls: m.delete_calls,
            delete_hits: m.delete_hits,
            clear_calls: m.clear_calls,
            cache_len: state.core.as_ref().map_or(0, |core| core.len()),
            capacity: self.capacity,
        }
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider<ManagerMetricsSnapshot> for CacheManager<K, V>
where
    K: Eq + Hash + Clone,
{
    fn snapshot(&self) -> ManagerMetricsSnapshot {
        self.metrics_snapshot()
    }
}

impl<K, V> Default for CacheManager<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a manager with [`DEFAULT_CAPACITY`].
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

impl<K, V> fmt::Debug for CacheManager<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("CacheManager");
        out.field("capacity", &self.capacity);
        // try_read: formatting from inside an observer must not deadlock
        match self.state.try_read() {
            Some(state) => match state.core.as_ref() {
                Some(core) => out.field("len", &core.len()),
                None => out.field("disposed", &true),
            },
            None => out.field("len", &"<locked>"),
        };
        out.finish_non_exhaustive()
    }
}
