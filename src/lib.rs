//! lrukit: a thread-safe, fixed-capacity LRU cache manager with eviction
//! notifications.
//!
//! The crate is layered bottom-up:
//!
//! - [`ds`]: arena storage and an index-linked recency list.
//! - [`policy::lru`]: single-threaded [`LruCore`](policy::lru::LruCore).
//! - [`manager`]: [`CacheManager`](manager::CacheManager), the lock-guarded
//!   shared cache with observers and disposal.
//! - [`builder`]: fluent construction of a manager.
//!
//! ```
//! use lrukit::prelude::*;
//!
//! let cache: CacheManager<String, u32> = CacheManager::new(2).unwrap();
//! cache.put("a".to_string(), 1).unwrap();
//! cache.put("b".to_string(), 2).unwrap();
//! cache.put("c".to_string(), 3).unwrap();
//!
//! assert!(!cache.contains(&"a".to_string()).unwrap());
//! assert_eq!(cache.current_size().unwrap(), 2);
//! ```

pub mod builder;
pub mod ds;
pub mod error;
pub mod manager;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod policy;
pub mod prelude;
pub mod traits;
