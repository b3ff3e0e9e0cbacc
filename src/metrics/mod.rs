//! Operation counters for [`CacheManager`](crate::manager::CacheManager).
//!
//! Counters are plain `u64`s updated while the manager's write lock is held,
//! so recording never contends on its own. Read them through
//! [`CacheManager::metrics_snapshot`](crate::manager::CacheManager::metrics_snapshot).

pub mod metrics_impl;
pub mod snapshot;
pub mod traits;
