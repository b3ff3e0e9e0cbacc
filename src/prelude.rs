pub use crate::builder::CacheManagerBuilder;
pub use crate::ds::{RecencyList, SlotArena, SlotId};
pub use crate::error::{CacheError, InvariantError};
pub use crate::manager::{CacheManager, DEFAULT_CAPACITY, EvictionObserver, ObserverId};
#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::ManagerMetricsSnapshot;
pub use crate::policy::lru::LruCore;
pub use crate::traits::{CoreCache, LruCacheTrait, MutableCache};
