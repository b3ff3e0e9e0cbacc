//! Error types for the lrukit library.
//!
//! ## Key Components
//!
//! - [`CacheError`]: Returned by [`CacheManager`](crate::manager::CacheManager)
//!   operations (invalid capacity, empty-cache access, use after dispose).
//! - [`InvariantError`]: Returned when the key index and the recency list
//!   disagree (`LruCore::check_invariants`).
//!
//! A missing key is never an error: `get` yields `Ok(None)` and `delete`
//! yields `Ok(false)`.
//!
//! ## Example Usage
//!
//! ```
//! use lrukit::error::CacheError;
//! use lrukit::manager::CacheManager;
//!
//! let bad = CacheManager::<u64, u64>::new(0);
//! assert_eq!(bad.unwrap_err(), CacheError::InvalidCapacity(0));
//!
//! let cache: CacheManager<u64, u64> = CacheManager::new(2).unwrap();
//! assert_eq!(cache.most_recently_used().unwrap_err(), CacheError::EmptyCache);
//! ```

use std::fmt;

use thiserror::Error;

/// Result alias for cache manager operations.
pub type Result<T> = std::result::Result<T, CacheError>;

// ---------------------------------------------------------------------------
// CacheError
// ---------------------------------------------------------------------------

/// Failures reported by the cache manager.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheError {
    /// The requested capacity cannot hold any entry.
    #[error("capacity must be > 0, got {0}")]
    InvalidCapacity(usize),
    /// `most_recently_used` / `least_recently_used` called on an empty cache.
    #[error("cache is empty")]
    EmptyCache,
    /// The manager was disposed and can no longer be used.
    #[error("cache manager has been disposed")]
    Disposed,
}

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal cache invariants are violated.
///
/// Produced by [`LruCore::check_invariants`](crate::policy::lru::LruCore::check_invariants).
/// Carries a human-readable description of which invariant failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
