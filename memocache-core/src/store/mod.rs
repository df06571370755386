//! Per-policy result stores.
//!
//! Each store is a plain, unsynchronized structure operated through `&mut self`.
//! Sharing one between threads is the job of [`SharedStore`](crate::SharedStore),
//! which wraps it in a lock.
//!
//! The stores split a cached call into two steps: [`CacheStore::lookup`] before
//! the wrapped computation runs, and [`CacheStore::admit`] after it succeeded.
//! A computation that fails never reaches `admit`, so it can neither insert a
//! partial entry nor trigger an eviction.

mod lfu;
mod lru;
mod ttl;
mod unbounded;

pub use lfu::LfuStore;
pub use lru::LruStore;
pub use ttl::TtlStore;
pub use unbounded::UnboundedStore;

use std::time::{Duration, Instant};

use crate::{CacheConfig, CacheError, CacheKey, EvictionPolicy};

/// What [`CacheStore::admit`] did with a computed value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Admission {
    /// The key was absent and the value was stored.
    Inserted,
    /// The value was stored and another key was evicted to make room.
    Evicted(CacheKey),
    /// A stale entry under the same key was overwritten.
    Replaced,
    /// A live entry for the key already existed and was kept.
    Kept,
}

/// Storage and retention policy of one cache.
pub trait CacheStore<R> {
    fn policy(&self) -> EvictionPolicy;

    /// Returns the stored value for `key` if it is a hit at `now`, applying the
    /// policy's hit bookkeeping (recency, frequency).
    fn lookup(&mut self, key: &CacheKey, now: Instant) -> Option<R>;

    /// Stores a freshly computed value.
    ///
    /// Admission is insert-if-absent: when a live entry already holds the key
    /// (a concurrent caller got there first) it is kept, so at most one result
    /// is ever stored per key.
    fn admit(&mut self, key: CacheKey, value: R, now: Instant) -> Admission;

    /// Whether `lookup` would hit at `now`. Does not touch bookkeeping.
    fn contains(&self, key: &CacheKey, now: Instant) -> bool;

    /// Number of stored entries, stale ones included.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the stored keys. Bounded stores list them in eviction order,
    /// next victim first.
    fn keys(&self) -> Vec<CacheKey>;
}

/// A store of any policy, selected at runtime from a [`CacheConfig`].
///
/// # Examples
///
/// ```
/// use memocache_core::{CacheConfig, CacheStore, CallArgs, EvictionPolicy, PolicyStore};
/// use std::time::Instant;
///
/// let mut store: PolicyStore<i32> = CacheConfig::lru(2).build_store().unwrap();
/// assert_eq!(store.policy(), EvictionPolicy::LRU);
///
/// let now = Instant::now();
/// let key = (1, 2).cache_key().unwrap();
/// store.admit(key.clone(), 3, now);
/// assert_eq!(store.lookup(&key, now), Some(3));
/// ```
#[derive(Debug)]
pub enum PolicyStore<R> {
    Unbounded(UnboundedStore<R>),
    Ttl(TtlStore<R>),
    Lru(LruStore<R>),
    Lfu(LfuStore<R>),
}

impl<R> PolicyStore<R> {
    pub fn unbounded() -> Self {
        PolicyStore::Unbounded(UnboundedStore::new())
    }

    pub fn ttl(ttl: Duration) -> Self {
        PolicyStore::Ttl(TtlStore::new(ttl))
    }

    pub fn lru(maxsize: usize) -> Result<Self, CacheError> {
        LruStore::new(maxsize).map(PolicyStore::Lru)
    }

    pub fn lfu(maxsize: usize) -> Result<Self, CacheError> {
        LfuStore::new(maxsize).map(PolicyStore::Lfu)
    }

    /// Validates `config` and builds the matching store.
    pub fn from_config(config: &CacheConfig) -> Result<Self, CacheError> {
        config.build_store()
    }
}

impl<R: Clone> CacheStore<R> for PolicyStore<R> {
    fn policy(&self) -> EvictionPolicy {
        match self {
            PolicyStore::Unbounded(s) => s.policy(),
            PolicyStore::Ttl(s) => s.policy(),
            PolicyStore::Lru(s) => s.policy(),
            PolicyStore::Lfu(s) => s.policy(),
        }
    }

    fn lookup(&mut self, key: &CacheKey, now: Instant) -> Option<R> {
        match self {
            PolicyStore::Unbounded(s) => s.lookup(key, now),
            PolicyStore::Ttl(s) => s.lookup(key, now),
            PolicyStore::Lru(s) => s.lookup(key, now),
            PolicyStore::Lfu(s) => s.lookup(key, now),
        }
    }

    fn admit(&mut self, key: CacheKey, value: R, now: Instant) -> Admission {
        match self {
            PolicyStore::Unbounded(s) => s.admit(key, value, now),
            PolicyStore::Ttl(s) => s.admit(key, value, now),
            PolicyStore::Lru(s) => s.admit(key, value, now),
            PolicyStore::Lfu(s) => s.admit(key, value, now),
        }
    }

    fn contains(&self, key: &CacheKey, now: Instant) -> bool {
        match self {
            PolicyStore::Unbounded(s) => s.contains(key, now),
            PolicyStore::Ttl(s) => s.contains(key, now),
            PolicyStore::Lru(s) => s.contains(key, now),
            PolicyStore::Lfu(s) => s.contains(key, now),
        }
    }

    fn len(&self) -> usize {
        match self {
            PolicyStore::Unbounded(s) => s.len(),
            PolicyStore::Ttl(s) => s.len(),
            PolicyStore::Lru(s) => s.len(),
            PolicyStore::Lfu(s) => s.len(),
        }
    }

    fn keys(&self) -> Vec<CacheKey> {
        match self {
            PolicyStore::Unbounded(s) => s.keys(),
            PolicyStore::Ttl(s) => s.keys(),
            PolicyStore::Lru(s) => s.keys(),
            PolicyStore::Lfu(s) => s.keys(),
        }
    }
}
