use std::marker::PhantomData;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::clock::{Clock, SystemClock};
use crate::{
    Admission, CacheConfig, CacheError, CacheKey, CacheStore, Concurrency, EvictionPolicy,
    PolicyStore,
};

#[cfg(feature = "stats")]
use crate::CacheStats;

/// A store shared by every invocation of one cached callable.
///
/// `SharedStore` puts a policy store behind a `parking_lot::Mutex` and
/// handles what is common to every policy: reading the clock, recording
/// statistics and emitting `tracing` events. It is `Sync` whenever the stored
/// values are `Send`, so it can sit in a `static` (this is what `#[cache]`
/// generates) or inside a [`CachedFn`](crate::CachedFn).
///
/// # Locking
///
/// With [`Concurrency::Shared`] the lookup and the admission are two short
/// critical sections and the computation runs without the lock. Two threads
/// missing the same key may both compute; the store keeps the first result
/// and each caller returns the value it computed. A computation may call back
/// into its own cache.
///
/// With [`Concurrency::Serialized`] the lock is held across lookup,
/// computation and admission, so a key is computed at most once at a time.
/// A computation that re-enters the same cache deadlocks.
///
/// # Examples
///
/// ```
/// use memocache_core::{CacheConfig, CallArgs, SharedStore};
/// use std::convert::Infallible;
///
/// let store: SharedStore<u64> = SharedStore::from_config(&CacheConfig::lru(16)).unwrap();
/// let key = (20u64,).cache_key().unwrap();
///
/// let first = store.get_or_try_insert_with(key.clone(), || Ok::<_, Infallible>(6765));
/// assert_eq!(first, Ok(6765));
/// assert_eq!(store.get(&key), Some(6765));
/// ```
pub struct SharedStore<R, S = PolicyStore<R>> {
    store: Mutex<S>,
    clock: Arc<dyn Clock>,
    concurrency: Concurrency,
    name: Option<String>,
    #[cfg(feature = "stats")]
    stats: Arc<CacheStats>,
    _value: PhantomData<fn() -> R>,
}

impl<R> SharedStore<R, PolicyStore<R>> {
    /// Validates `config` and builds an empty shared store for it.
    pub fn from_config(config: &CacheConfig) -> Result<Self, CacheError> {
        let store = config.build_store()?;
        Ok(Self::new(store).with_concurrency(config.concurrency))
    }
}

impl<R, S> SharedStore<R, S> {
    /// Wraps `store`, reading time from the system clock.
    pub fn new(store: S) -> Self {
        Self {
            store: Mutex::new(store),
            clock: Arc::new(SystemClock),
            concurrency: Concurrency::default(),
            name: None,
            #[cfg(feature = "stats")]
            stats: Arc::new(CacheStats::new()),
            _value: PhantomData,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_concurrency(mut self, concurrency: Concurrency) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Names the store. With the `stats` feature the statistics are also
    /// registered in [`stats_registry`](crate::stats_registry) under `name`.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        #[cfg(feature = "stats")]
        crate::stats_registry::register(&name, &self.stats);
        self.name = Some(name);
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn concurrency(&self) -> Concurrency {
        self.concurrency
    }

    #[cfg(feature = "stats")]
    pub fn stats(&self) -> &Arc<CacheStats> {
        &self.stats
    }

    /// Runs `f` with the inner store locked.
    pub fn inspect<T>(&self, f: impl FnOnce(&S) -> T) -> T {
        f(&self.store.lock())
    }

    fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("<anonymous>")
    }
}

impl<R: Clone, S: CacheStore<R>> SharedStore<R, S> {
    pub fn policy(&self) -> EvictionPolicy {
        self.store.lock().policy()
    }

    /// Returns the cached value for `key`, recording a hit or a miss.
    pub fn get(&self, key: &CacheKey) -> Option<R> {
        let mut store = self.store.lock();
        self.lookup_locked(&mut store, key)
    }

    /// Stores a computed value for `key` under the policy's admission rules.
    pub fn insert(&self, key: CacheKey, value: R) -> Admission {
        let mut store = self.store.lock();
        self.admit_locked(&mut store, key, value)
    }

    /// Returns the cached value for `key`, or runs `compute` and caches its
    /// `Ok` value.
    ///
    /// An `Err` from `compute` is returned as is and leaves the store exactly
    /// as it was: nothing is inserted and nothing is evicted.
    pub fn get_or_try_insert_with<E>(
        &self,
        key: CacheKey,
        compute: impl FnOnce() -> Result<R, E>,
    ) -> Result<R, E> {
        match self.concurrency {
            Concurrency::Shared => {
                if let Some(value) = self.get(&key) {
                    return Ok(value);
                }
                let value = compute()?;
                self.insert(key, value.clone());
                Ok(value)
            }
            Concurrency::Serialized => {
                let mut store = self.store.lock();
                if let Some(value) = self.lookup_locked(&mut store, &key) {
                    return Ok(value);
                }
                let value = compute()?;
                self.admit_locked(&mut store, key, value.clone());
                Ok(value)
            }
        }
    }

    /// Whether a call with `key` would hit now. Does not count as an access.
    pub fn contains(&self, key: &CacheKey) -> bool {
        let now = self.clock.now();
        self.store.lock().contains(key, now)
    }

    /// Number of stored entries. TTL stores count stale entries too.
    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.lock().is_empty()
    }

    /// Stored keys; bounded policies list the next victim first.
    pub fn keys(&self) -> Vec<CacheKey> {
        self.store.lock().keys()
    }

    fn lookup_locked(&self, store: &mut S, key: &CacheKey) -> Option<R> {
        let value = store.lookup(key, self.clock.now());
        match value {
            Some(_) => {
                trace!(cache = self.label(), policy = %store.policy(), ?key, "cache hit");
                #[cfg(feature = "stats")]
                self.stats.record_hit();
            }
            None => {
                trace!(cache = self.label(), policy = %store.policy(), ?key, "cache miss");
                #[cfg(feature = "stats")]
                self.stats.record_miss();
            }
        }
        value
    }

    fn admit_locked(&self, store: &mut S, key: CacheKey, value: R) -> Admission {
        let policy = store.policy();
        let admission = store.admit(key, value, self.clock.now());
        match &admission {
            Admission::Evicted(victim) => {
                debug!(cache = self.label(), %policy, ?victim, "evicted entry");
                #[cfg(feature = "stats")]
                self.stats.record_eviction();
            }
            Admission::Replaced => {
                trace!(cache = self.label(), %policy, "replaced stale entry");
            }
            Admission::Kept => {
                trace!(cache = self.label(), %policy, "kept result of an earlier computation");
            }
            Admission::Inserted => {}
        }
        admission
    }
}

impl<R, S: std::fmt::Debug> std::fmt::Debug for SharedStore<R, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedStore")
            .field("name", &self.name)
            .field("concurrency", &self.concurrency)
            .field("store", &*self.store.lock())
            .finish()
    }
}
