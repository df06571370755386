use std::time::Duration;

use crate::{CacheError, EvictionPolicy, PolicyStore};

/// How a shared cache guards its store.
///
/// * `Shared` - the lookup and the admission are separate critical sections and
///   the wrapped computation runs unlocked. Concurrent misses on one key may
///   compute twice; only the first result is stored. Safe for recursive callables.
/// * `Serialized` - lookup, computation and admission form one critical
///   section. No duplicate computation, but a callable that calls back into its
///   own cache deadlocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Concurrency {
    #[default]
    Shared,
    Serialized,
}

/// Policy configuration of one cache.
///
/// # Examples
///
/// ```
/// use memocache_core::{CacheConfig, EvictionPolicy};
/// use std::time::Duration;
///
/// let config = CacheConfig::lru(128);
/// assert_eq!(config.policy, EvictionPolicy::LRU);
/// assert!(config.validate().is_ok());
///
/// let config = CacheConfig::ttl(Duration::from_secs(30));
/// assert_eq!(config.ttl, Some(Duration::from_secs(30)));
///
/// assert!(CacheConfig::lfu(0).validate().is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct CacheConfig {
    pub policy: EvictionPolicy,
    /// Capacity for LRU/LFU. Ignored by other policies.
    pub maxsize: Option<usize>,
    /// Entry lifetime for TTL. Ignored by other policies.
    pub ttl: Option<Duration>,
    pub concurrency: Concurrency,
}

impl CacheConfig {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn ttl(ttl: Duration) -> Self {
        Self {
            policy: EvictionPolicy::TTL,
            ttl: Some(ttl),
            ..Self::default()
        }
    }

    pub fn lru(maxsize: usize) -> Self {
        Self {
            policy: EvictionPolicy::LRU,
            maxsize: Some(maxsize),
            ..Self::default()
        }
    }

    pub fn lfu(maxsize: usize) -> Self {
        Self {
            policy: EvictionPolicy::LFU,
            maxsize: Some(maxsize),
            ..Self::default()
        }
    }

    pub fn with_concurrency(mut self, concurrency: Concurrency) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Checks that the configuration can build a store.
    ///
    /// # Errors
    ///
    /// [`CacheError::InvalidConfiguration`] when an LRU/LFU cache has no
    /// `maxsize` or a zero one, or a TTL cache has no `ttl`.
    pub fn validate(&self) -> Result<(), CacheError> {
        match self.policy {
            EvictionPolicy::LRU | EvictionPolicy::LFU => match self.maxsize {
                Some(0) => Err(CacheError::invalid_config(format!(
                    "{} cache requires a maxsize of at least 1",
                    self.policy.as_str().to_uppercase()
                ))),
                Some(_) => Ok(()),
                None => Err(CacheError::invalid_config(format!(
                    "{} cache requires a maxsize",
                    self.policy.as_str().to_uppercase()
                ))),
            },
            EvictionPolicy::TTL if self.ttl.is_none() => Err(CacheError::invalid_config(
                "TTL cache requires a ttl",
            )),
            EvictionPolicy::TTL | EvictionPolicy::Unbounded => Ok(()),
        }
    }

    /// Validates the configuration and builds an empty store for it.
    pub fn build_store<R>(&self) -> Result<PolicyStore<R>, CacheError> {
        self.validate()?;
        match (self.policy, self.maxsize, self.ttl) {
            (EvictionPolicy::Unbounded, _, _) => Ok(PolicyStore::unbounded()),
            (EvictionPolicy::TTL, _, Some(ttl)) => Ok(PolicyStore::ttl(ttl)),
            (EvictionPolicy::LRU, Some(maxsize), _) => PolicyStore::lru(maxsize),
            (EvictionPolicy::LFU, Some(maxsize), _) => PolicyStore::lfu(maxsize),
            (policy, _, _) => Err(CacheError::invalid_config(format!(
                "incomplete configuration for {} cache",
                policy
            ))),
        }
    }
}
