use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::{Admission, CacheStore};
use crate::{CacheEntry, CacheKey, EvictionPolicy};

/// Creation-time TTL store.
///
/// An entry is a hit while `now - created_at < ttl`. Hits do not refresh
/// `created_at`. Stale entries stay in place until a successful recomputation
/// for the same key overwrites them; there is no background sweep, so the
/// store grows with the number of distinct keys seen.
#[derive(Debug)]
pub struct TtlStore<R> {
    map: HashMap<CacheKey, CacheEntry<R>>,
    ttl: Duration,
}

impl<R> TtlStore<R> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            map: HashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The entry stored under `key`, stale or not.
    pub fn entry(&self, key: &CacheKey) -> Option<&CacheEntry<R>> {
        self.map.get(key)
    }
}

impl<R: Clone> CacheStore<R> for TtlStore<R> {
    fn policy(&self) -> EvictionPolicy {
        EvictionPolicy::TTL
    }

    fn lookup(&mut self, key: &CacheKey, now: Instant) -> Option<R> {
        match self.map.get(key) {
            Some(entry) if !entry.is_expired(self.ttl, now) => Some(entry.value.clone()),
            _ => None,
        }
    }

    fn admit(&mut self, key: CacheKey, value: R, now: Instant) -> Admission {
        let admission = match self.map.get(&key) {
            Some(entry) if !entry.is_expired(self.ttl, now) => return Admission::Kept,
            Some(_) => Admission::Replaced,
            None => Admission::Inserted,
        };
        self.map.insert(key, CacheEntry::new(value, now));
        admission
    }

    fn contains(&self, key: &CacheKey, now: Instant) -> bool {
        self.map
            .get(key)
            .map_or(false, |entry| !entry.is_expired(self.ttl, now))
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn keys(&self) -> Vec<CacheKey> {
        self.map.keys().cloned().collect()
    }
}
