use std::collections::HashMap;
use std::time::Instant;

use super::{Admission, CacheStore};
use crate::{CacheEntry, CacheKey, EvictionPolicy};

/// Pure memoization: every distinct key is kept forever.
#[derive(Debug)]
pub struct UnboundedStore<R> {
    map: HashMap<CacheKey, CacheEntry<R>>,
}

impl<R> UnboundedStore<R> {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }
}

impl<R> Default for UnboundedStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Clone> CacheStore<R> for UnboundedStore<R> {
    fn policy(&self) -> EvictionPolicy {
        EvictionPolicy::Unbounded
    }

    fn lookup(&mut self, key: &CacheKey, _now: Instant) -> Option<R> {
        self.map.get(key).map(|entry| entry.value.clone())
    }

    fn admit(&mut self, key: CacheKey, value: R, now: Instant) -> Admission {
        if self.map.contains_key(&key) {
            return Admission::Kept;
        }
        self.map.insert(key, CacheEntry::new(value, now));
        Admission::Inserted
    }

    fn contains(&self, key: &CacheKey, _now: Instant) -> bool {
        self.map.contains_key(key)
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn keys(&self) -> Vec<CacheKey> {
        self.map.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CallArgs;
    use std::time::Duration;

    #[test]
    fn test_store_and_hit() {
        let now = Instant::now();
        let mut store = UnboundedStore::new();
        let key = (1, 2).cache_key().unwrap();

        assert_eq!(store.lookup(&key, now), None);
        assert_eq!(store.admit(key.clone(), 3, now), Admission::Inserted);
        assert_eq!(store.lookup(&key, now), Some(3));
    }

    #[test]
    fn test_never_expires_or_evicts() {
        let now = Instant::now();
        let mut store = UnboundedStore::new();
        for i in 0..1000 {
            store.admit((i,).cache_key().unwrap(), i, now);
        }
        assert_eq!(store.len(), 1000);

        let later = now + Duration::from_secs(86_400);
        assert_eq!(store.lookup(&(0,).cache_key().unwrap(), later), Some(0));
    }

    #[test]
    fn test_first_admitted_value_wins() {
        let now = Instant::now();
        let mut store = UnboundedStore::new();
        let key = ("k",).cache_key().unwrap();

        store.admit(key.clone(), "first", now);
        assert_eq!(store.admit(key.clone(), "second", now), Admission::Kept);
        assert_eq!(store.lookup(&key, now), Some("first"));
        assert_eq!(store.len(), 1);
    }
}
