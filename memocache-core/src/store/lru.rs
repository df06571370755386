use std::collections::{HashMap, VecDeque};
use std::time::Instant;

use super::{Admission, CacheStore};
use crate::utils::{move_key_to_end, remove_key};
use crate::{CacheEntry, CacheError, CacheKey, EvictionPolicy};

/// Least-recently-used store with a fixed capacity.
///
/// `order` holds every stored key exactly once: front is least recently used,
/// back is most recently used.
#[derive(Debug)]
pub struct LruStore<R> {
    map: HashMap<CacheKey, CacheEntry<R>>,
    order: VecDeque<CacheKey>,
    maxsize: usize,
}

impl<R> LruStore<R> {
    /// Creates an empty store holding at most `maxsize` entries.
    ///
    /// # Errors
    ///
    /// [`CacheError::InvalidConfiguration`] when `maxsize` is zero.
    pub fn new(maxsize: usize) -> Result<Self, CacheError> {
        if maxsize == 0 {
            return Err(CacheError::invalid_config(
                "LRU cache requires a maxsize of at least 1",
            ));
        }
        Ok(Self {
            map: HashMap::with_capacity(maxsize),
            order: VecDeque::with_capacity(maxsize),
            maxsize,
        })
    }

    pub fn maxsize(&self) -> usize {
        self.maxsize
    }
}

impl<R: Clone> CacheStore<R> for LruStore<R> {
    fn policy(&self) -> EvictionPolicy {
        EvictionPolicy::LRU
    }

    fn lookup(&mut self, key: &CacheKey, _now: Instant) -> Option<R> {
        let value = self.map.get(key).map(|entry| entry.value.clone())?;
        move_key_to_end(&mut self.order, key);
        Some(value)
    }

    fn admit(&mut self, key: CacheKey, value: R, now: Instant) -> Admission {
        if self.map.contains_key(&key) {
            move_key_to_end(&mut self.order, &key);
            return Admission::Kept;
        }

        self.map.insert(key.clone(), CacheEntry::new(value, now));
        self.order.push_back(key);

        if self.order.len() > self.maxsize {
            if let Some(evict_key) = self.order.front().cloned() {
                remove_key(&mut self.map, &mut self.order, &evict_key);
                return Admission::Evicted(evict_key);
            }
        }
        Admission::Inserted
    }

    fn contains(&self, key: &CacheKey, _now: Instant) -> bool {
        self.map.contains_key(key)
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn keys(&self) -> Vec<CacheKey> {
        self.order.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CallArgs;
    use proptest::prelude::*;

    fn k(a: i32) -> CacheKey {
        (a,).cache_key().unwrap()
    }

    #[test]
    fn test_lru_eviction() {
        let now = Instant::now();
        let mut store = LruStore::new(2).unwrap();
        store.admit(k(1), 1, now);
        store.admit(k(2), 2, now);
        let _ = store.lookup(&k(1), now);

        assert_eq!(store.admit(k(3), 3, now), Admission::Evicted(k(2)));
        assert_eq!(store.lookup(&k(1), now), Some(1));
        assert_eq!(store.lookup(&k(2), now), None);
        assert_eq!(store.lookup(&k(3), now), Some(3));
    }

    #[test]
    fn test_lru_multiple_accesses() {
        let now = Instant::now();
        let mut store = LruStore::new(3).unwrap();
        store.admit(k(1), 1, now);
        store.admit(k(2), 2, now);
        store.admit(k(3), 3, now);

        let _ = store.lookup(&k(1), now);
        let _ = store.lookup(&k(1), now);

        // k2 is now the least recently used
        store.admit(k(4), 4, now);
        assert_eq!(store.keys(), vec![k(3), k(1), k(4)]);
    }

    #[test]
    fn test_miss_does_not_reorder() {
        let now = Instant::now();
        let mut store = LruStore::new(2).unwrap();
        store.admit(k(1), 1, now);
        store.admit(k(2), 2, now);
        assert_eq!(store.lookup(&k(9), now), None);
        assert_eq!(store.keys(), vec![k(1), k(2)]);
    }

    #[test]
    fn test_capacity_one() {
        let now = Instant::now();
        let mut store = LruStore::new(1).unwrap();
        store.admit(k(1), 1, now);
        assert_eq!(store.admit(k(2), 2, now), Admission::Evicted(k(1)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_admit_existing_key_refreshes_recency() {
        let now = Instant::now();
        let mut store = LruStore::new(2).unwrap();
        store.admit(k(1), 1, now);
        store.admit(k(2), 2, now);
        assert_eq!(store.admit(k(1), 10, now), Admission::Kept);
        assert_eq!(store.keys(), vec![k(2), k(1)]);
        assert_eq!(store.lookup(&k(1), now), Some(1));
    }

    #[test]
    fn test_zero_maxsize_rejected() {
        assert!(matches!(
            LruStore::<i32>::new(0),
            Err(CacheError::InvalidConfiguration(_))
        ));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        // After every call the store holds at most `maxsize` keys, and an
        // overflow evicts exactly the key accessed longest ago.
        #[test]
        fn prop_lru_capacity_and_victim(
            maxsize in 1usize..6,
            calls in prop::collection::vec(0i32..10, 1..80),
        ) {
            let now = Instant::now();
            let mut store = LruStore::new(maxsize).unwrap();
            // model: most recent at the back
            let mut model: Vec<i32> = Vec::new();

            for x in calls {
                let key = k(x);
                if store.lookup(&key, now).is_some() {
                    prop_assert!(model.contains(&x));
                    model.retain(|m| *m != x);
                    model.push(x);
                } else {
                    prop_assert!(!model.contains(&x));
                    let admission = store.admit(key, x, now);
                    model.push(x);
                    if model.len() > maxsize {
                        let expected = model.remove(0);
                        prop_assert_eq!(admission, Admission::Evicted(k(expected)));
                    } else {
                        prop_assert_eq!(admission, Admission::Inserted);
                    }
                }
                prop_assert!(store.len() <= maxsize);
                prop_assert_eq!(store.keys(), model.iter().map(|m| k(*m)).collect::<Vec<_>>());
            }
        }
    }
}
