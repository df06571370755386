use std::collections::{HashMap, VecDeque};
use std::time::Instant;

use super::{Admission, CacheStore};
use crate::utils::{find_min_frequency_key, remove_key};
use crate::{CacheEntry, CacheError, CacheKey, EvictionPolicy};

/// Least-frequently-used store with a fixed capacity.
///
/// `order` records insertion order into the frequency table. Eviction picks
/// the minimum access count and, among ties, the key inserted earliest. Hits
/// do not change `order`; a key that is evicted and computed again re-enters
/// at the back.
#[derive(Debug)]
pub struct LfuStore<R> {
    map: HashMap<CacheKey, CacheEntry<R>>,
    order: VecDeque<CacheKey>,
    maxsize: usize,
}

impl<R> LfuStore<R> {
    /// Creates an empty store holding at most `maxsize` entries.
    ///
    /// # Errors
    ///
    /// [`CacheError::InvalidConfiguration`] when `maxsize` is zero.
    pub fn new(maxsize: usize) -> Result<Self, CacheError> {
        if maxsize == 0 {
            return Err(CacheError::invalid_config(
                "LFU cache requires a maxsize of at least 1",
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

    /// Access count of `key`, if stored.
    pub fn frequency(&self, key: &CacheKey) -> Option<u64> {
        self.map.get(key).map(|entry| entry.frequency)
    }
}

impl<R: Clone> CacheStore<R> for LfuStore<R> {
    fn policy(&self) -> EvictionPolicy {
        EvictionPolicy::LFU
    }

    fn lookup(&mut self, key: &CacheKey, _now: Instant) -> Option<R> {
        let entry = self.map.get_mut(key)?;
        entry.increment_frequency();
        Some(entry.value.clone())
    }

    fn admit(&mut self, key: CacheKey, value: R, now: Instant) -> Admission {
        if self.map.contains_key(&key) {
            return Admission::Kept;
        }

        let mut evicted = None;
        if self.map.len() >= self.maxsize {
            if let Some(evict_key) = find_min_frequency_key(&self.map, &self.order) {
                remove_key(&mut self.map, &mut self.order, &evict_key);
                evicted = Some(evict_key);
            }
        }

        self.map.insert(key.clone(), CacheEntry::new(value, now));
        self.order.push_back(key);

        match evicted {
            Some(evict_key) => Admission::Evicted(evict_key),
            None => Admission::Inserted,
        }
    }

    fn contains(&self, key: &CacheKey, _now: Instant) -> bool {
        self.map.contains_key(key)
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn keys(&self) -> Vec<CacheKey> {
        let mut keys: Vec<CacheKey> = self.order.iter().cloned().collect();
        // stable sort keeps insertion order among equal counts
        keys.sort_by_key(|key| self.frequency(key).unwrap_or(0));
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CallArgs;
    use proptest::prelude::*;

    fn k(a: i32, b: i32) -> CacheKey {
        (a, b).cache_key().unwrap()
    }

    #[test]
    fn test_lfu_evicts_lowest_count() {
        let now = Instant::now();
        let mut store = LfuStore::new(2).unwrap();
        store.admit(k(1, 2), 3, now);
        store.admit(k(3, 4), 7, now);
        assert_eq!(store.lookup(&k(1, 2), now), Some(3));
        assert_eq!(store.frequency(&k(1, 2)), Some(2));

        assert_eq!(store.admit(k(5, 6), 11, now), Admission::Evicted(k(3, 4)));
        assert_eq!(store.lookup(&k(3, 4), now), None);
        assert_eq!(store.frequency(&k(5, 6)), Some(1));
    }

    #[test]
    fn test_tie_evicts_earliest_inserted() {
        let now = Instant::now();
        let mut store = LfuStore::new(3).unwrap();
        store.admit(k(0, 1), 1, now);
        store.admit(k(0, 2), 2, now);
        store.admit(k(0, 3), 3, now);

        // all at count 2 now, inserted in order 1, 2, 3
        for i in [3, 1, 2] {
            store.lookup(&k(0, i), now);
        }

        assert_eq!(store.admit(k(0, 4), 4, now), Admission::Evicted(k(0, 1)));
    }

    #[test]
    fn test_new_entry_is_next_victim_among_count_one() {
        let now = Instant::now();
        let mut store = LfuStore::new(2).unwrap();
        store.admit(k(0, 1), 1, now);
        store.lookup(&k(0, 1), now);
        store.admit(k(0, 2), 2, now);

        assert_eq!(store.admit(k(0, 3), 3, now), Admission::Evicted(k(0, 2)));
        assert_eq!(store.admit(k(0, 4), 4, now), Admission::Evicted(k(0, 3)));
        assert!(store.contains(&k(0, 1), now));
    }

    #[test]
    fn test_keys_in_eviction_order() {
        let now = Instant::now();
        let mut store = LfuStore::new(3).unwrap();
        store.admit(k(0, 1), 1, now);
        store.admit(k(0, 2), 2, now);
        store.admit(k(0, 3), 3, now);
        store.lookup(&k(0, 1), now);
        store.lookup(&k(0, 1), now);
        store.lookup(&k(0, 3), now);

        assert_eq!(store.keys(), vec![k(0, 2), k(0, 3), k(0, 1)]);
    }

    #[test]
    fn test_zero_maxsize_rejected() {
        assert!(LfuStore::<i32>::new(0).is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        // Size never exceeds `maxsize`, and the evicted key always had the
        // minimum access count among the keys held at eviction time.
        #[test]
        fn prop_lfu_capacity_and_victim(
            maxsize in 1usize..6,
            calls in prop::collection::vec(0i32..10, 1..80),
        ) {
            let now = Instant::now();
            let mut store = LfuStore::new(maxsize).unwrap();

            for x in calls {
                let key = k(x, 0);
                if store.lookup(&key, now).is_none() {
                    let before: Vec<(CacheKey, u64)> = store
                        .keys()
                        .into_iter()
                        .map(|held| {
                            let count = store.frequency(&held).unwrap();
                            (held, count)
                        })
                        .collect();

                    if let Admission::Evicted(victim) = store.admit(key, x, now) {
                        let min = before.iter().map(|(_, c)| *c).min().unwrap();
                        let victim_count = before
                            .iter()
                            .find(|(held, _)| *held == victim)
                            .map(|(_, c)| *c);
                        prop_assert_eq!(victim_count, Some(min));
                    }
                }
                prop_assert!(store.len() <= maxsize);
            }
        }
    }
}
