use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

use crate::CacheEntry;

/// Moves a key to the end of the order queue (marks it as most recently used).
///
/// # Behavior
///
/// - If the key exists in the queue, it is removed from its current position and added to the end
/// - If the key doesn't exist, the queue remains unchanged
///
/// # Performance
///
/// O(n) in the length of the queue: finding the position dominates.
///
/// # Examples
///
/// ```
/// use std::collections::VecDeque;
/// use memocache_core::utils::move_key_to_end;
///
/// let mut order = VecDeque::from(vec!["key1", "key2", "key3"]);
///
/// // Access key2, marking it as most recently used
/// move_key_to_end(&mut order, &"key2");
/// assert_eq!(order, VecDeque::from(vec!["key1", "key3", "key2"]));
///
/// // Moving a key that is not queued has no effect
/// move_key_to_end(&mut order, &"key4");
/// assert_eq!(order.len(), 3);
/// ```
pub fn move_key_to_end<K: PartialEq>(order: &mut VecDeque<K>, key: &K) {
    if let Some(pos) = order.iter().position(|k| k == key) {
        if let Some(k) = order.remove(pos) {
            order.push_back(k);
        }
    }
}

/// Finds the key with the lowest access frequency.
///
/// Keys are scanned in queue order and only a strictly lower frequency replaces
/// the current candidate, so among keys tied for the minimum the one nearest
/// the front of the queue (the earliest inserted) is returned. Queued keys
/// missing from the map are skipped.
///
/// # Examples
///
/// ```
/// use std::collections::{HashMap, VecDeque};
/// use std::time::Instant;
/// use memocache_core::CacheEntry;
/// use memocache_core::utils::find_min_frequency_key;
///
/// let now = Instant::now();
/// let mut map = HashMap::new();
/// map.insert("a", CacheEntry::new(1, now));
/// map.insert("b", CacheEntry::new(2, now));
/// map.insert("c", CacheEntry::new(3, now));
/// map.get_mut("a").unwrap().increment_frequency();
///
/// let order = VecDeque::from(vec!["a", "b", "c"]);
/// assert_eq!(find_min_frequency_key(&map, &order), Some("b"));
/// ```
pub fn find_min_frequency_key<K, R>(
    map: &HashMap<K, CacheEntry<R>>,
    order: &VecDeque<K>,
) -> Option<K>
where
    K: Eq + Hash + Clone,
{
    let mut min_freq_key: Option<&K> = None;
    let mut min_freq = u64::MAX;

    for evict_key in order.iter() {
        if let Some(entry) = map.get(evict_key) {
            if min_freq_key.is_none() || entry.frequency < min_freq {
                min_freq = entry.frequency;
                min_freq_key = Some(evict_key);
            }
        }
    }

    min_freq_key.cloned()
}

/// Removes a key from both the cache map and the order queue.
///
/// Returns the removed entry, if the map held one.
///
/// # Examples
///
/// ```
/// use std::collections::{HashMap, VecDeque};
/// use std::time::Instant;
/// use memocache_core::CacheEntry;
/// use memocache_core::utils::remove_key;
///
/// let mut map = HashMap::new();
/// map.insert("a", CacheEntry::new(1, Instant::now()));
/// let mut order = VecDeque::from(vec!["a"]);
///
/// assert_eq!(remove_key(&mut map, &mut order, &"a").map(|e| e.value), Some(1));
/// assert!(map.is_empty());
/// assert!(order.is_empty());
/// ```
pub fn remove_key<K, R>(
    map: &mut HashMap<K, CacheEntry<R>>,
    order: &mut VecDeque<K>,
    key: &K,
) -> Option<CacheEntry<R>>
where
    K: Eq + Hash,
{
    if let Some(pos) = order.iter().position(|k| k == key) {
        order.remove(pos);
    }
    map.remove(key)
}
