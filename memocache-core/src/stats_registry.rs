use std::collections::HashMap;
use std::sync::{Arc, Weak};

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::CacheStats;

/// Name-indexed view of cache statistics.
///
/// Caches register here when they are given a name: `#[cache]` functions
/// under their function name (or `name = "..."`), builder-made caches through
/// [`CacheBuilder::name`](crate::CacheBuilder::name). The registry holds weak
/// references only, so a dropped cache disappears from it.
///
/// # Examples
///
/// ```
/// use memocache_core::stats_registry;
///
/// if let Some(stats) = stats_registry::get("my_function") {
///     println!("Hits: {}", stats.hits());
///     println!("Misses: {}", stats.misses());
/// }
///
/// for name in stats_registry::list() {
///     println!("Cache: {}", name);
/// }
/// ```
static STATS_REGISTRY: Lazy<RwLock<HashMap<String, Weak<CacheStats>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Register a cache's statistics under `name`, replacing any previous entry.
pub fn register(name: &str, stats: &Arc<CacheStats>) {
    let mut registry = STATS_REGISTRY.write();
    registry.insert(name.to_string(), Arc::downgrade(stats));
}

/// Remove `name` from the registry. Returns whether it was registered.
pub fn unregister(name: &str) -> bool {
    STATS_REGISTRY.write().remove(name).is_some()
}

/// Snapshot of the statistics registered under `name`.
///
/// Returns `None` when nothing is registered under that name or the cache
/// has been dropped.
pub fn get(name: &str) -> Option<CacheStats> {
    get_ref(name).map(|stats| (*stats).clone())
}

/// Live handle to the statistics registered under `name`.
pub fn get_ref(name: &str) -> Option<Arc<CacheStats>> {
    let registry = STATS_REGISTRY.read();
    registry.get(name).and_then(Weak::upgrade)
}

/// Names of all registered caches that are still alive.
pub fn list() -> Vec<String> {
    let registry = STATS_REGISTRY.read();
    registry
        .iter()
        .filter(|(_, stats)| stats.strong_count() > 0)
        .map(|(name, _)| name.clone())
        .collect()
}

/// Remove every entry. The statistics themselves are not reset.
pub fn clear() {
    STATS_REGISTRY.write().clear();
}

/// Reset the counters registered under `name`.
///
/// Returns `false` when no live cache is registered under that name.
pub fn reset(name: &str) -> bool {
    match get_ref(name) {
        Some(stats) => {
            stats.reset();
            true
        }
        None => false,
    }
}
