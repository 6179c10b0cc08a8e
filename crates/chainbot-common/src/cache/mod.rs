use std::hash::Hash;
use std::sync::Arc;

use moka::sync::Cache;

/// A cache of handles that are expensive to build (connections, clients, ...).
///
/// Each key is initialized at most once while it stays in the cache. When several callers miss
/// the same key concurrently, only one of them runs the initializer and the others wait for its
/// result, so every caller ends up with the same handle. Failed initializations are not cached.
///
/// Entries are never expired. The capacity must be at least the number of distinct keys the
/// cache will ever see, otherwise evicted handles get rebuilt.
#[derive(Clone)]
pub struct HandleCache<K, V> {
    cache: Cache<K, V>,
}

impl<K, V> HandleCache<K, V>
where
    K: 'static + Eq + Hash + Send + Sync,
    V: 'static + Clone + Send + Sync,
{
    pub fn new(capacity: u64) -> Self {
        Self { cache: Cache::new(capacity) }
    }

    /// Returns the cached handle if it exists.
    pub fn get(&self, key: &K) -> Option<V> {
        self.cache.get(key)
    }

    /// Returns the cached handle for `key`, building it with `init` on a miss.
    pub fn get_or_try_insert_with<E>(&self, key: K, init: impl FnOnce() -> Result<V, E>) -> Result<V, Arc<E>>
    where
        E: 'static + Send + Sync,
    {
        self.cache.try_get_with(key, init)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.cache.contains_key(key)
    }
}
