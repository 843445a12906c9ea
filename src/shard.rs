use crate::stats::ShardStats;
use hashbrown::HashMap;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

/// A single shard: a string-keyed HashMap protected by its own read-write lock.
///
/// The map is only reachable through the lock, and every method releases
/// the guard before returning.
pub(crate) struct Shard<V> {
    map: RwLock<HashMap<String, Arc<V>>>,
    stats: ShardStats,
}

impl<V> Shard<V>
where
    V: Send + Sync,
{
    pub fn new(capacity: Option<usize>) -> Self {
        let map = match capacity {
            Some(capacity) => HashMap::with_capacity(capacity),
            None => HashMap::new(),
        };
        Self {
            map: RwLock::new(map),
            stats: ShardStats::new(),
        }
    }

    #[inline]
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<V>>> {
        #[cfg(feature = "lock-timing")]
        let start = std::time::Instant::now();
        let guard = self.map.read();
        #[cfg(feature = "lock-timing")]
        self.stats.record_lock_wait(start.elapsed().as_nanos() as u64);
        self.stats.record_lock_acquisition();
        guard
    }

    #[inline]
    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<V>>> {
        #[cfg(feature = "lock-timing")]
        let start = std::time::Instant::now();
        let guard = self.map.write();
        #[cfg(feature = "lock-timing")]
        self.stats.record_lock_wait(start.elapsed().as_nanos() as u64);
        self.stats.record_lock_acquisition();
        guard
    }

    /// Get a value by key. The returned `Arc` outlives the read lock.
    pub fn get(&self, key: &str) -> Option<Arc<V>> {
        let result = self.read().get(key).cloned();
        if result.is_some() {
            self.stats.record_read();
        }
        result
    }

    /// Insert or overwrite, returning the previous value if any.
    pub fn set(&self, key: &str, value: V) -> Option<Arc<V>> {
        let value = Arc::new(value);
        let mut map = self.write();
        let previous = match map.get_mut(key) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => {
                map.insert(key.to_owned(), value);
                None
            }
        };
        drop(map);
        self.stats.record_write();
        previous
    }

    /// Remove a key-value pair, returning the value if it existed.
    pub fn remove(&self, key: &str) -> Option<Arc<V>> {
        let result = self.write().remove(key);
        if result.is_some() {
            self.stats.record_remove();
        }
        result
    }

    /// Update a value in place under the write lock, returning the new value
    /// if the key existed.
    ///
    /// Requires `V: Clone`: if the value is shared (other `Arc` references
    /// exist), it is cloned before the closure runs.
    pub fn update<F>(&self, key: &str, f: F) -> Option<Arc<V>>
    where
        F: FnOnce(&mut V),
        V: Clone,
    {
        let mut map = self.write();
        let arc_value = map.get_mut(key)?;
        f(Arc::make_mut(arc_value));
        let updated = arc_value.clone();
        drop(map);
        self.stats.record_write();
        Some(updated)
    }

    /// Check if a key exists without cloning the value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.read().contains_key(key)
    }

    /// Get the number of entries in this shard.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Check if this shard is empty.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Copy out every key currently in the shard.
    pub fn keys(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    /// Copy out every entry currently in the shard.
    pub fn entries(&self) -> Vec<(String, Arc<V>)> {
        self.read()
            .iter()
            .map(|(key, value)| (key.clone(), Arc::clone(value)))
            .collect()
    }

    /// Get a snapshot of statistics for this shard.
    pub fn stats(&self) -> crate::stats::ShardOps {
        self.stats.snapshot()
    }
}
