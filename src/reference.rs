//! Single-lock baseline map and the `KvMap` trait shared with `ShardedMap`.
//!
//! `ReferenceMap` exists so tests have a ground truth to replay operations
//! against and benchmarks have a global-lock baseline to beat.

use crate::ShardedMap;
use hashbrown::HashMap;
use parking_lot::Mutex;
use std::sync::Arc;

/// The map contract shared by `ShardedMap` and `ReferenceMap`.
pub trait KvMap<V>: Send + Sync {
    /// Look up a key.
    fn get(&self, key: &str) -> Option<Arc<V>>;
    /// Insert or overwrite, returning the previous value.
    fn set(&self, key: &str, value: V) -> Option<Arc<V>>;
    /// Remove a key, returning its value.
    fn remove(&self, key: &str) -> Option<Arc<V>>;
    /// Number of entries.
    fn count(&self) -> usize;
    /// All keys, in no particular order.
    fn keys(&self) -> Vec<String>;
}

/// A plain map guarded by one exclusive lock.
#[derive(Debug)]
pub struct ReferenceMap<V> {
    map: Mutex<HashMap<String, Arc<V>>>,
}

impl<V> ReferenceMap<V> {
    /// Create an empty map.
    pub fn new() -> Self {
        Self {
            map: Mutex::new(HashMap::new()),
        }
    }
}

impl<V> Default for ReferenceMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> KvMap<V> for ReferenceMap<V>
where
    V: Send + Sync,
{
    fn get(&self, key: &str) -> Option<Arc<V>> {
        self.map.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: V) -> Option<Arc<V>> {
        self.map.lock().insert(key.to_owned(), Arc::new(value))
    }

    fn remove(&self, key: &str) -> Option<Arc<V>> {
        self.map.lock().remove(key)
    }

    fn count(&self) -> usize {
        self.map.lock().len()
    }

    fn keys(&self) -> Vec<String> {
        self.map.lock().keys().cloned().collect()
    }
}

impl<V> KvMap<V> for ShardedMap<V>
where
    V: Send + Sync,
{
    fn get(&self, key: &str) -> Option<Arc<V>> {
        ShardedMap::get(self, key)
    }

    fn set(&self, key: &str, value: V) -> Option<Arc<V>> {
        ShardedMap::set(self, key, value)
    }

    fn remove(&self, key: &str) -> Option<Arc<V>> {
        ShardedMap::remove(self, key)
    }

    fn count(&self) -> usize {
        ShardedMap::count(self)
    }

    fn keys(&self) -> Vec<String> {
        ShardedMap::keys(self)
    }
}
