use crate::config::{create_hasher, Config, ShardRouter, ShardedMapBuilder};
use crate::error::Error;
use crate::hash::ShardHasher;
use crate::shard::Shard;
use crate::stats::{Diagnostics, ShardOps, Stats};
use std::sync::{mpsc, Arc};
use std::thread;

/// Concurrent string-keyed map split into independently locked shards.
///
/// Every key routes to exactly one shard through `hash(key)` reduced by the
/// shard count, and single-key operations only ever hold that shard's lock.
/// The shard count is fixed at construction. Values are stored behind
/// `Arc<V>` so reads hand out a shared handle instead of a deep copy.
///
/// `count()`, `keys()` and friends lock each shard in turn. Under concurrent
/// writers they can miss or include writes racing with the visit; the result
/// is only exact once writers are quiescent.
///
/// # Example
///
/// ```rust
/// use shardedmap::ShardedMap;
///
/// let map = ShardedMap::new(32)?;
/// map.set("a", "1");
/// map.set("b", "2");
/// map.set("a", "3");
///
/// assert_eq!(*map.get("a").unwrap(), "3");
/// assert!(map.get("c").is_none());
/// assert_eq!(map.count(), 2);
/// # Ok::<(), shardedmap::Error>(())
/// ```
pub struct ShardedMap<V> {
    shards: Box<[Shard<V>]>,
    hash: ShardHasher,
    router: Box<dyn ShardRouter>,
    parallel_aggregates: bool,
}

impl<V> ShardedMap<V>
where
    V: Send + Sync,
{
    /// Create a map with `shard_count` shards and the default FNV-1a routing.
    pub fn new(shard_count: usize) -> Result<Self, Error> {
        Self::with_config(Config::new().shard_count(shard_count)?)
    }

    /// Create a new map with custom config.
    pub fn with_config(config: Config) -> Result<Self, Error> {
        if config.shard_count == 0 {
            return Err(Error::InvalidShardCount(config.shard_count));
        }
        Ok(Self::from_config(config))
    }

    /// Start a builder with default configuration.
    pub fn builder() -> ShardedMapBuilder {
        ShardedMapBuilder::new()
    }

    fn from_config(config: Config) -> Self {
        let shards: Box<[Shard<V>]> = (0..config.shard_count)
            .map(|_| Shard::new(config.capacity_per_shard))
            .collect();

        tracing::debug!(
            shard_count = config.shard_count,
            hash_function = ?config.hash_function,
            routing = ?config.routing,
            parallel_aggregates = config.parallel_aggregates,
            "sharded map created"
        );

        Self {
            shards,
            hash: create_hasher(config.hash_function),
            router: config.routing.into_router(),
            parallel_aggregates: config.parallel_aggregates,
        }
    }

    /// Number of shards, fixed for the lifetime of the map.
    #[inline]
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Figure out which shard this key belongs to.
    ///
    /// Constant for a given key over the lifetime of the map.
    #[inline]
    pub fn shard_index(&self, key: &str) -> usize {
        let shard_count = self.shards.len();
        let idx = self.router.route(self.hash.hash_key(key), shard_count);
        if idx < shard_count {
            idx
        } else {
            idx % shard_count
        }
    }

    #[inline]
    fn shard_for(&self, key: &str) -> &Shard<V> {
        &self.shards[self.shard_index(key)]
    }

    /// Get a value by key. Returns an `Arc<V>` so you can share it without copying.
    ///
    /// # Example
    ///
    /// ```rust
    /// use shardedmap::ShardedMap;
    ///
    /// let map = ShardedMap::default();
    /// map.set("key", 7);
    /// assert_eq!(*map.get("key").unwrap(), 7);
    /// assert!(map.get("other").is_none());
    /// ```
    pub fn get(&self, key: &str) -> Option<Arc<V>> {
        self.shard_for(key).get(key)
    }

    /// Insert or overwrite a value. Returns the old value if the key existed.
    ///
    /// Concurrent sets of the same key are serialized by its shard lock; the
    /// one that takes the lock last wins.
    pub fn set(&self, key: &str, value: V) -> Option<Arc<V>> {
        self.shard_for(key).set(key, value)
    }

    /// Remove a key-value pair, returning the value if it existed.
    pub fn remove(&self, key: &str) -> Option<Arc<V>> {
        self.shard_for(key).remove(key)
    }

    /// Check whether a key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.shard_for(key).contains_key(key)
    }

    /// Update a value using a closure, returning the new value if the key existed.
    ///
    /// The closure runs while the key's shard is write-locked, so it must not
    /// call back into this map. Requires `V: Clone` because a value still
    /// shared through an outstanding `Arc` is cloned before modification.
    ///
    /// # Example
    ///
    /// ```rust
    /// use shardedmap::ShardedMap;
    ///
    /// let map = ShardedMap::default();
    /// map.set("counter", 0);
    ///
    /// map.update("counter", |v| *v += 1);
    /// assert_eq!(*map.get("counter").unwrap(), 1);
    /// ```
    pub fn update<F>(&self, key: &str, f: F) -> Option<Arc<V>>
    where
        F: FnOnce(&mut V),
        V: Clone,
    {
        self.shard_for(key).update(key, f)
    }

    /// Total number of entries across all shards.
    ///
    /// Each shard is locked and released independently, so this is not a
    /// snapshot of the whole map while writers are active.
    pub fn count(&self) -> usize {
        if self.parallel_aggregates {
            self.count_fan_out()
        } else {
            self.shards.iter().map(|shard| shard.len()).sum()
        }
    }

    /// Check if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|shard| shard.is_empty())
    }

    /// All keys in the map, in no particular order.
    ///
    /// Same consistency as [`count`](Self::count). Dispatches to
    /// [`keys_fan_out`](Self::keys_fan_out) when parallel aggregates are enabled.
    pub fn keys(&self) -> Vec<String> {
        if self.parallel_aggregates {
            self.keys_fan_out()
        } else {
            self.keys_sequential()
        }
    }

    /// Collect keys by visiting shards one after another on the calling thread.
    pub fn keys_sequential(&self) -> Vec<String> {
        let mut keys = Vec::new();
        for shard in self.shards.iter() {
            keys.extend(shard.keys());
        }
        keys
    }

    /// Collect keys with one scoped worker per shard.
    ///
    /// Workers push their shard's keys into a bounded channel that is drained
    /// once every worker has finished. All workers are joined before return.
    pub fn keys_fan_out(&self) -> Vec<String> {
        let batches = self.fan_out(|shard| shard.keys());
        let mut keys = Vec::with_capacity(batches.iter().map(Vec::len).sum());
        for batch in batches {
            keys.extend(batch);
        }
        tracing::trace!(
            workers = self.shards.len(),
            keys = keys.len(),
            "fan-out keys collected"
        );
        keys
    }

    /// Count entries with one scoped worker per shard.
    pub fn count_fan_out(&self) -> usize {
        let total: usize = self.fan_out(|shard| shard.len()).into_iter().sum();
        tracing::trace!(workers = self.shards.len(), total, "fan-out count collected");
        total
    }

    fn fan_out<T, F>(&self, visit: F) -> Vec<T>
    where
        T: Send,
        F: Fn(&Shard<V>) -> T + Sync,
    {
        // One message per shard, so workers never block on a full channel.
        let (tx, rx) = mpsc::sync_channel(self.shards.len());
        let visit = &visit;
        thread::scope(|scope| {
            for shard in self.shards.iter() {
                let tx = tx.clone();
                scope.spawn(move || {
                    // The receiver outlives the scope, so send cannot fail.
                    let _ = tx.send(visit(shard));
                });
            }
            drop(tx);
            rx.iter().collect()
        })
    }

    /// Number of entries in each shard, indexed by shard.
    pub fn shard_loads(&self) -> Vec<usize> {
        self.shards.iter().map(|shard| shard.len()).collect()
    }

    /// Get detailed statistics about the map and its shards.
    pub fn stats(&self) -> Stats {
        let shard_sizes = self.shard_loads();
        let operations: Vec<ShardOps> = self.shards.iter().map(|s| s.stats()).collect();
        let size: usize = shard_sizes.iter().sum();

        Stats {
            size,
            shard_sizes,
            operations,
        }
    }

    /// Structured per-shard load and operation report.
    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics::from_stats(self.stats())
    }

    /// Create a snapshot-based iterator over all key-value pairs.
    ///
    /// Each shard is copied under its read lock before iteration begins.
    ///
    /// # Example
    ///
    /// ```rust
    /// use shardedmap::ShardedMap;
    ///
    /// let map = ShardedMap::default();
    /// map.set("key1", "value1");
    /// map.set("key2", "value2");
    ///
    /// assert_eq!(map.iter_snapshot().count(), 2);
    /// ```
    pub fn iter_snapshot(&self) -> crate::iter::SnapshotIter<V> {
        crate::iter::SnapshotIter::new(&self.shards)
    }
}

impl<V> Default for ShardedMap<V>
where
    V: Send + Sync,
{
    fn default() -> Self {
        Self::from_config(Config::default())
    }
}

impl<V> std::fmt::Debug for ShardedMap<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShardedMap")
            .field("shard_count", &self.shards.len())
            .field("hash", &self.hash)
            .field("parallel_aggregates", &self.parallel_aggregates)
            .finish()
    }
}
