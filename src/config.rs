use crate::error::Error;
use crate::hash::ShardHasher;

/// Default number of shards.
pub const DEFAULT_SHARD_COUNT: usize = 32;

/// Which hash function to use for shard assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashFunction {
    /// 32-bit FNV-1a (default).
    #[default]
    Fnv1a,
    /// Use ahash with fixed keys.
    AHash,
    /// Use fxhash (faster but potentially less distributed).
    #[cfg(feature = "fxhash")]
    FxHash,
}

/// User-provided shard selection. Enables custom routing.
///
/// Implementations must be pure: the same hash and shard count must always
/// yield the same index, or keys become unreachable.
pub trait ShardRouter: Send + Sync {
    /// Return the shard index in `[0, shard_count)` for the given key hash.
    fn route(&self, key_hash: u64, shard_count: usize) -> usize;
}

/// Default routing: `hash & (shard_count - 1)` for powers of two,
/// `hash % shard_count` otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRouter;

impl ShardRouter for DefaultRouter {
    #[inline]
    fn route(&self, key_hash: u64, shard_count: usize) -> usize {
        if shard_count.is_power_of_two() {
            (key_hash as usize) & (shard_count - 1)
        } else {
            (key_hash % shard_count as u64) as usize
        }
    }
}

/// Routing strategy for shard selection.
#[derive(Default)]
pub enum RoutingConfig {
    /// Default: hash modulo shard_count.
    #[default]
    Default,
    /// User-provided router.
    Custom(Box<dyn ShardRouter>),
}

impl std::fmt::Debug for RoutingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoutingConfig::Default => write!(f, "RoutingConfig::Default"),
            RoutingConfig::Custom(_) => write!(f, "RoutingConfig::Custom(...)"),
        }
    }
}

impl RoutingConfig {
    pub(crate) fn into_router(self) -> Box<dyn ShardRouter> {
        match self {
            RoutingConfig::Default => Box::new(DefaultRouter),
            RoutingConfig::Custom(router) => router,
        }
    }
}

/// Configuration for a ShardedMap instance.
#[derive(Debug)]
pub struct Config {
    pub(crate) shard_count: usize,
    pub(crate) hash_function: HashFunction,
    pub(crate) capacity_per_shard: Option<usize>,
    pub(crate) routing: RoutingConfig,
    pub(crate) parallel_aggregates: bool,
}

impl Config {
    /// Create a new config with defaults (32 shards, FNV-1a).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of shards. Must be greater than 0; a power of two
    /// lets routing use a bitmask but is not required.
    pub fn shard_count(mut self, count: usize) -> Result<Self, Error> {
        if count == 0 {
            return Err(Error::InvalidShardCount(count));
        }
        self.shard_count = count;
        Ok(self)
    }

    /// Set the hash function to use.
    pub fn hash_function(mut self, hash_fn: HashFunction) -> Self {
        self.hash_function = hash_fn;
        self
    }

    /// Set initial capacity per shard. Total capacity will be approximately
    /// `capacity_per_shard * shard_count`. Omitted by default (HashMap default).
    pub fn capacity_per_shard(mut self, capacity: usize) -> Self {
        self.capacity_per_shard = Some(capacity);
        self
    }

    /// Visit shards with one worker thread each in `keys()` and `count()`.
    ///
    /// Only changes wall-clock latency; results are still per-shard
    /// snapshots, not a snapshot of the whole map.
    pub fn parallel_aggregates(mut self, enabled: bool) -> Self {
        self.parallel_aggregates = enabled;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shard_count: DEFAULT_SHARD_COUNT,
            hash_function: HashFunction::Fnv1a,
            capacity_per_shard: None,
            routing: RoutingConfig::Default,
            parallel_aggregates: false,
        }
    }
}

/// Builder for creating a ShardedMap with custom configuration.
#[derive(Debug, Default)]
pub struct ShardedMapBuilder {
    config: Config,
}

impl ShardedMapBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Set the number of shards. Must be greater than 0.
    pub fn shard_count(mut self, count: usize) -> Result<Self, Error> {
        self.config = self.config.shard_count(count)?;
        Ok(self)
    }

    /// Set the hash function to use.
    pub fn hash_function(mut self, hash_fn: HashFunction) -> Self {
        self.config = self.config.hash_function(hash_fn);
        self
    }

    /// Set initial capacity per shard. Total capacity ≈ `capacity_per_shard * shard_count`.
    pub fn capacity_per_shard(mut self, capacity: usize) -> Self {
        self.config = self.config.capacity_per_shard(capacity);
        self
    }

    /// Fan `keys()` and `count()` out to one worker per shard.
    pub fn parallel_aggregates(mut self, enabled: bool) -> Self {
        self.config = self.config.parallel_aggregates(enabled);
        self
    }

    /// Use a custom shard router.
    pub fn routing(mut self, routing: RoutingConfig) -> Self {
        self.config.routing = routing;
        self
    }

    /// Build a ShardedMap with the configured settings.
    pub fn build<V>(self) -> Result<crate::ShardedMap<V>, Error>
    where
        V: Send + Sync,
    {
        crate::ShardedMap::with_config(self.config)
    }
}

/// Create a hash function instance based on the configuration.
pub(crate) fn create_hasher(hash_fn: HashFunction) -> ShardHasher {
    match hash_fn {
        HashFunction::Fnv1a => ShardHasher::Fnv1a,
        HashFunction::AHash => ShardHasher::AHash,
        #[cfg(feature = "fxhash")]
        HashFunction::FxHash => ShardHasher::FxHash,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_shards_rejected() {
        assert_eq!(
            Config::new().shard_count(0).unwrap_err(),
            Error::InvalidShardCount(0)
        );
    }

    #[test]
    fn non_power_of_two_accepted() {
        let config = Config::new().shard_count(7).unwrap();
        assert_eq!(config.shard_count, 7);
    }

    #[test]
    fn default_router_stays_in_range() {
        let router = DefaultRouter;
        for hash in [0u64, 1, 31, 32, 33, u32::MAX as u64, u64::MAX] {
            assert!(router.route(hash, 32) < 32);
            assert!(router.route(hash, 7) < 7);
            assert_eq!(router.route(hash, 1), 0);
        }
        assert_eq!(router.route(84_696_446, 32), 84_696_446 % 32);
        assert_eq!(router.route(84_696_446, 7), 84_696_446 % 7);
    }
}
