//! # ShardedMap
//!
//! A concurrent string-keyed map that spreads its keyspace over a fixed
//! number of shards, each with its own read-write lock.
//!
//! A single global lock serializes every operation no matter which keys it
//! touches. Here each key is routed to one shard with a 32-bit FNV-1a hash,
//! so callers working on keys in different shards never wait on each other.
//! Single-key operations take exactly one shard lock and release it before
//! returning; no code path holds two shard locks at once.
//!
//! ## Features
//!
//! - **Low Contention**: One lock per shard instead of one for the whole map
//! - **Deterministic Routing**: Same key always maps to the same shard
//! - **Shared Reads**: Values stored as `Arc<V>` and handed out without copying
//! - **Fan-out Aggregates**: `keys()` and `count()` can visit shards in parallel
//! - **Statistics**: Per-shard load and (with `metrics`) operation counters
//!
//! ## Consistency
//!
//! Operations on one key are linearized by its shard lock. `count()`,
//! `keys()`, `stats()` and `iter_snapshot()` visit shards one at a time and
//! are not snapshots of the whole map: a write landing in a shard after that
//! shard was visited is missed. Once writers are quiescent the results are exact.
//!
//! ## Example
//!
//! ```rust
//! use shardedmap::ShardedMap;
//!
//! let map = ShardedMap::new(32)?;
//!
//! map.set("a", "1".to_string());
//! map.set("b", "2".to_string());
//! map.set("a", "3".to_string());
//!
//! assert_eq!(map.get("a").unwrap().as_str(), "3");
//! assert!(map.get("c").is_none());
//! assert_eq!(map.count(), 2);
//!
//! let mut keys = map.keys();
//! keys.sort();
//! assert_eq!(keys, ["a", "b"]);
//! # Ok::<(), shardedmap::Error>(())
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use shardedmap::{HashFunction, ShardedMapBuilder};
//!
//! let map = ShardedMapBuilder::new()
//!     .shard_count(64)?
//!     .hash_function(HashFunction::AHash)
//!     .parallel_aggregates(true)
//!     .build::<u64>()?;
//! map.set("hits", 1);
//! # Ok::<(), shardedmap::Error>(())
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]

/// Configuration and builder types.
pub mod config;
/// Error types.
pub mod error;
/// Shard routing hashes.
pub mod hash;
/// Iterator implementations.
pub mod iter;
pub mod reference;
mod shard;
/// Main ShardedMap implementation.
pub mod shardmap;
pub mod stats;

pub use config::{Config, DefaultRouter, HashFunction, RoutingConfig, ShardRouter, ShardedMapBuilder};
pub use error::Error;
pub use hash::fnv1a_32;
pub use reference::{KvMap, ReferenceMap};
pub use shardmap::ShardedMap;
pub use stats::{Diagnostics, ShardDiagnostics, ShardOps, Stats};
