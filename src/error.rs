use thiserror::Error;

/// Errors that can occur when configuring a ShardedMap.
///
/// Data operations never fail: a missing key is `None`, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The shard count is invalid (must be greater than 0).
    #[error("shard count must be greater than 0, got {0}")]
    InvalidShardCount(usize),
}
