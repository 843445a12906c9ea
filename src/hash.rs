use std::hash::Hasher;

/// 32-bit FNV offset basis.
pub const FNV_OFFSET_BASIS: u32 = 2_166_136_261;
/// 32-bit FNV prime.
pub const FNV_PRIME: u32 = 16_777_619;

/// Hash a key with 32-bit FNV-1a for shard routing.
///
/// Multiplies by the FNV prime and then folds in each byte. Not a digest:
/// collisions are expected and only the spread across shards matters.
#[inline]
pub fn fnv1a_32(key: &[u8]) -> u32 {
    let mut hash = FNV_OFFSET_BASIS;
    for &byte in key {
        hash = hash.wrapping_mul(FNV_PRIME);
        hash ^= byte as u32;
    }
    hash
}

/// Hash function implementation for shard assignment.
/// Uses an enum to avoid trait object limitations on the hot path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShardHasher {
    /// 32-bit FNV-1a (default).
    #[default]
    Fnv1a,
    /// AHash with fixed keys, so routing is stable for the process.
    AHash,
    /// FxHash implementation (faster but potentially less distributed).
    #[cfg(feature = "fxhash")]
    FxHash,
}

impl ShardHasher {
    /// Hash a key to determine which shard it belongs to.
    #[inline]
    pub fn hash_key(&self, key: &str) -> u64 {
        match self {
            ShardHasher::Fnv1a => fnv1a_32(key.as_bytes()) as u64,
            ShardHasher::AHash => {
                let mut hasher = ahash::AHasher::default();
                hasher.write(key.as_bytes());
                hasher.finish()
            }
            #[cfg(feature = "fxhash")]
            ShardHasher::FxHash => {
                let mut hasher = fxhash::FxHasher::default();
                hasher.write(key.as_bytes());
                hasher.finish()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_key_is_offset_basis() {
        assert_eq!(fnv1a_32(b""), FNV_OFFSET_BASIS);
    }

    #[test]
    fn known_values() {
        assert_eq!(fnv1a_32(b"a"), 84_696_446);
        assert_eq!(fnv1a_32(b"b"), 84_696_445);
        assert_eq!(fnv1a_32(b"foobar"), 837_857_890);
        assert_eq!(fnv1a_32(b"k0"), 1_719_082_412);
    }

    #[test]
    fn equal_keys_hash_identically() {
        let owned = String::from("tenant/42");
        assert_eq!(fnv1a_32(owned.as_bytes()), fnv1a_32(b"tenant/42"));
        for hasher in [ShardHasher::Fnv1a, ShardHasher::AHash] {
            assert_eq!(hasher.hash_key(&owned), hasher.hash_key("tenant/42"));
        }
    }

    #[test]
    fn fnv_spreads_over_shards() {
        let mut counts = [0u32; 32];
        for i in 0..3200 {
            let key = format!("key-{i}");
            counts[(fnv1a_32(key.as_bytes()) % 32) as usize] += 1;
        }
        for count in &counts {
            assert!(*count > 0, "empty shard: {counts:?}");
        }
    }
}
