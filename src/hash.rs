//! 64-bit string hashing for the delete-variant index.
//!
//! The index tolerates collisions (candidates are ultimately verified with
//! the edit-distance function), but the hash must be deterministic across
//! runs so that a prebuilt index stays valid.

#[cfg(not(all(target_feature = "aes", target_feature = "sse2")))]
use std::sync::LazyLock;

#[cfg(not(all(target_feature = "aes", target_feature = "sse2")))]
use ahash::RandomState;

#[cfg(not(all(target_feature = "aes", target_feature = "sse2")))]
static HASHER_64: LazyLock<RandomState> =
    LazyLock::new(|| RandomState::with_seeds(808259318, 750368348, 84901999, 789810389));

// stable hash, faster, but not available on all platforms
// https://github.com/ogxd/gxhash
#[inline]
#[cfg(all(target_feature = "aes", target_feature = "sse2"))]
pub(crate) fn hash64(term_bytes: &[u8]) -> u64 {
    use gxhash::gxhash64;

    gxhash64(term_bytes, 1234)
}

// seeded fallback, slower, available everywhere
// https://github.com/tkaitchuck/aHash
#[inline]
#[cfg(not(all(target_feature = "aes", target_feature = "sse2")))]
pub(crate) fn hash64(term_bytes: &[u8]) -> u64 {
    HASHER_64.hash_one(term_bytes)
}

/// Maps a term to a 64-bit hash for delete-index bucketing.
pub trait StringHasher {
    fn hash(&self, term: &str) -> u64;
}

/// Default [`StringHasher`]: gxhash on targets with hardware AES, a
/// fixed-seed ahash otherwise.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultStringHasher;

impl StringHasher for DefaultStringHasher {
    fn hash(&self, term: &str) -> u64 {
        hash64(term.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        let hasher = DefaultStringHasher;
        assert_eq!(hasher.hash("hello"), hasher.hash("hello"));
        assert_ne!(hasher.hash("hello"), hasher.hash("hellp"));
        // the empty delete variant of short words hashes too
        let _ = hasher.hash("");
    }
}
