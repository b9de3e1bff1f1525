use std::hash::{Hash, Hasher};

#[cfg(feature = "std-hash")]
pub mod default {
    pub use std::collections::hash_map::DefaultHasher;

    #[inline]
    pub fn new() -> DefaultHasher {
        DefaultHasher::new()
    }
}

#[cfg(not(feature = "std-hash"))]
pub mod default {
    pub use ahash::AHasher as DefaultHasher;

    #[inline]
    pub fn new() -> DefaultHasher {
        DefaultHasher::default()
    }
}

/// Hashes an arbitrary key into the `u64` used for dependency comparison.
///
/// Both hasher branches use fixed keys, so equal values hash equally for the
/// lifetime of the process.
pub fn hash_key<K: Hash + ?Sized>(key: &K) -> u64 {
    let mut hasher = default::new();
    key.hash(&mut hasher);
    hasher.finish()
}
