use std::hash::Hash;

use crate::hash::hash_key;

/// Hash of a dependency set (active filters, search text, sort order...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DependencyKey(u64);

impl DependencyKey {
    pub fn of<K: Hash + ?Sized>(dependencies: &K) -> Self {
        Self(hash_key(dependencies))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Remembers the last dependency key and reports real changes only.
///
/// Re-supplying an equal dependency set on every render must not restart the
/// list, otherwise a render triggered by the refresh would refresh again.
#[derive(Clone, Debug, Default)]
pub struct DependencyTracker {
    key: Option<DependencyKey>,
}

impl DependencyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(key: DependencyKey) -> Self {
        Self { key: Some(key) }
    }

    pub fn key(&self) -> Option<DependencyKey> {
        self.key
    }

    /// Records `key` and returns whether it differs from the previous one.
    /// The first key recorded counts as a change.
    pub fn update(&mut self, key: DependencyKey) -> bool {
        match self.key {
            Some(current) if current == key => false,
            _ => {
                self.key = Some(key);
                true
            }
        }
    }
}
