//! Address-keyed caches shared by every probe task.
//!
//! Each cache maps an IP address string to a value computed from slow external
//! lookups (geo databases, reverse DNS). Caches are bounded LRU maps so a
//! long-running service cannot grow without limit; with the default capacity a
//! realistic probe list never evicts anything.

use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::Mutex;

use lru::LruCache;

/// Concurrency-safe, bounded, first-writer-wins cache.
///
/// Callers never lock anything themselves. A value stored for a key is not
/// replaced by a later racing writer; the source data is deterministic per
/// address, so the loser's value is simply discarded.
pub struct AddressCache<K, V> {
    entries: Mutex<LruCache<K, V>>,
}

impl<K, V> AddressCache<K, V>
where
    K: Hash + Eq,
    V: Clone,
{
    /// Creates a cache holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Returns a clone of the cached value and marks it as recently used.
    pub fn get(&self, key: &K) -> Option<V> {
        match self.entries.lock() {
            Ok(mut entries) => entries.get(key).cloned(),
            Err(poisoned) => poisoned.into_inner().get(key).cloned(),
        }
    }

    /// Stores `value` unless the key is already present.
    ///
    /// Returns the value now held by the cache, which is the earlier value when
    /// another writer got there first.
    pub fn insert_if_absent(&self, key: K, value: V) -> V {
        let mut entries = match self.entries.lock() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.get_or_insert(key, || value).clone()
    }

    pub fn len(&self) -> usize {
        match self.entries.lock() {
            Ok(entries) => entries.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
