//! Bounded canonicalizing caches for keys and raw values
//!
//! An [`InternCache`] hands out one shared instance per distinct value and
//! forgets the least recently used entry once it is full. Every lookup
//! reorders the LRU list, so lookups take the same exclusive lock as inserts.

use std::hash::Hash;

use lru::LruCache;
use parking_lot::Mutex;

use crate::config::{CacheConfig, ConfigError, DEFAULT_NONZERO_CAPACITY};
use crate::error::NameError;
use crate::value::{Key, RawValue, Whitespace};

/// Thread-safe LRU interning cache
pub struct InternCache<T> {
    name: &'static str,
    entries: Mutex<LruCache<T, T>>,
}

impl<T> InternCache<T>
where
    T: Hash + Eq + Clone,
{
    pub fn new(name: &'static str, capacity: std::num::NonZeroUsize) -> Self {
        Self {
            name,
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Return the canonical instance equal to `candidate`
    ///
    /// If none is cached, `candidate` becomes the canonical instance.
    pub fn intern(&self, candidate: T) -> T {
        let mut entries = self.entries.lock();
        if let Some(hit) = entries.get(&candidate) {
            return hit.clone();
        }
        if entries.push(candidate.clone(), candidate.clone()).is_some() {
            tracing::trace!(cache = self.name, "evicted least recently used entry");
        }
        candidate
    }

    /// Whether an equal value is cached, without counting as a use
    pub fn contains(&self, value: &T) -> bool {
        self.entries.lock().contains(value)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.entries.lock().cap().get()
    }
}

impl<T> std::fmt::Debug for InternCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InternCache")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Interning service for keys and raw values
///
/// Create one per process (or per test) and share it behind an `Arc`.
#[derive(Debug)]
pub struct Interner {
    keys: InternCache<Key>,
    values: InternCache<RawValue>,
}

impl Default for Interner {
    fn default() -> Self {
        let capacity = DEFAULT_NONZERO_CAPACITY;
        Self {
            keys: InternCache::new("keys", capacity),
            values: InternCache::new("values", capacity),
        }
    }
}

impl Interner {
    pub fn new(config: &CacheConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            keys: InternCache::new("keys", config.key_capacity()?),
            values: InternCache::new("values", config.value_capacity()?),
        })
    }

    /// Canonical key for `text`
    ///
    /// Fails if `text` is empty.
    pub fn intern_key(&self, text: &str) -> Result<Key, NameError> {
        Ok(self.keys.intern(Key::new(text)?))
    }

    /// Canonical value for `text` with the default policy for its atomicity
    pub fn intern_value(&self, text: &str, atomic: bool) -> RawValue {
        self.intern(RawValue::new(text, atomic, Whitespace::default()))
    }

    /// Canonical instance equal to `value`
    pub fn intern(&self, value: RawValue) -> RawValue {
        self.values.intern(value)
    }

    pub fn is_key_cached(&self, text: &str) -> bool {
        Key::new(text).is_ok_and(|key| self.keys.contains(&key))
    }

    pub fn is_value_cached(&self, value: &RawValue) -> bool {
        self.values.contains(value)
    }

    pub fn keys(&self) -> &InternCache<Key> {
        &self.keys
    }

    pub fn values(&self) -> &InternCache<RawValue> {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroUsize;

    fn cache(capacity: usize) -> InternCache<Key> {
        InternCache::new("test", NonZeroUsize::new(capacity).unwrap())
    }

    fn key(text: &str) -> Key {
        Key::new(text).unwrap()
    }

    #[test]
    fn test_intern_returns_first_instance() {
        let cache = cache(4);
        let first = cache.intern(key("first"));
        let again = cache.intern(key("first"));
        assert!(Key::ptr_eq(&first, &again));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_lru_eviction() {
        let cache = cache(2);
        let a = cache.intern(key("a"));
        cache.intern(key("b"));
        // Touch "a" so "b" becomes the eviction candidate
        cache.intern(key("a"));
        cache.intern(key("c"));

        assert!(cache.contains(&key("a")));
        assert!(!cache.contains(&key("b")));
        assert!(cache.contains(&key("c")));
        assert_eq!(cache.len(), 2);

        let a_again = cache.intern(key("a"));
        assert!(Key::ptr_eq(&a, &a_again));
    }

    #[test]
    fn test_evicted_entry_gets_new_instance() {
        let cache = cache(1);
        let a = cache.intern(key("a"));
        cache.intern(key("b"));
        let a_again = cache.intern(key("a"));
        assert_eq!(a, a_again);
        assert!(!Key::ptr_eq(&a, &a_again));
    }

    #[test]
    fn test_default_interner_capacity() {
        let interner = Interner::default();
        assert_eq!(interner.keys().capacity(), 20);
        assert_eq!(interner.values().capacity(), 20);
    }

    #[test]
    fn test_interner_from_config() {
        let config = CacheConfig::new().with_key_capacity(3).with_value_capacity(5);
        let interner = Interner::new(&config).unwrap();
        assert_eq!(interner.keys().capacity(), 3);
        assert_eq!(interner.values().capacity(), 5);
    }

    #[test]
    fn test_interner_zero_capacity_rejected() {
        let config = CacheConfig::new().with_key_capacity(0);
        assert!(matches!(
            Interner::new(&config),
            Err(ConfigError::ZeroCapacity { cache: "keys" })
        ));
    }

    #[test]
    fn test_intern_key_rejects_empty() {
        let interner = Interner::default();
        assert!(matches!(
            interner.intern_key(""),
            Err(NameError::InvalidArgument { .. })
        ));
        assert!(!interner.is_key_cached(""));
    }

    #[test]
    fn test_intern_value_distinguishes_atomicity() {
        let interner = Interner::default();
        let literal = interner.intern_value("Laird", true);
        let template = interner.intern_value("Laird", false);
        assert_ne!(literal, template);
        assert!(RawValue::ptr_eq(
            &literal,
            &interner.intern_value("Laird", true)
        ));
        assert!(interner.is_value_cached(&RawValue::literal("Laird")));
        assert!(!interner.is_key_cached("x"));
    }
}
