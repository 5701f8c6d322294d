//! Keyed pool store with create-if-absent semantics.

use std::collections::hash_map::{Entry, HashMap};
use std::hash::Hash;

use crate::error::{ExchangeError, Result};

/// A keyed store mapping pool identity to pool state.
///
/// The vacancy check and the insert are a single operation
/// ([`Self::try_insert`]), so a duplicate create can never race past the
/// check. The exchange facade owns the registry behind `&mut self`, giving
/// every public entry point exclusive access for its full duration; hosts
/// that need cross-thread access wrap the whole
/// [`Exchange`](crate::exchange::Exchange) in their own lock.
#[derive(Debug)]
pub struct Registry<K, V> {
    entries: HashMap<K, V>,
}

impl<K, V> Default for Registry<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash, V> Registry<K, V> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `value` under `key` iff the key is vacant.
    ///
    /// # Errors
    ///
    /// [`ExchangeError::PoolAlreadyExists`] if the key is occupied; the
    /// existing value is untouched.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<()> {
        match self.entries.entry(key) {
            Entry::Occupied(_) => Err(ExchangeError::PoolAlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(value);
                Ok(())
            }
        }
    }

    /// Returns the entry under `key`, if any.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Returns the entry under `key` mutably, if any.
    #[must_use]
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.entries.get_mut(key)
    }

    /// Returns `true` if `key` is occupied.
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of registered entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no entries are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_get() {
        let mut registry: Registry<u8, &str> = Registry::new();
        let Ok(()) = registry.try_insert(1, "one") else {
            panic!("expected Ok");
        };
        assert_eq!(registry.get(&1), Some(&"one"));
        assert!(registry.contains(&1));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn duplicate_insert_rejected_and_preserves_original() {
        let mut registry: Registry<u8, &str> = Registry::new();
        let Ok(()) = registry.try_insert(1, "one") else {
            panic!("expected Ok");
        };
        assert_eq!(
            registry.try_insert(1, "other"),
            Err(ExchangeError::PoolAlreadyExists)
        );
        assert_eq!(registry.get(&1), Some(&"one"));
    }

    #[test]
    fn get_mut_mutates_in_place() {
        let mut registry: Registry<u8, u32> = Registry::new();
        let Ok(()) = registry.try_insert(1, 10) else {
            panic!("expected Ok");
        };
        let Some(value) = registry.get_mut(&1) else {
            panic!("expected Some");
        };
        *value += 5;
        assert_eq!(registry.get(&1), Some(&15));
    }

    #[test]
    fn missing_key() {
        let registry: Registry<u8, u32> = Registry::new();
        assert!(registry.get(&9).is_none());
        assert!(!registry.contains(&9));
        assert!(registry.is_empty());
    }
}
