//! String-keyed registry with unique labels.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::error::{RegistryError, Result};
use crate::registry::{read, write};

/// A thread-safe map from a string label to an owned value.
///
/// Labels are unique: inserting under a label that is already present fails
/// with [`RegistryError::DuplicateLabel`]. Lookup is a linear comparison over
/// the entry list; the registries stored this way hold a handful of entries
/// at most, so a search structure would not pay for itself.
///
/// The locking model matches [`crate::Registry`]: list-level `RwLock`,
/// per-entry `Mutex`, [`NamedRegistry::edit`] holds both.
pub struct NamedRegistry<V> {
    inner: RwLock<Vec<(String, Arc<Mutex<V>>)>>,
}

impl<V> NamedRegistry<V> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Vec::new()),
        }
    }

    /// Insert `value` under `label`.
    pub fn insert(&self, label: &str, value: V) -> Result<()> {
        let mut entries = write(&self.inner);
        if entries.iter().any(|(name, _)| name == label) {
            return Err(RegistryError::DuplicateLabel);
        }
        entries.push((label.to_owned(), Arc::new(Mutex::new(value))));
        Ok(())
    }

    /// Remove the entry under `label`. Returns `false` if no such entry
    /// exists.
    pub fn erase(&self, label: &str) -> bool {
        let mut entries = write(&self.inner);
        match entries.iter().position(|(name, _)| name == label) {
            Some(idx) => {
                entries.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Run `op` on the value under `label`, holding the list reader lock and
    /// the entry mutex for the duration of the call.
    pub fn edit<R>(&self, label: &str, op: impl FnOnce(&mut V) -> R) -> Result<R> {
        let entries = read(&self.inner);
        let slot = entries
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, slot)| slot)
            .ok_or(RegistryError::NotFound)?;
        let mut value = slot.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(op(&mut value))
    }

    /// Whether an entry exists under `label`.
    pub fn contains(&self, label: &str) -> bool {
        read(&self.inner).iter().any(|(name, _)| name == label)
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        read(&self.inner).len()
    }

    /// Whether the registry holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V> Default for NamedRegistry<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_labels() {
        let registry = NamedRegistry::new();
        registry.insert("chpext", 1).unwrap();
        assert_eq!(
            registry.insert("chpext", 2),
            Err(RegistryError::DuplicateLabel)
        );
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.edit("chpext", |v| *v).unwrap(), 1);
    }

    #[test]
    fn test_erase_then_reinsert() {
        let registry = NamedRegistry::new();
        registry.insert("a", ()).unwrap();
        assert!(registry.erase("a"));
        assert!(!registry.contains("a"));
        registry.insert("a", ()).unwrap();
        assert!(registry.contains("a"));
    }

    #[test]
    fn test_missing_label() {
        let registry: NamedRegistry<u8> = NamedRegistry::new();
        assert_eq!(registry.edit("nope", |_| ()), Err(RegistryError::NotFound));
        assert!(!registry.erase("nope"));
    }
}
