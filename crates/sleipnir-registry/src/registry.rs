//! Integer-keyed registry with registry-allocated ids.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::error::{RegistryError, Result};

/// A thread-safe map from a registry-allocated id to an owned value.
///
/// Ids are handed out by a monotonically increasing counter starting at 1,
/// so id 0 never appears and entries are always appended in sorted order.
/// The id space is 64-bit; counter wrap-around is out of scope.
///
/// Entries live behind an `Arc`, so the backing vector may grow (amortized
/// doubling) without invalidating a slot another thread is editing.
pub struct Registry<V> {
    inner: RwLock<Inner<V>>,
}

struct Inner<V> {
    /// Sorted by id. Monotonic allocation means plain pushes keep it sorted.
    entries: Vec<(u64, Arc<Mutex<V>>)>,
    next_id: u64,
}

impl<V> Registry<V> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                entries: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Insert a value and return its freshly allocated id.
    pub fn insert(&self, value: V) -> u64 {
        self.insert_with(|| value)
    }

    /// Insert the value produced by `make` and return its id.
    ///
    /// `make` runs under the structural writer lock, after the id has been
    /// allocated.
    pub fn insert_with(&self, make: impl FnOnce() -> V) -> u64 {
        let mut inner = write(&self.inner);
        let id = inner.next_id;
        inner.next_id += 1;
        let value = make();
        inner.entries.push((id, Arc::new(Mutex::new(value))));
        id
    }

    /// Remove the entry under `id`. Returns `false` if no such entry exists.
    pub fn erase(&self, id: u64) -> bool {
        let mut inner = write(&self.inner);
        match inner.entries.binary_search_by_key(&id, |(k, _)| *k) {
            Ok(idx) => {
                inner.entries.remove(idx);
                true
            }
            Err(_) => false,
        }
    }

    /// Run `op` on the value under `id`, holding the list reader lock and
    /// the entry mutex for the duration of the call.
    pub fn edit<R>(&self, id: u64, op: impl FnOnce(&mut V) -> R) -> Result<R> {
        let inner = read(&self.inner);
        let slot = match inner.entries.binary_search_by_key(&id, |(k, _)| *k) {
            Ok(idx) => &inner.entries[idx].1,
            Err(_) => return Err(RegistryError::NotFound),
        };
        let mut value = slot.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(op(&mut value))
    }

    /// Whether an entry exists under `id`.
    pub fn contains(&self, id: u64) -> bool {
        let inner = read(&self.inner);
        inner
            .entries
            .binary_search_by_key(&id, |(k, _)| *k)
            .is_ok()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        read(&self.inner).entries.len()
    }

    /// Whether the registry holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V: Clone> Registry<V> {
    /// Return a clone of the value under `id`.
    pub fn get(&self, id: u64) -> Result<V> {
        self.edit(id, |value| value.clone())
    }
}

impl<V> Default for Registry<V> {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn read<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
