//! Concurrent registries shared by the Sleipnir simulation daemon.
//!
//! A registry maps a key to an owned value and is safe to use from many
//! threads at once. Two flavors exist:
//!
//! - [`Registry`] keys entries by a monotonically increasing 64-bit id that
//!   the registry itself allocates on insert. Lookup is a binary search over
//!   the sorted entry list.
//! - [`NamedRegistry`] keys entries by a caller-supplied string label and
//!   rejects duplicate labels. Lookup is a linear scan, which is the right
//!   trade for the handful of labels these registries ever hold.
//!
//! # Locking model
//!
//! Both flavors carry a list-level `RwLock` guarding the key-to-slot mapping
//! and a plain `Mutex` per entry guarding the value. [`Registry::edit`] holds
//! the list lock on the reader side together with the entry mutex for the
//! duration of the caller's closure, so a structural writer (insert, erase)
//! can never move the entry mid-edit, while editors of *different* entries
//! proceed in parallel. Structural operations take the writer side and
//! therefore exclude all readers and editors.
//!
//! A closure running under [`Registry::edit`] must not call a structural
//! operation on the same registry; doing so deadlocks on the list lock.

pub mod error;
pub mod named;
pub mod registry;

pub use error::{RegistryError, Result};
pub use named::NamedRegistry;
pub use registry::Registry;
