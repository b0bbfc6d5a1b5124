//! Error types for registry operations.

use thiserror::Error;

/// Errors that can occur when operating on a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RegistryError {
    /// No entry exists under the requested key.
    #[error("not found")]
    NotFound,

    /// An entry with the same label already exists.
    #[error("duplicate label")]
    DuplicateLabel,
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
