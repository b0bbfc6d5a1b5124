//! Error types for core operations.

use thiserror::Error;

/// Errors that can occur in universe operations.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum CoreError {
    /// The named state type is not registered in the factory.
    #[error("type not found by name")]
    UnknownStateType(String),

    /// The referenced kernel does not exist.
    #[error("kernel not found")]
    KernelNotFound(u64),

    /// The referenced system does not exist (for operations that cannot
    /// report it as a plain `false`).
    #[error("state not found")]
    SystemNotFound(u64),

    /// A sampling range or weight list had inconsistent values.
    #[error("bad values")]
    BadValues,

    /// An empty weight list was supplied.
    #[error("zero length")]
    ZeroLength,

    /// A branch that cannot be reached on well-formed state was reached.
    #[error("{0}")]
    Internal(&'static str),

    /// Program text failed to parse.
    #[error(transparent)]
    Lang(#[from] sleipnir_lang::LangError),

    /// Program execution failed in the stabilizer engine.
    #[error(transparent)]
    Chp(#[from] sleipnir_chp::ChpError),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
