//! Error types for the RPC surface.

use thiserror::Error;

/// Errors that can occur while decoding, routing, or serving requests.
///
/// The display strings double as the wire-level error messages, so the
/// variants that clients probe for keep the daemon's historical phrasing.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RpcError {
    /// The request frame did not end with a NUL byte.
    #[error("missing null terminator")]
    MissingNullTerminator,

    /// The request body was not the expected JSON shape.
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// No action is registered under the requested method name.
    #[error("type not found by name")]
    MethodNotFound,

    /// A parameter was missing or of the wrong type.
    #[error("bad parameter {0}")]
    BadParameter(usize),

    /// A value was out of its documented range.
    #[error("bad values")]
    BadValues,

    /// Action registration overflowed the dispatch table or a method name
    /// was too long.
    #[error("array bounds exceeded")]
    CapacityExceeded,

    /// An action was registered with an empty method name.
    #[error("zero length")]
    ZeroLength,

    /// A measurement-producing operation referenced a missing system or
    /// state.
    #[error("state not found")]
    StateNotFound,

    /// The endpoint string was not a supported `tcp://` or `ipc://` address.
    #[error("unsupported endpoint '{0}'")]
    BadEndpoint(String),

    /// Socket-level failure while binding or serving.
    #[error("network down: {0}")]
    Io(#[from] std::io::Error),

    /// Failure inside the simulation core.
    #[error(transparent)]
    Core(#[from] sleipnir_core::CoreError),
}

/// Result type for RPC operations.
pub type Result<T> = std::result::Result<T, RpcError>;
