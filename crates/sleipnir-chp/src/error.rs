//! Error types for the stabilizer engine.

use thiserror::Error;

/// Errors that can occur while executing a program against a tableau.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ChpError {
    /// The tableau bit matrices could not be allocated.
    #[error("state initialize failed")]
    Allocation,

    /// A gate or measurement addressed a qubit the tableau does not have.
    ///
    /// Also raised when a gate runs against a tableau that was never
    /// initialized (`n == 0`).
    #[error("qubit {qubit} out of range for {n}-qubit state")]
    QubitOutOfRange {
        /// The offending operand.
        qubit: u64,
        /// Current tableau size.
        n: usize,
    },

    /// A `macro` instruction referenced a kernel or macro id that does not
    /// exist.
    #[error("macro {macro_id} not found in kernel {kernel_id}")]
    MacroNotFound {
        /// The kernel operand of the instruction.
        kernel_id: u64,
        /// The macro operand of the instruction.
        macro_id: u64,
    },

    /// Macro invocations nested deeper than the executor's limit.
    #[error("macro recursion deeper than {0} levels")]
    MacroDepthExceeded(usize),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, ChpError>;
