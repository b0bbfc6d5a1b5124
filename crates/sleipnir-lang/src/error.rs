//! Error types for the language crate.

use thiserror::Error;

/// Errors that can occur while parsing or assembling programs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum LangError {
    /// The requested dialect is not registered in the factory.
    #[error("type not found by name")]
    UnknownDialect(String),

    /// A mnemonic in the program text is not part of the dialect.
    #[error("unknown mnemonic '{mnemonic}' at byte {offset}")]
    UnknownMnemonic {
        /// The mnemonic text as it appeared in the input.
        mnemonic: String,
        /// Byte offset of the mnemonic within the input.
        offset: usize,
    },

    /// An operand was empty or not a decimal unsigned integer.
    #[error("malformed operand '{operand}' at byte {offset}")]
    MalformedOperand {
        /// The operand text as it appeared in the input.
        operand: String,
        /// Byte offset of the operand within the input.
        offset: usize,
    },

    /// The input ended before all operands of an instruction were read.
    #[error("unexpected end of input at byte {0}")]
    UnexpectedEnd(usize),

    /// A dialect was registered twice under the same name.
    #[error("failed to register child")]
    DuplicateDialect(String),
}

/// Result type for language operations.
pub type Result<T> = std::result::Result<T, LangError>;
