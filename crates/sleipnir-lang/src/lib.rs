//! Circuit description language for the Sleipnir simulation daemon.
//!
//! This crate turns textual circuit descriptions into bytecode programs the
//! stabilizer engine executes. It has four layers:
//!
//! - [`machine`]: the closed set of machine operations ([`Opcode`]) with
//!   their operand arities, and the decoded [`Instruction`] type.
//! - [`dialect`]: named mnemonic tables mapping text to opcodes, plus the
//!   process-wide [`DialectFactory`]. The built-in dialect is
//!   [`dialects::chpext`].
//! - [`interpreter`]: the parser that reads a delimiter-separated program
//!   text under a chosen dialect.
//! - [`program`]: the owned, immutable instruction sequence handed to the
//!   engine.
//!
//! # Example
//!
//! ```
//! use sleipnir_lang::{Interpreter, Opcode};
//!
//! let interpreter = Interpreter::new("chpext").unwrap();
//! let program = interpreter.parse_program("init 2\nh 0\nc 0,1\n", b'\n').unwrap();
//!
//! assert_eq!(program.len(), 3);
//! assert_eq!(program[1].opcode, Opcode::Hadamard);
//! assert_eq!(program[2].operands, [0, 1]);
//! ```

pub mod dialect;
pub mod dialects;
pub mod error;
pub mod interpreter;
pub mod machine;
pub mod program;

pub use dialect::{Dialect, DialectFactory, MnemonicDef};
pub use error::{LangError, Result};
pub use interpreter::Interpreter;
pub use machine::{Instruction, Opcode, MAX_OPERANDS};
pub use program::Program;
