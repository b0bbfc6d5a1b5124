//! Bit-packed stabilizer tableau engine for the Sleipnir simulation daemon.
//!
//! This crate simulates Clifford circuits in the stabilizer formalism using
//! the CHP tableau algorithm of Aaronson and Gottesman
//! ([arXiv:quant-ph/0406196]): an `n`-qubit state is identified by `n`
//! stabilizer and `n` destabilizer generators, each a signed `n`-qubit Pauli
//! operator, packed two bits per qubit into 32-bit words. Hadamard, Phase,
//! and CNOT act in `O(n)` word operations per gate; measurement costs
//! `O(n²)` in the worst case.
//!
//! [`Tableau`] holds the state and the gate and measurement primitives.
//! [`Executor`] runs compiled [`Program`]s against a tableau, resolving
//! `macro` instructions and random measurement outcomes through a
//! caller-supplied [`ExecEnv`].
//!
//! # Example
//!
//! ```
//! use sleipnir_chp::{EmptyEnv, Executor};
//! use sleipnir_lang::Interpreter;
//!
//! let program = Interpreter::new("chpext")
//!     .unwrap()
//!     .parse_program("init 3\nx 0\nm 0\nm 1\n", b'\n')
//!     .unwrap();
//!
//! let mut output = Vec::new();
//! Executor::new(&EmptyEnv).compute(&program, &mut output).unwrap();
//! assert_eq!(output, b"10");
//! ```
//!
//! [arXiv:quant-ph/0406196]: https://arxiv.org/abs/quant-ph/0406196
//!
//! [`Program`]: sleipnir_lang::Program

pub mod error;
pub mod executor;
pub mod tableau;

pub use error::{ChpError, Result};
pub use executor::{EmptyEnv, ExecEnv, Executor, DEFAULT_MACRO_DEPTH};
pub use tableau::Tableau;
