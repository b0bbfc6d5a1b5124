//! Core simulation state for the Sleipnir daemon.
//!
//! The [`Universe`] owns everything a running daemon simulates: the process
//! random generator, the kernels holding compiled macros, the quantum
//! systems holding stabilizer states, and the per-dialect interpreters. RPC
//! handlers receive an explicit universe handle and call its operations;
//! nothing in this crate is a hidden global, so tests instantiate throwaway
//! universes freely.
//!
//! Internally every collection is a [`sleipnir_registry`] registry, so
//! handlers working on different kernels, systems, or states proceed in
//! parallel and only structural changes serialize.

pub mod error;
pub mod kernel;
pub mod rng;
pub mod state;
pub mod system;
pub mod universe;

pub use error::{CoreError, Result};
pub use kernel::Kernel;
pub use rng::Generator;
pub use state::{ChpStates, StateType, StateTypeFactory};
pub use system::QuantumSystem;
pub use universe::Universe;
