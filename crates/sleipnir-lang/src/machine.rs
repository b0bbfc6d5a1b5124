//! The machine model: operations, their arities, and decoded instructions.

use serde::{Deserialize, Serialize};

/// The maximum number of operands any operation takes.
pub const MAX_OPERANDS: usize = 2;

/// The closed set of operations the stabilizer machine executes.
///
/// The discriminant doubles as the bytecode value; nothing outside this enum
/// may be executed, and no code should rely on the concrete discriminant
/// values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    /// Invoke a stored macro: operands are `(kernel_id, macro_id)`.
    Macro,
    /// Replace the state with a fresh tableau: operand is the qubit count.
    Initialize,
    /// No-op on one qubit.
    Identity,
    /// Hadamard gate on one qubit.
    Hadamard,
    /// Phase (S) gate on one qubit.
    Phase,
    /// Measure one qubit in the computational basis.
    Measure,
    /// Controlled-NOT: operands are `(control, target)`.
    Cnot,
    /// Pauli-X gate on one qubit.
    PauliX,
    /// Pauli-Y gate on one qubit.
    PauliY,
    /// Pauli-Z gate on one qubit.
    PauliZ,
}

impl Opcode {
    /// Number of operands the operation requires.
    pub const fn operand_count(self) -> usize {
        match self {
            Opcode::Macro | Opcode::Cnot => 2,
            Opcode::Initialize
            | Opcode::Identity
            | Opcode::Hadamard
            | Opcode::Phase
            | Opcode::Measure
            | Opcode::PauliX
            | Opcode::PauliY
            | Opcode::PauliZ => 1,
        }
    }
}

/// A decoded machine instruction.
///
/// Unused operand slots are zero; [`Opcode::operand_count`] says how many are
/// meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    /// The operation to perform.
    pub opcode: Opcode,
    /// Operand storage; interpretation is up to the operation.
    pub operands: [u64; MAX_OPERANDS],
}

impl Instruction {
    /// Build an instruction, zero-filling unused operand slots.
    pub fn new(opcode: Opcode, operands: &[u64]) -> Self {
        debug_assert!(operands.len() <= MAX_OPERANDS);
        let mut storage = [0; MAX_OPERANDS];
        storage[..operands.len()].copy_from_slice(operands);
        Self {
            opcode,
            operands: storage,
        }
    }
}
