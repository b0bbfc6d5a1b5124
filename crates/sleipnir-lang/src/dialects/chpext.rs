//! The `chpext` dialect: the CHP instruction set extended with macro
//! invocation, explicit initialization, and the remaining Pauli gates.

use crate::dialect::{Dialect, MnemonicDef};
use crate::machine::Opcode;

/// Registered name of the dialect.
pub const NAME: &str = "chpext";

const OPCODE_DELIMITER: u8 = b' ';
const OPERAND_DELIMITER: u8 = b',';

const TABLE: &[MnemonicDef] = &[
    MnemonicDef {
        mnemonic: "macro",
        opcode: Opcode::Macro,
    },
    MnemonicDef {
        mnemonic: "init",
        opcode: Opcode::Initialize,
    },
    MnemonicDef {
        mnemonic: "i",
        opcode: Opcode::Identity,
    },
    MnemonicDef {
        mnemonic: "h",
        opcode: Opcode::Hadamard,
    },
    MnemonicDef {
        mnemonic: "p",
        opcode: Opcode::Phase,
    },
    MnemonicDef {
        mnemonic: "m",
        opcode: Opcode::Measure,
    },
    MnemonicDef {
        mnemonic: "c",
        opcode: Opcode::Cnot,
    },
    MnemonicDef {
        mnemonic: "x",
        opcode: Opcode::PauliX,
    },
    MnemonicDef {
        mnemonic: "y",
        opcode: Opcode::PauliY,
    },
    MnemonicDef {
        mnemonic: "z",
        opcode: Opcode::PauliZ,
    },
];

/// Build a fresh `chpext` dialect instance.
pub fn dialect() -> Dialect {
    Dialect::new(NAME, OPCODE_DELIMITER, OPERAND_DELIMITER, TABLE)
}
