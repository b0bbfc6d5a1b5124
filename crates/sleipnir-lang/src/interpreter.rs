//! The interpreter parses program text under a chosen dialect.

use crate::dialect::{Dialect, DialectFactory};
use crate::error::{LangError, Result};
use crate::machine::{Instruction, MAX_OPERANDS};
use crate::program::Program;

/// Parses newline-style program text into a [`Program`].
///
/// An interpreter is bound to one dialect for its lifetime; the universe
/// keeps one per dialect name and reuses it across requests.
pub struct Interpreter {
    dialect: Dialect,
}

impl Interpreter {
    /// Create an interpreter for a built-in dialect by name.
    pub fn new(dialect_name: &str) -> Result<Self> {
        let factory = DialectFactory::with_builtins();
        Ok(Self {
            dialect: factory.instantiate(dialect_name)?,
        })
    }

    /// Create an interpreter over an already-instantiated dialect.
    pub fn with_dialect(dialect: Dialect) -> Self {
        Self { dialect }
    }

    /// The dialect this interpreter parses.
    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Parse a program text into a [`Program`].
    ///
    /// Each instruction is a mnemonic, the dialect's opcode delimiter, and
    /// exactly as many operands as the mnemonic requires, separated by the
    /// dialect's operand delimiter. Instructions are separated by
    /// `line_delimiter`. Leading space and tab bytes are skipped once at the
    /// start; a NUL byte ends the input early. Operands are unsigned decimal
    /// integers. Comments and blank lines are not supported.
    pub fn parse_program(&self, text: &str, line_delimiter: u8) -> Result<Program> {
        let bytes = text.as_bytes();
        let mut pos = 0;

        while pos < bytes.len() && (bytes[pos] == b' ' || bytes[pos] == b'\t') {
            pos += 1;
        }

        let mut instructions = Vec::new();
        while pos < bytes.len() && bytes[pos] != 0 {
            let mnemonic_start = pos;
            while pos < bytes.len() && bytes[pos] != self.dialect.opcode_delimiter() && bytes[pos] != 0
            {
                pos += 1;
            }
            let mnemonic = &bytes[mnemonic_start..pos];
            let def = self.dialect.find(mnemonic).ok_or_else(|| {
                LangError::UnknownMnemonic {
                    mnemonic: String::from_utf8_lossy(mnemonic).into_owned(),
                    offset: mnemonic_start,
                }
            })?;

            let mut operands = [0_u64; MAX_OPERANDS];
            for slot in operands.iter_mut().take(def.operand_count()) {
                // Step over the delimiter that ended the previous token.
                if pos >= bytes.len() || bytes[pos] == 0 {
                    return Err(LangError::UnexpectedEnd(pos));
                }
                pos += 1;
                let operand_start = pos;
                while pos < bytes.len()
                    && bytes[pos] != self.dialect.operand_delimiter()
                    && bytes[pos] != line_delimiter
                    && bytes[pos] != 0
                {
                    pos += 1;
                }
                *slot = parse_operand(&bytes[operand_start..pos], operand_start)?;
            }

            instructions.push(Instruction {
                opcode: def.opcode,
                operands,
            });

            // Step past the line delimiter, if the input did not just end.
            if pos < bytes.len() && bytes[pos] != 0 {
                pos += 1;
            }
        }

        Ok(Program::from(instructions))
    }
}

/// Convert unsigned decimal operand text. No sign, no radix prefixes.
fn parse_operand(text: &[u8], offset: usize) -> Result<u64> {
    let malformed = || LangError::MalformedOperand {
        operand: String::from_utf8_lossy(text).into_owned(),
        offset,
    };
    if text.is_empty() || !text.iter().all(u8::is_ascii_digit) {
        return Err(malformed());
    }
    // all-digit input only fails to parse on overflow
    std::str::from_utf8(text)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(malformed)
}
