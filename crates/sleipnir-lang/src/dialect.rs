//! Dialects map textual mnemonics onto machine operations.

use rustc_hash::FxHashMap;

use crate::error::{LangError, Result};
use crate::machine::Opcode;

/// One row of a dialect's mnemonic table.
#[derive(Debug, Clone, Copy)]
pub struct MnemonicDef {
    /// The textual mnemonic, stored without terminator.
    pub mnemonic: &'static str,
    /// The operation the mnemonic assembles to.
    pub opcode: Opcode,
}

impl MnemonicDef {
    /// Number of operands an instruction using this mnemonic requires.
    pub const fn operand_count(&self) -> usize {
        self.opcode.operand_count()
    }
}

/// A named mnemonic table plus the two delimiter bytes the parser needs.
///
/// Tables are small (at most a few dozen rows), so [`Dialect::find`] is a
/// linear scan comparing length first and bytes second.
#[derive(Debug, Clone)]
pub struct Dialect {
    name: &'static str,
    opcode_delimiter: u8,
    operand_delimiter: u8,
    table: &'static [MnemonicDef],
}

impl Dialect {
    /// Assemble a dialect from its parts.
    pub const fn new(
        name: &'static str,
        opcode_delimiter: u8,
        operand_delimiter: u8,
        table: &'static [MnemonicDef],
    ) -> Self {
        Self {
            name,
            opcode_delimiter,
            operand_delimiter,
            table,
        }
    }

    /// The dialect's registered name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Byte separating a mnemonic from its first operand.
    pub fn opcode_delimiter(&self) -> u8 {
        self.opcode_delimiter
    }

    /// Byte separating consecutive operands.
    pub fn operand_delimiter(&self) -> u8 {
        self.operand_delimiter
    }

    /// Look up a mnemonic by its bytes.
    pub fn find(&self, mnemonic: &[u8]) -> Option<&MnemonicDef> {
        self.table
            .iter()
            .find(|def| def.mnemonic.len() == mnemonic.len() && def.mnemonic.as_bytes() == mnemonic)
    }
}

/// Process-wide table of dialect builders, indexed by dialect name.
///
/// The factory is populated once at startup with [`DialectFactory::with_builtins`]
/// and read-only afterwards.
pub struct DialectFactory {
    builders: FxHashMap<&'static str, fn() -> Dialect>,
}

impl DialectFactory {
    /// Create an empty factory.
    pub fn new() -> Self {
        Self {
            builders: FxHashMap::default(),
        }
    }

    /// Create a factory holding every built-in dialect.
    pub fn with_builtins() -> Self {
        let mut factory = Self::new();
        factory
            .register(crate::dialects::chpext::NAME, crate::dialects::chpext::dialect)
            .unwrap_or_else(|_| unreachable!("builtin dialect registered twice"));
        factory
    }

    /// Register a builder under `name`. Registering the same name twice is a
    /// startup failure.
    pub fn register(&mut self, name: &'static str, builder: fn() -> Dialect) -> Result<()> {
        if self.builders.insert(name, builder).is_some() {
            return Err(LangError::DuplicateDialect(name.to_owned()));
        }
        Ok(())
    }

    /// Construct a fresh dialect instance for `name`.
    pub fn instantiate(&self, name: &str) -> Result<Dialect> {
        self.builders
            .get(name)
            .map(|builder| builder())
            .ok_or_else(|| LangError::UnknownDialect(name.to_owned()))
    }

    /// Whether `name` is a registered dialect.
    pub fn contains(&self, name: &str) -> bool {
        self.builders.contains_key(name)
    }
}

impl Default for DialectFactory {
    fn default() -> Self {
        Self::with_builtins()
    }
}
