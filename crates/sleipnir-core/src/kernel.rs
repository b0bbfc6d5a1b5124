//! Kernels: registries of compiled macro programs.

use std::sync::Arc;

use sleipnir_lang::Program;
use sleipnir_registry::Registry;

/// A registry of compiled programs addressable by macro id.
///
/// Macro ids are allocated monotonically and macros are append-only; a
/// kernel never rewrites a stored program, so `macro` instructions that
/// resolved once keep resolving to the same bytecode.
pub struct Kernel {
    macros: Registry<Arc<Program>>,
}

impl Kernel {
    /// Create an empty kernel.
    pub fn new() -> Self {
        Self {
            macros: Registry::new(),
        }
    }

    /// Store a compiled program and return its macro id.
    pub fn insert_macro(&self, program: Program) -> u64 {
        self.macros.insert(Arc::new(program))
    }

    /// Fetch a stored program by macro id.
    pub fn macro_program(&self, macro_id: u64) -> Option<Arc<Program>> {
        self.macros.get(macro_id).ok()
    }

    /// Number of stored macros.
    pub fn macro_count(&self) -> usize {
        self.macros.len()
    }
}

impl Default for Kernel {
    fn default() -> Self {
        Self::new()
    }
}
