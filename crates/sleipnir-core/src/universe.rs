//! The universe: everything one daemon process simulates.

use std::sync::Arc;

use tracing::debug;

use sleipnir_chp::{ChpError, ExecEnv};
use sleipnir_lang::{DialectFactory, Interpreter, Program};
use sleipnir_registry::{NamedRegistry, Registry};

use crate::error::{CoreError, Result};
use crate::kernel::Kernel;
use crate::rng::Generator;
use crate::state::StateTypeFactory;
use crate::system::QuantumSystem;

/// Owns the random generator and the three registries, and exposes the
/// operations the RPC action handlers call.
///
/// A daemon process creates exactly one universe and hands a shared
/// reference to every handler; tests create as many as they like. Each
/// operation reaches its target through the owning registry's `edit` entry
/// point, so it runs under the list reader lock plus the entry mutex, and
/// operations on distinct entries proceed concurrently.
pub struct Universe {
    generator: Generator,
    dialects: DialectFactory,
    state_types: StateTypeFactory,
    interpreters: NamedRegistry<Interpreter>,
    kernels: Registry<Kernel>,
    systems: Registry<QuantumSystem>,
}

impl Universe {
    /// Create a universe with an entropy-seeded generator.
    pub fn new() -> Self {
        Self::with_generator(Generator::from_entropy())
    }

    /// Create a universe around an explicitly constructed generator.
    pub fn with_generator(generator: Generator) -> Self {
        Self {
            generator,
            dialects: DialectFactory::with_builtins(),
            state_types: StateTypeFactory::with_builtins(),
            interpreters: NamedRegistry::new(),
            kernels: Registry::new(),
            systems: Registry::new(),
        }
    }

    /// The process random generator.
    pub fn generator(&self) -> &Generator {
        &self.generator
    }

    /// Compile `text` under the named dialect.
    ///
    /// The interpreter for a dialect is created on first use and kept for
    /// the life of the universe.
    pub fn compile_program(
        &self,
        dialect: &str,
        text: &str,
        line_delimiter: u8,
    ) -> Result<Program> {
        if !self.interpreters.contains(dialect) {
            let instance = self.dialects.instantiate(dialect)?;
            // A racing handler may have inserted it first; that copy is
            // identical, so losing the race is fine.
            let _ = self
                .interpreters
                .insert(dialect, Interpreter::with_dialect(instance));
        }
        self.interpreters
            .edit(dialect, |interpreter| {
                interpreter.parse_program(text, line_delimiter)
            })
            .map_err(|_| CoreError::Internal("interpreter disappeared after insert"))?
            .map_err(Into::into)
    }

    /// Create an empty kernel; returns its id.
    pub fn create_kernel(&self) -> u64 {
        let id = self.kernels.insert(Kernel::new());
        debug!(kernel = id, "created kernel");
        id
    }

    /// Delete a kernel and every macro it owns.
    pub fn delete_kernel(&self, kernel_id: u64) -> bool {
        let deleted = self.kernels.erase(kernel_id);
        debug!(kernel = kernel_id, deleted, "deleted kernel");
        deleted
    }

    /// Compile `text` and append it to the kernel's macros; returns the new
    /// macro id.
    pub fn compile_macro(
        &self,
        kernel_id: u64,
        dialect: &str,
        text: &str,
        line_delimiter: u8,
    ) -> Result<u64> {
        let program = self.compile_program(dialect, text, line_delimiter)?;
        self.kernels
            .edit(kernel_id, |kernel| kernel.insert_macro(program))
            .map_err(|_| CoreError::KernelNotFound(kernel_id))
    }

    /// Fetch a compiled macro.
    pub fn macro_program(&self, kernel_id: u64, macro_id: u64) -> Option<Arc<Program>> {
        self.kernels
            .edit(kernel_id, |kernel| kernel.macro_program(macro_id))
            .ok()
            .flatten()
    }

    /// Create a system with the named state type; returns its id.
    pub fn create_system(&self, state_type: &str) -> Result<u64> {
        let store = self.state_types.instantiate(state_type)?;
        let id = self.systems.insert(QuantumSystem::new(store));
        debug!(system = id, state_type, "created system");
        Ok(id)
    }

    /// Delete a system and every state it owns.
    pub fn delete_system(&self, system_id: u64) -> bool {
        let deleted = self.systems.erase(system_id);
        debug!(system = system_id, deleted, "deleted system");
        deleted
    }

    /// Number of live states in a system, if the system exists.
    pub fn state_count(&self, system_id: u64) -> Option<usize> {
        self.systems
            .edit(system_id, |system| system.state_count())
            .ok()
    }

    /// Compile `text` and encode a fresh state in the named system; returns
    /// the new state id.
    ///
    /// Unlike the boolean operations below, a missing system here is an
    /// error: there is no id to return.
    pub fn create_state(
        &self,
        system_id: u64,
        dialect: &str,
        text: &str,
        line_delimiter: u8,
    ) -> Result<u64> {
        let program = self.compile_program(dialect, text, line_delimiter)?;
        self.systems
            .edit(system_id, |system| system.insert_state(self, &program))
            .map_err(|_| CoreError::SystemNotFound(system_id))?
    }

    /// Compile `text` and run it against a stored state, discarding
    /// measurement output. `Ok(false)` means the system or state was not
    /// found.
    pub fn modify_state(
        &self,
        system_id: u64,
        state_id: u64,
        dialect: &str,
        text: &str,
        line_delimiter: u8,
    ) -> Result<bool> {
        let program = self.compile_program(dialect, text, line_delimiter)?;
        match self
            .systems
            .edit(system_id, |system| system.modify_state(self, state_id, &program))
        {
            Ok(run) => run,
            Err(_) => Ok(false),
        }
    }

    /// Compile `text` and run it against a stored state, appending
    /// measurement bytes to `output`. `Ok(false)` means the system or state
    /// was not found.
    pub fn measure_state(
        &self,
        system_id: u64,
        state_id: u64,
        dialect: &str,
        text: &str,
        line_delimiter: u8,
        output: &mut Vec<u8>,
    ) -> Result<bool> {
        let program = self.compile_program(dialect, text, line_delimiter)?;
        match self.systems.edit(system_id, |system| {
            system.measure_state(self, state_id, &program, output)
        }) {
            Ok(run) => run,
            Err(_) => Ok(false),
        }
    }

    /// Drop a stored state. `false` means the system or state was not found.
    pub fn delete_state(&self, system_id: u64, state_id: u64) -> bool {
        self.systems
            .edit(system_id, |system| system.delete_state(state_id))
            .unwrap_or(false)
    }

    /// Compile `text` and run it against a throwaway state of the named
    /// system, appending measurement bytes to `output`. `Ok(false)` means
    /// the system was not found.
    pub fn compute_result(
        &self,
        system_id: u64,
        dialect: &str,
        text: &str,
        line_delimiter: u8,
        output: &mut Vec<u8>,
    ) -> Result<bool> {
        let program = self.compile_program(dialect, text, line_delimiter)?;
        match self.systems.edit(system_id, |system| {
            system.compute_result(self, &program, output)
        }) {
            Ok(run) => run.map(|()| true),
            Err(_) => Ok(false),
        }
    }
}

impl Default for Universe {
    fn default() -> Self {
        Self::new()
    }
}

/// Program execution reaches back into the universe for macro resolution and
/// measurement randomness. Both go through registries other than the state
/// registry the executor is running under, so the entry-lock invariant
/// holds.
impl ExecEnv for Universe {
    fn macro_program(&self, kernel_id: u64, macro_id: u64) -> sleipnir_chp::Result<Arc<Program>> {
        self.macro_program(kernel_id, macro_id)
            .ok_or(ChpError::MacroNotFound {
                kernel_id,
                macro_id,
            })
    }

    fn random_bit(&self) -> bool {
        self.generator.bit()
    }
}
