//! Quantum systems.

use sleipnir_chp::ExecEnv;
use sleipnir_lang::Program;

use crate::error::Result;
use crate::state::StateType;

/// A discrete quantum system: one named state representation plus its store
/// of live states.
pub struct QuantumSystem {
    state_type: Box<dyn StateType>,
}

impl QuantumSystem {
    /// Wrap an instantiated state type.
    pub fn new(state_type: Box<dyn StateType>) -> Self {
        Self { state_type }
    }

    /// Name of the system's state representation.
    pub fn state_type_name(&self) -> &'static str {
        self.state_type.name()
    }

    /// Number of live states.
    pub fn state_count(&self) -> usize {
        self.state_type.state_count()
    }

    /// Encode and store a fresh state; returns its id.
    pub fn insert_state(&self, env: &dyn ExecEnv, program: &Program) -> Result<u64> {
        self.state_type.insert_state(env, program)
    }

    /// Run a program against a stored state, discarding measurement output.
    pub fn modify_state(&self, env: &dyn ExecEnv, state_id: u64, program: &Program) -> Result<bool> {
        self.state_type.modify_state(env, state_id, program)
    }

    /// Run a program against a stored state, retaining measurement output.
    pub fn measure_state(
        &self,
        env: &dyn ExecEnv,
        state_id: u64,
        program: &Program,
        output: &mut Vec<u8>,
    ) -> Result<bool> {
        self.state_type.measure_state(env, state_id, program, output)
    }

    /// Run a program against a throwaway state, retaining measurement output.
    pub fn compute_result(
        &self,
        env: &dyn ExecEnv,
        program: &Program,
        output: &mut Vec<u8>,
    ) -> Result<()> {
        self.state_type.compute_result(env, program, output)
    }

    /// Drop a stored state.
    pub fn delete_state(&self, state_id: u64) -> bool {
        self.state_type.delete_state(state_id)
    }
}
