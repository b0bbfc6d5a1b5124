//! The CHP stabilizer state type.

use sleipnir_chp::{ExecEnv, Executor, Tableau};
use sleipnir_lang::Program;
use sleipnir_registry::Registry;

use crate::error::Result;
use crate::state::StateType;

/// Registered name of the representation.
pub(crate) const NAME: &str = "chp_state";

/// Stabilizer tableaux addressed by state id.
///
/// Program execution runs under the state's registry entry lock, so two
/// programs against the same state serialize while programs against
/// different states of the same system run in parallel.
pub struct ChpStates {
    states: Registry<Tableau>,
}

impl ChpStates {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            states: Registry::new(),
        }
    }
}

impl Default for ChpStates {
    fn default() -> Self {
        Self::new()
    }
}

impl StateType for ChpStates {
    fn name(&self) -> &'static str {
        NAME
    }

    fn state_count(&self) -> usize {
        self.states.len()
    }

    fn insert_state(&self, env: &dyn ExecEnv, program: &Program) -> Result<u64> {
        let state = Executor::new(env).encode(program)?;
        Ok(self.states.insert(state))
    }

    fn modify_state(&self, env: &dyn ExecEnv, state_id: u64, program: &Program) -> Result<bool> {
        let executor = Executor::new(env);
        match self.states.edit(state_id, |state| executor.modify(state, program)) {
            Ok(run) => run.map(|()| true).map_err(Into::into),
            Err(_) => Ok(false),
        }
    }

    fn measure_state(
        &self,
        env: &dyn ExecEnv,
        state_id: u64,
        program: &Program,
        output: &mut Vec<u8>,
    ) -> Result<bool> {
        let executor = Executor::new(env);
        match self
            .states
            .edit(state_id, |state| executor.measure(state, program, output))
        {
            Ok(run) => run.map(|()| true).map_err(Into::into),
            Err(_) => Ok(false),
        }
    }

    fn compute_result(
        &self,
        env: &dyn ExecEnv,
        program: &Program,
        output: &mut Vec<u8>,
    ) -> Result<()> {
        Executor::new(env).compute(program, output)?;
        Ok(())
    }

    fn delete_state(&self, state_id: u64) -> bool {
        self.states.erase(state_id)
    }
}
