//! State types: the storage facades quantum systems are built from.

mod chp;

pub use chp::ChpStates;

use rustc_hash::FxHashMap;

use sleipnir_chp::ExecEnv;
use sleipnir_lang::Program;

use crate::error::{CoreError, Result};

/// A store of quantum states of one representation, driven by compiled
/// programs.
///
/// Implementations own their state registry; callers address individual
/// states by the ids handed out by [`StateType::insert_state`]. Operations
/// that reference a missing state report `false` rather than failing, so the
/// RPC layer can map them onto its documented boolean results.
pub trait StateType: Send + Sync {
    /// The registered name of the representation.
    fn name(&self) -> &'static str;

    /// Number of live states.
    fn state_count(&self) -> usize;

    /// Encode a fresh state by running `program` and store it. Returns the
    /// new state id.
    fn insert_state(&self, env: &dyn ExecEnv, program: &Program) -> Result<u64>;

    /// Run `program` against the state under `state_id`, discarding
    /// measurement output. `Ok(false)` means no such state.
    fn modify_state(&self, env: &dyn ExecEnv, state_id: u64, program: &Program) -> Result<bool>;

    /// Run `program` against the state under `state_id`, appending
    /// measurement bytes to `output`. `Ok(false)` means no such state.
    fn measure_state(
        &self,
        env: &dyn ExecEnv,
        state_id: u64,
        program: &Program,
        output: &mut Vec<u8>,
    ) -> Result<bool>;

    /// Run `program` against a throwaway state, appending measurement bytes
    /// to `output`.
    fn compute_result(
        &self,
        env: &dyn ExecEnv,
        program: &Program,
        output: &mut Vec<u8>,
    ) -> Result<()>;

    /// Drop the state under `state_id`. Returns `false` if no such state.
    fn delete_state(&self, state_id: u64) -> bool;
}

/// Process-wide table of state-type builders, indexed by type name.
///
/// Populated once at startup; read-only afterwards.
pub struct StateTypeFactory {
    builders: FxHashMap<&'static str, fn() -> Box<dyn StateType>>,
}

impl StateTypeFactory {
    /// Create a factory holding every built-in state type.
    pub fn with_builtins() -> Self {
        let mut builders: FxHashMap<&'static str, fn() -> Box<dyn StateType>> =
            FxHashMap::default();
        builders.insert(chp::NAME, || Box::new(ChpStates::new()));
        Self { builders }
    }

    /// Construct a fresh store for the named representation.
    pub fn instantiate(&self, name: &str) -> Result<Box<dyn StateType>> {
        self.builders
            .get(name)
            .map(|builder| builder())
            .ok_or_else(|| CoreError::UnknownStateType(name.to_owned()))
    }

    /// Whether `name` is a registered state type.
    pub fn contains(&self, name: &str) -> bool {
        self.builders.contains_key(name)
    }
}

impl Default for StateTypeFactory {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_builtins() {
        let factory = StateTypeFactory::with_builtins();
        assert!(factory.contains("chp_state"));
        let store = factory.instantiate("chp_state").unwrap();
        assert_eq!(store.name(), "chp_state");
        assert_eq!(store.state_count(), 0);
    }

    #[test]
    fn test_unknown_state_type() {
        let factory = StateTypeFactory::with_builtins();
        assert!(matches!(
            factory.instantiate("density_matrix"),
            Err(CoreError::UnknownStateType(_))
        ));
    }
}
