//! Bytecode execution against a tableau.

use std::sync::Arc;

use sleipnir_lang::{Opcode, Program};

use crate::error::{ChpError, Result};
use crate::tableau::Tableau;

/// Default bound on nested `macro` invocations.
pub const DEFAULT_MACRO_DEPTH: usize = 256;

/// What the executor needs from its surroundings: stored macro programs and
/// measurement randomness.
///
/// The universe implements this over its kernel registry and its random
/// generator. Implementations must not touch the state registry entry the
/// executor is currently running under, or they deadlock on its entry mutex.
pub trait ExecEnv {
    /// Resolve a `macro` instruction to its compiled program.
    fn macro_program(&self, kernel_id: u64, macro_id: u64) -> Result<Arc<Program>>;

    /// One fair coin flip for a random measurement outcome.
    fn random_bit(&self) -> bool;
}

/// An environment with no stored macros and a coin that always lands on 0.
///
/// Good enough for programs that use neither `macro` instructions nor
/// superposed measurements, which covers documentation examples and most
/// tests.
pub struct EmptyEnv;

impl ExecEnv for EmptyEnv {
    fn macro_program(&self, kernel_id: u64, macro_id: u64) -> Result<Arc<Program>> {
        Err(ChpError::MacroNotFound {
            kernel_id,
            macro_id,
        })
    }

    fn random_bit(&self) -> bool {
        false
    }
}

/// Runs compiled programs against tableaux in the four operation modes.
pub struct Executor<'a, E: ExecEnv + ?Sized> {
    env: &'a E,
    macro_depth: usize,
}

impl<'a, E: ExecEnv + ?Sized> Executor<'a, E> {
    /// Create an executor with the default macro depth limit.
    pub fn new(env: &'a E) -> Self {
        Self::with_macro_depth(env, DEFAULT_MACRO_DEPTH)
    }

    /// Create an executor with an explicit macro depth limit.
    pub fn with_macro_depth(env: &'a E, macro_depth: usize) -> Self {
        Self { env, macro_depth }
    }

    /// Encode mode: run `program` from the empty tableau and return the
    /// resulting state. Measurement output is discarded.
    pub fn encode(&self, program: &Program) -> Result<Tableau> {
        let mut state = Tableau::empty();
        let mut discard = Vec::new();
        self.run(&mut state, program, &mut discard, 0)?;
        Ok(state)
    }

    /// Modify mode: run `program` against an existing state, discarding
    /// measurement output.
    pub fn modify(&self, state: &mut Tableau, program: &Program) -> Result<()> {
        let mut discard = Vec::new();
        self.run(state, program, &mut discard, 0)
    }

    /// Measure mode: run `program` against an existing state, appending one
    /// ASCII `'0'` or `'1'` byte to `output` per `measure` instruction.
    pub fn measure(
        &self,
        state: &mut Tableau,
        program: &Program,
        output: &mut Vec<u8>,
    ) -> Result<()> {
        self.run(state, program, output, 0)
    }

    /// Compute mode: run `program` against a throwaway state, retaining the
    /// measurement output.
    pub fn compute(&self, program: &Program, output: &mut Vec<u8>) -> Result<()> {
        let mut state = Tableau::empty();
        self.run(&mut state, program, output, 0)
    }

    fn run(
        &self,
        state: &mut Tableau,
        program: &Program,
        output: &mut Vec<u8>,
        depth: usize,
    ) -> Result<()> {
        for instruction in program {
            let ops = instruction.operands;
            match instruction.opcode {
                Opcode::Macro => {
                    if depth >= self.macro_depth {
                        return Err(ChpError::MacroDepthExceeded(self.macro_depth));
                    }
                    let nested = self.env.macro_program(ops[0], ops[1])?;
                    self.run(state, &nested, output, depth + 1)?;
                }
                Opcode::Initialize => {
                    let n = usize::try_from(ops[0]).map_err(|_| ChpError::Allocation)?;
                    // Release the old tableau before allocating the new one;
                    // on failure the state stays empty.
                    *state = Tableau::empty();
                    *state = Tableau::new(n)?;
                }
                Opcode::Identity => {}
                Opcode::Hadamard => state.hadamard(ops[0])?,
                Opcode::Phase => state.phase(ops[0])?,
                Opcode::Measure => {
                    let bit = state.measure(ops[0], || self.env.random_bit())?;
                    output.push(b'0' + u8::from(bit));
                }
                Opcode::Cnot => state.cnot(ops[0], ops[1])?,
                Opcode::PauliX => state.pauli_x(ops[0])?,
                Opcode::PauliY => state.pauli_y(ops[0])?,
                Opcode::PauliZ => state.pauli_z(ops[0])?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sleipnir_lang::Interpreter;

    fn parse(text: &str) -> Program {
        Interpreter::new("chpext")
            .unwrap()
            .parse_program(text, b'\n')
            .unwrap()
    }

    #[test]
    fn test_deterministic_zero() {
        let mut output = Vec::new();
        Executor::new(&EmptyEnv)
            .compute(&parse("init 3\nm 0\nm 1\nm 2\n"), &mut output)
            .unwrap();
        assert_eq!(output, b"000");
    }

    #[test]
    fn test_bit_flip_program() {
        let mut output = Vec::new();
        Executor::new(&EmptyEnv)
            .compute(&parse("init 1\nx 0\nm 0\n"), &mut output)
            .unwrap();
        assert_eq!(output, b"1");
    }

    #[test]
    fn test_encode_then_measure() {
        let executor = Executor::new(&EmptyEnv);
        let mut state = executor.encode(&parse("init 2\nx 1\n")).unwrap();
        assert_eq!(state.num_qubits(), 2);

        let mut output = Vec::new();
        executor
            .measure(&mut state, &parse("m 0\nm 1\n"), &mut output)
            .unwrap();
        assert_eq!(output, b"01");
    }

    #[test]
    fn test_encode_discards_measurements() {
        let executor = Executor::new(&EmptyEnv);
        let state = executor.encode(&parse("init 2\nm 0\nm 1\n")).unwrap();
        assert_eq!(state.num_qubits(), 2);
    }

    #[test]
    fn test_modify_keeps_state() {
        let executor = Executor::new(&EmptyEnv);
        let mut state = executor.encode(&parse("init 1\n")).unwrap();
        executor.modify(&mut state, &parse("x 0\n")).unwrap();

        let mut output = Vec::new();
        executor
            .measure(&mut state, &parse("m 0\n"), &mut output)
            .unwrap();
        assert_eq!(output, b"1");
    }

    #[test]
    fn test_reinitialize_replaces_state() {
        let executor = Executor::new(&EmptyEnv);
        let mut state = executor.encode(&parse("init 1\nx 0\n")).unwrap();
        executor.modify(&mut state, &parse("init 4\n")).unwrap();
        assert_eq!(state.num_qubits(), 4);

        let mut output = Vec::new();
        executor
            .measure(&mut state, &parse("m 0\n"), &mut output)
            .unwrap();
        assert_eq!(output, b"0");
    }

    #[test]
    fn test_gate_before_initialize_fails() {
        let err = Executor::new(&EmptyEnv)
            .compute(&parse("h 0\n"), &mut Vec::new())
            .unwrap_err();
        assert!(matches!(err, ChpError::QubitOutOfRange { .. }));
    }

    #[test]
    fn test_identity_is_a_no_op() {
        let executor = Executor::new(&EmptyEnv);
        let mut state = executor.encode(&parse("init 2\n")).unwrap();
        let snapshot = state.clone();
        executor.modify(&mut state, &parse("i 0\ni 1\n")).unwrap();
        assert_eq!(state, snapshot);
    }

    #[test]
    fn test_missing_macro() {
        let err = Executor::new(&EmptyEnv)
            .compute(&parse("init 1\nmacro 1,1\n"), &mut Vec::new())
            .unwrap_err();
        assert!(matches!(err, ChpError::MacroNotFound { .. }));
    }

    struct SelfCallingEnv {
        program: Arc<Program>,
    }

    impl ExecEnv for SelfCallingEnv {
        fn macro_program(&self, _kernel_id: u64, _macro_id: u64) -> Result<Arc<Program>> {
            Ok(Arc::clone(&self.program))
        }

        fn random_bit(&self) -> bool {
            false
        }
    }

    #[test]
    fn test_macro_recursion_is_bounded() {
        let env = SelfCallingEnv {
            program: Arc::new(parse("macro 1,1\n")),
        };
        let executor = Executor::with_macro_depth(&env, 16);
        let err = executor
            .compute(&parse("init 1\nmacro 1,1\n"), &mut Vec::new())
            .unwrap_err();
        assert_eq!(err, ChpError::MacroDepthExceeded(16));
    }

    #[test]
    fn test_macro_expansion() {
        struct OneMacro {
            program: Arc<Program>,
        }
        impl ExecEnv for OneMacro {
            fn macro_program(&self, kernel_id: u64, macro_id: u64) -> Result<Arc<Program>> {
                if kernel_id == 1 && macro_id == 1 {
                    Ok(Arc::clone(&self.program))
                } else {
                    Err(ChpError::MacroNotFound {
                        kernel_id,
                        macro_id,
                    })
                }
            }
            fn random_bit(&self) -> bool {
                false
            }
        }

        let env = OneMacro {
            program: Arc::new(parse("x 0\nm 0\n")),
        };
        let mut output = Vec::new();
        Executor::new(&env)
            .compute(&parse("init 1\nmacro 1,1\nmacro 1,1\n"), &mut output)
            .unwrap();
        // Two macro calls, each flipping and measuring: 1 then back to 0.
        assert_eq!(output, b"10");
    }
}
