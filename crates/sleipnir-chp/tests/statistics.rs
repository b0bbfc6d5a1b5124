//! Statistical tests driving the engine with a seeded random source.

use std::cell::RefCell;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sleipnir_chp::{ChpError, ExecEnv, Executor};
use sleipnir_lang::{Interpreter, Program};

/// Environment backed by a seeded PRNG, without any stored macros.
struct SeededEnv {
    rng: RefCell<StdRng>,
}

impl SeededEnv {
    fn new(seed: u64) -> Self {
        Self {
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl ExecEnv for SeededEnv {
    fn macro_program(&self, kernel_id: u64, macro_id: u64) -> Result<Arc<Program>, ChpError> {
        Err(ChpError::MacroNotFound {
            kernel_id,
            macro_id,
        })
    }

    fn random_bit(&self) -> bool {
        self.rng.borrow_mut().gen()
    }
}

fn parse(text: &str) -> Program {
    Interpreter::new("chpext")
        .unwrap()
        .parse_program(text, b'\n')
        .unwrap()
}

#[test]
fn hadamard_measurement_is_unbiased() {
    const TRIALS: usize = 10_000;

    let env = SeededEnv::new(0xC0FFEE);
    let executor = Executor::new(&env);
    let program = parse("init 1\nh 0\nm 0\n");

    let mut ones = 0_usize;
    for _ in 0..TRIALS {
        let mut output = Vec::new();
        executor.compute(&program, &mut output).unwrap();
        assert_eq!(output.len(), 1);
        match output[0] {
            b'1' => ones += 1,
            b'0' => {}
            other => panic!("unexpected measurement byte {other}"),
        }
    }

    let mean = ones as f64 / TRIALS as f64;
    assert!((0.45..=0.55).contains(&mean), "mean {mean} out of range");
}

#[test]
fn epr_pair_measurements_agree() {
    const TRIALS: usize = 1_000;

    let env = SeededEnv::new(0xBEEF);
    let executor = Executor::new(&env);
    let program = parse("init 2\nh 0\nc 0,1\nm 0\nm 1\n");

    let mut ones = 0_usize;
    for _ in 0..TRIALS {
        let mut output = Vec::new();
        executor.compute(&program, &mut output).unwrap();
        assert_eq!(output.len(), 2);
        assert_eq!(output[0], output[1], "EPR halves must agree");
        assert!(output[0] == b'0' || output[0] == b'1');
        if output[0] == b'1' {
            ones += 1;
        }
    }

    let mean = ones as f64 / TRIALS as f64;
    assert!((0.4..=0.6).contains(&mean), "marginal {mean} out of range");
}

#[test]
fn ghz_state_measurements_agree() {
    const TRIALS: usize = 500;

    let env = SeededEnv::new(7);
    let executor = Executor::new(&env);
    let program = parse("init 3\nh 0\nc 0,1\nc 1,2\nm 0\nm 1\nm 2\n");

    for _ in 0..TRIALS {
        let mut output = Vec::new();
        executor.compute(&program, &mut output).unwrap();
        assert!(output == b"000" || output == b"111");
    }
}
