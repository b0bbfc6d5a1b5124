//! End-to-end tests of universe operations.

use sleipnir_core::{CoreError, Generator, Universe};

fn seeded(seed: u64) -> Universe {
    Universe::with_generator(Generator::from_seed(seed))
}

#[test]
fn kernel_lifecycle() {
    let universe = seeded(1);
    let kernel = universe.create_kernel();
    assert!(kernel >= 1);

    let first = universe
        .compile_macro(kernel, "chpext", "h 0\nm 0\n", b'\n')
        .unwrap();
    let second = universe
        .compile_macro(kernel, "chpext", "x 0\n", b'\n')
        .unwrap();
    assert!(first >= 1);
    assert!(second > first);

    assert!(universe.delete_kernel(kernel));
    assert!(!universe.delete_kernel(kernel));
}

#[test]
fn compile_macro_into_missing_kernel() {
    let universe = seeded(1);
    assert!(matches!(
        universe.compile_macro(42, "chpext", "h 0\n", b'\n'),
        Err(CoreError::KernelNotFound(42))
    ));
}

#[test]
fn compile_program_rejects_unknown_dialect() {
    let universe = seeded(1);
    assert!(matches!(
        universe.compile_program("qasm", "h 0\n", b'\n'),
        Err(CoreError::Lang(_))
    ));
}

#[test]
fn compile_program_reports_parse_failures() {
    let universe = seeded(1);
    assert!(matches!(
        universe.compile_program("chpext", "frobnicate 0\n", b'\n'),
        Err(CoreError::Lang(_))
    ));
}

#[test]
fn system_and_state_lifecycle() {
    let universe = seeded(2);
    let system = universe.create_system("chp_state").unwrap();
    assert_eq!(universe.state_count(system), Some(0));

    let state = universe
        .create_state(system, "chpext", "init 2\nx 0\n", b'\n')
        .unwrap();
    assert_eq!(universe.state_count(system), Some(1));

    let mut output = Vec::new();
    assert!(universe
        .measure_state(system, state, "chpext", "m 0\nm 1\n", b'\n', &mut output)
        .unwrap());
    assert_eq!(output, b"10");

    assert!(universe
        .modify_state(system, state, "chpext", "x 1\n", b'\n')
        .unwrap());
    let mut output = Vec::new();
    assert!(universe
        .measure_state(system, state, "chpext", "m 1\n", b'\n', &mut output)
        .unwrap());
    assert_eq!(output, b"1");

    assert!(universe.delete_state(system, state));
    assert!(!universe.delete_state(system, state));
    assert_eq!(universe.state_count(system), Some(0));

    assert!(universe.delete_system(system));
    assert!(!universe.delete_system(system));
}

#[test]
fn unknown_state_type_is_an_error() {
    let universe = seeded(2);
    assert!(matches!(
        universe.create_system("density_matrix"),
        Err(CoreError::UnknownStateType(_))
    ));
}

#[test]
fn missing_system_outcomes() {
    let universe = seeded(3);

    assert!(matches!(
        universe.create_state(9, "chpext", "init 1\n", b'\n'),
        Err(CoreError::SystemNotFound(9))
    ));
    assert!(!universe
        .modify_state(9, 1, "chpext", "x 0\n", b'\n')
        .unwrap());
    let mut output = Vec::new();
    assert!(!universe
        .measure_state(9, 1, "chpext", "m 0\n", b'\n', &mut output)
        .unwrap());
    assert!(!universe
        .compute_result(9, "chpext", "init 1\nm 0\n", b'\n', &mut output)
        .unwrap());
    assert!(!universe.delete_state(9, 1));
    assert!(output.is_empty());
    assert_eq!(universe.state_count(9), None);
}

#[test]
fn compute_result_deterministic_programs() {
    let universe = seeded(4);
    let system = universe.create_system("chp_state").unwrap();

    let mut output = Vec::new();
    assert!(universe
        .compute_result(system, "chpext", "init 3\nm 0\nm 1\nm 2\n", b'\n', &mut output)
        .unwrap());
    assert_eq!(output, b"000");

    let mut output = Vec::new();
    assert!(universe
        .compute_result(system, "chpext", "init 1\nx 0\nm 0\n", b'\n', &mut output)
        .unwrap());
    assert_eq!(output, b"1");

    // compute_result never stores a state
    assert_eq!(universe.state_count(system), Some(0));
}

#[test]
fn compute_result_epr_pair_statistics() {
    let universe = seeded(0xE9);
    let system = universe.create_system("chp_state").unwrap();

    let mut ones = 0_usize;
    for _ in 0..1000 {
        let mut output = Vec::new();
        assert!(universe
            .compute_result(
                system,
                "chpext",
                "init 2\nh 0\nc 0,1\nm 0\nm 1\n",
                b'\n',
                &mut output,
            )
            .unwrap());
        assert_eq!(output.len(), 2);
        assert_eq!(output[0], output[1]);
        if output[0] == b'1' {
            ones += 1;
        }
    }
    let mean = ones as f64 / 1000.0;
    assert!((0.4..=0.6).contains(&mean), "marginal {mean} out of range");
}

#[test]
fn macros_execute_through_state_programs() {
    let universe = seeded(5);
    let kernel = universe.create_kernel();
    let flip = universe
        .compile_macro(kernel, "chpext", "x 0\n", b'\n')
        .unwrap();

    let system = universe.create_system("chp_state").unwrap();
    let mut output = Vec::new();
    let text = format!("init 1\nmacro {kernel},{flip}\nm 0\n");
    assert!(universe
        .compute_result(system, "chpext", &text, b'\n', &mut output)
        .unwrap());
    assert_eq!(output, b"1");
}

#[test]
fn macro_into_deleted_kernel_fails() {
    let universe = seeded(6);
    let kernel = universe.create_kernel();
    let id = universe
        .compile_macro(kernel, "chpext", "x 0\n", b'\n')
        .unwrap();
    universe.delete_kernel(kernel);

    let system = universe.create_system("chp_state").unwrap();
    let text = format!("init 1\nmacro {kernel},{id}\nm 0\n");
    let err = universe
        .compute_result(system, "chpext", &text, b'\n', &mut Vec::new())
        .unwrap_err();
    assert!(matches!(err, CoreError::Chp(_)));
}

#[test]
fn recursive_macros_are_bounded() {
    let universe = seeded(7);
    let kernel = universe.create_kernel();
    // The macro calls itself: ids are assigned monotonically from 1, so the
    // first macro in a fresh kernel gets id 1 and can name itself.
    let id = universe
        .compile_macro(kernel, "chpext", format!("macro {kernel},1\n").as_str(), b'\n')
        .unwrap();
    assert_eq!(id, 1);

    let system = universe.create_system("chp_state").unwrap();
    let text = format!("init 1\nmacro {kernel},{id}\n");
    let err = universe
        .compute_result(system, "chpext", &text, b'\n', &mut Vec::new())
        .unwrap_err();
    assert!(matches!(
        err,
        CoreError::Chp(sleipnir_chp::ChpError::MacroDepthExceeded(_))
    ));
}

#[test]
fn generator_draws_are_seed_stable() {
    let a = seeded(1234);
    let b = seeded(1234);
    for _ in 0..20 {
        assert_eq!(
            a.generator().uniform_integer(0, 100).unwrap(),
            b.generator().uniform_integer(0, 100).unwrap()
        );
    }
}
