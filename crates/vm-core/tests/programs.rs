//! Whole-program tests driving the machine through the public API.

#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

use proptest::prelude::*;
use rstest::rstest;

use vm_core::{
    run_to_completion, CaptureSink, Machine, Opcode, Register, RunState, StepOutcome, SP_INITIAL,
};

const LDI: u8 = Opcode::Ldi.as_u8();
const PRN: u8 = Opcode::Prn.as_u8();
const HLT: u8 = Opcode::Hlt.as_u8();
const ADD: u8 = Opcode::Add.as_u8();
const SUB: u8 = Opcode::Sub.as_u8();
const MUL: u8 = Opcode::Mul.as_u8();
const PUSH: u8 = Opcode::Push.as_u8();
const POP: u8 = Opcode::Pop.as_u8();
const CALL: u8 = Opcode::Call.as_u8();
const RET: u8 = Opcode::Ret.as_u8();
const CMP: u8 = Opcode::Cmp.as_u8();
const JEQ: u8 = Opcode::Jeq.as_u8();
const JNE: u8 = Opcode::Jne.as_u8();

/// Loads a program and runs it to a terminal state, returning the machine
/// and everything it printed.
fn run_program(program: &[u8]) -> (Machine, CaptureSink) {
    let mut machine = Machine::new();
    machine.load_image(program).expect("program fits in memory");
    let mut sink = CaptureSink::new();
    run_to_completion(&mut machine, &mut sink);
    (machine, sink)
}

#[test]
fn print_a_constant() {
    let (machine, sink) = run_program(&[LDI, 0, 8, PRN, 0, HLT]);

    assert_eq!(sink.as_text(), "8\n");
    assert_eq!(machine.run_state, RunState::Halted);
}

#[test]
fn multiply_and_print() {
    let (machine, sink) = run_program(&[LDI, 0, 5, LDI, 1, 6, MUL, 0, 1, PRN, 0, HLT]);

    assert_eq!(sink.as_text(), "30\n");
    assert_eq!(machine.run_state, RunState::Halted);
}

#[test]
fn addition_wraps_past_the_byte_width() {
    let (machine, sink) = run_program(&[LDI, 0, 200, LDI, 1, 100, ADD, 0, 1, PRN, 0, HLT]);

    assert_eq!(sink.as_text(), "44\n");
    assert_eq!(machine.run_state, RunState::Halted);
}

#[test]
fn subroutine_prints_before_its_caller() {
    // 0:  LDI R0,10
    // 3:  LDI R1,13   (subroutine address)
    // 6:  CALL R1     (return address 8)
    // 8:  PRN R0
    // 10: HLT
    // 13: LDI R2,99
    // 16: PRN R2
    // 18: RET
    let program = [
        LDI, 0, 10, LDI, 1, 13, CALL, 1, PRN, 0, HLT, 0, 0, LDI, 2, 99, PRN, 2, RET,
    ];
    let (machine, sink) = run_program(&program);

    assert_eq!(sink.values, vec![99, 10]);
    assert_eq!(machine.run_state, RunState::Halted);
    assert_eq!(machine.registers.sp(), SP_INITIAL);
}

#[test]
fn equal_branch_prints_the_sentinel() {
    // 0:  LDI R0,5
    // 3:  LDI R1,5
    // 6:  LDI R2,19   (jump target)
    // 9:  CMP R0,R1
    // 12: JEQ R2      (taken)
    // 14: LDI R3,1    (skipped)
    // 17: PRN R3      (skipped)
    // 19: LDI R3,42
    // 22: PRN R3
    // 24: HLT
    let program = [
        LDI, 0, 5, LDI, 1, 5, LDI, 2, 19, CMP, 0, 1, JEQ, 2, LDI, 3, 1, PRN, 3, LDI, 3, 42, PRN,
        3, HLT,
    ];
    let (machine, sink) = run_program(&program);

    assert_eq!(sink.as_text(), "42\n");
    assert_eq!(machine.run_state, RunState::Halted);
}

#[test]
fn unknown_opcode_stops_execution_at_the_fault() {
    let (machine, sink) = run_program(&[LDI, 0, 1, 0b1111_1111, PRN, 0, HLT]);

    assert!(machine.run_state.latched_fault().is_some());
    assert!(sink.values.is_empty());
    assert_eq!(machine.registers.get(Register::R0), 1);
}

/// Compares `a` with `b`, then executes the given conditional jump. The
/// fall-through path prints 1 and halts; the jump target prints 42 and
/// halts.
fn branch_program(jump: u8, a: u8, b: u8) -> Vec<u8> {
    vec![
        LDI, 0, a, //       0
        LDI, 1, b, //       3
        LDI, 2, 21, //      6: jump target
        CMP, 0, 1, //       9
        jump, 2, //        12
        LDI, 3, 1, //      14: fall-through path
        PRN, 3, //         17
        HLT, //            19
        0, //              20 (padding)
        LDI, 3, 42, //     21: jump target path
        PRN, 3, //         24
        HLT, //            26
    ]
}

#[rstest]
#[case::equal_taken(5, 5, true)]
#[case::less_falls_through(4, 5, false)]
#[case::greater_falls_through(6, 5, false)]
fn jeq_is_taken_exactly_when_equal(#[case] a: u8, #[case] b: u8, #[case] taken: bool) {
    let (machine, sink) = run_program(&branch_program(JEQ, a, b));

    let expected = if taken { "42\n" } else { "1\n" };
    assert_eq!(sink.as_text(), expected);
    assert_eq!(machine.run_state, RunState::Halted);
}

#[rstest]
#[case::equal_falls_through(7, 7, false)]
#[case::less_taken(1, 7, true)]
#[case::greater_taken(9, 7, true)]
fn jne_is_taken_exactly_when_not_equal(#[case] a: u8, #[case] b: u8, #[case] taken: bool) {
    let (machine, sink) = run_program(&branch_program(JNE, a, b));

    let expected = if taken { "42\n" } else { "1\n" };
    assert_eq!(sink.as_text(), expected);
    assert_eq!(machine.run_state, RunState::Halted);
}

proptest! {
    #[test]
    fn add_matches_wrapping_semantics_for_all_operands(a: u8, b: u8) {
        let (machine, sink) = run_program(&[LDI, 0, a, LDI, 1, b, ADD, 0, 1, PRN, 0, HLT]);

        prop_assert_eq!(sink.as_text(), format!("{}\n", a.wrapping_add(b)));
        prop_assert_eq!(machine.run_state, RunState::Halted);
    }

    #[test]
    fn sub_matches_wrapping_semantics_for_all_operands(a: u8, b: u8) {
        let (_, sink) = run_program(&[LDI, 0, a, LDI, 1, b, SUB, 0, 1, PRN, 0, HLT]);

        prop_assert_eq!(sink.as_text(), format!("{}\n", a.wrapping_sub(b)));
    }

    #[test]
    fn mul_matches_wrapping_semantics_for_all_operands(a: u8, b: u8) {
        let (_, sink) = run_program(&[LDI, 0, a, LDI, 1, b, MUL, 0, 1, PRN, 0, HLT]);

        prop_assert_eq!(sink.as_text(), format!("{}\n", a.wrapping_mul(b)));
    }

    #[test]
    fn push_then_pop_roundtrips_any_value(v: u8) {
        let (machine, _) = run_program(&[LDI, 0, v, PUSH, 0, POP, 1, HLT]);

        prop_assert_eq!(machine.registers.get(Register::R1), v);
        prop_assert_eq!(machine.registers.sp(), SP_INITIAL);
    }
}

#[test]
fn halting_is_reported_as_a_clean_terminal_step() {
    let mut machine = Machine::new();
    machine.load_image(&[HLT]).expect("program fits in memory");
    let mut sink = CaptureSink::new();

    let outcome = run_to_completion(&mut machine, &mut sink);

    assert_eq!(outcome.final_step, StepOutcome::Halted);
    assert_eq!(outcome.steps, 1);
}
