//! Instruction handlers and the fetch-decode-execute engine.
//!
//! Each handler reads its operand bytes at `PC+1`/`PC+2` and is fully
//! responsible for its own program-counter update: straight-line
//! instructions advance by their declared length, control transfer
//! overwrites the counter outright.

use crate::fault::Fault;
use crate::machine::Machine;
use crate::opcode::Opcode;
use crate::output::OutputSink;
use crate::state::{Condition, Register, RunState};

/// Outcome of one fetch-decode-execute cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepOutcome {
    /// Instruction retired; the machine is still running.
    Retired,
    /// The machine is halted (clean terminal state).
    Halted,
    /// The machine is faulted (error terminal state).
    Faulted(Fault),
}

/// Aggregated outcome of running until a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunOutcome {
    /// Instructions retired during this run call, including the final
    /// `HLT`. A faulting fetch does not retire.
    pub steps: u64,
    /// Terminal step outcome that stopped the loop.
    pub final_step: StepOutcome,
}

/// Executes one fetch-decode-execute cycle.
///
/// A machine already in a terminal state is left untouched: nothing is
/// fetched and the terminal outcome is reported back. The dispatch
/// presence check runs before any handler is invoked; a byte outside the
/// instruction set latches [`Fault::UnknownOpcode`].
pub fn step_one(machine: &mut Machine, output: &mut dyn OutputSink) -> StepOutcome {
    match machine.run_state {
        RunState::Halted => return StepOutcome::Halted,
        RunState::Faulted(cause) => return StepOutcome::Faulted(cause),
        RunState::Running => {}
    }

    let pc = machine.pc;
    let byte = machine.memory.read(pc);

    let Some(opcode) = Opcode::from_u8(byte) else {
        let cause = Fault::UnknownOpcode { opcode: byte, pc };
        machine.run_state = RunState::Faulted(cause);
        return StepOutcome::Faulted(cause);
    };

    execute_instruction(opcode, machine, output);

    match machine.run_state {
        RunState::Running => StepOutcome::Retired,
        RunState::Halted => StepOutcome::Halted,
        RunState::Faulted(cause) => StepOutcome::Faulted(cause),
    }
}

/// Runs the fetch-decode-execute loop until the machine halts or faults.
///
/// A program that never halts and never faults is valid; this call will
/// simply not return for it.
pub fn run_to_completion(machine: &mut Machine, output: &mut dyn OutputSink) -> RunOutcome {
    let mut steps: u64 = 0;
    loop {
        let was_running = machine.run_state == RunState::Running;
        let outcome = step_one(machine, output);
        match outcome {
            StepOutcome::Retired => steps += 1,
            StepOutcome::Halted => {
                if was_running {
                    steps += 1;
                }
                return RunOutcome {
                    steps,
                    final_step: outcome,
                };
            }
            StepOutcome::Faulted(_) => {
                return RunOutcome {
                    steps,
                    final_step: outcome,
                };
            }
        }
    }
}

fn execute_instruction(opcode: Opcode, machine: &mut Machine, output: &mut dyn OutputSink) {
    match opcode {
        Opcode::Hlt => execute_hlt(machine),
        Opcode::Ret => execute_ret(machine),
        Opcode::Push => execute_push(machine),
        Opcode::Pop => execute_pop(machine),
        Opcode::Prn => execute_prn(machine, output),
        Opcode::Call => execute_call(machine),
        Opcode::Jmp => execute_jmp(machine),
        Opcode::Jeq => execute_jeq(machine),
        Opcode::Jne => execute_jne(machine),
        Opcode::Ldi => execute_ldi(machine),
        Opcode::Add => execute_alu(machine, AluOp::Add),
        Opcode::Sub => execute_alu(machine, AluOp::Sub),
        Opcode::Mul => execute_alu(machine, AluOp::Mul),
        Opcode::Cmp => execute_cmp(machine),
    }
}

#[derive(Debug, Clone, Copy)]
enum AluOp {
    Add,
    Sub,
    Mul,
}

/// Reads the operand byte at `PC + offset`.
fn operand(machine: &Machine, offset: u8) -> u8 {
    machine.memory.read(machine.pc.wrapping_add(offset))
}

fn register_operand(machine: &Machine) -> Register {
    Register::from_operand(operand(machine, 1))
}

fn register_pair_operands(machine: &Machine) -> (Register, Register) {
    (
        Register::from_operand(operand(machine, 1)),
        Register::from_operand(operand(machine, 2)),
    )
}

/// Pre-decrements `SP` and stores `value` at the new top of stack.
fn push_byte(machine: &mut Machine, value: u8) {
    let sp = machine.registers.sp().wrapping_sub(1);
    machine.registers.set_sp(sp);
    machine.memory.write(sp, value);
}

/// Loads the top of stack and post-increments `SP`.
fn pop_byte(machine: &mut Machine) -> u8 {
    let sp = machine.registers.sp();
    let value = machine.memory.read(sp);
    machine.registers.set_sp(sp.wrapping_add(1));
    value
}

fn execute_hlt(machine: &mut Machine) {
    machine.pc = machine.pc.wrapping_add(1);
    machine.run_state = RunState::Halted;
}

fn execute_ldi(machine: &mut Machine) {
    let reg = register_operand(machine);
    let imm = operand(machine, 2);
    machine.registers.set(reg, imm);
    machine.pc = machine.pc.wrapping_add(3);
}

fn execute_prn(machine: &mut Machine, output: &mut dyn OutputSink) {
    let reg = register_operand(machine);
    output.write_value(machine.registers.get(reg));
    machine.pc = machine.pc.wrapping_add(2);
}

fn execute_alu(machine: &mut Machine, op: AluOp) {
    let (reg_a, reg_b) = register_pair_operands(machine);
    let a = machine.registers.get(reg_a);
    let b = machine.registers.get(reg_b);
    let result = match op {
        AluOp::Add => a.wrapping_add(b),
        AluOp::Sub => a.wrapping_sub(b),
        AluOp::Mul => a.wrapping_mul(b),
    };
    machine.registers.set(reg_a, result);
    machine.pc = machine.pc.wrapping_add(3);
}

fn execute_push(machine: &mut Machine) {
    let reg = register_operand(machine);
    let value = machine.registers.get(reg);
    push_byte(machine, value);
    machine.pc = machine.pc.wrapping_add(2);
}

fn execute_pop(machine: &mut Machine) {
    let reg = register_operand(machine);
    let value = pop_byte(machine);
    machine.registers.set(reg, value);
    machine.pc = machine.pc.wrapping_add(2);
}

fn execute_call(machine: &mut Machine) {
    let reg = register_operand(machine);
    let return_addr = machine.pc.wrapping_add(2);
    push_byte(machine, return_addr);
    machine.pc = machine.registers.get(reg);
}

fn execute_ret(machine: &mut Machine) {
    machine.pc = pop_byte(machine);
}

fn execute_cmp(machine: &mut Machine) {
    let (reg_a, reg_b) = register_pair_operands(machine);
    machine.condition = Some(Condition::from_compare(
        machine.registers.get(reg_a),
        machine.registers.get(reg_b),
    ));
    machine.pc = machine.pc.wrapping_add(3);
}

fn execute_jmp(machine: &mut Machine) {
    let reg = register_operand(machine);
    machine.pc = machine.registers.get(reg);
}

fn execute_jeq(machine: &mut Machine) {
    let reg = register_operand(machine);
    if machine.condition == Some(Condition::Equal) {
        machine.pc = machine.registers.get(reg);
    } else {
        machine.pc = machine.pc.wrapping_add(2);
    }
}

fn execute_jne(machine: &mut Machine) {
    let reg = register_operand(machine);
    if machine.condition == Some(Condition::Equal) {
        machine.pc = machine.pc.wrapping_add(2);
    } else {
        machine.pc = machine.registers.get(reg);
    }
}
