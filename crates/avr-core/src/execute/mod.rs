//! Instruction execution pipeline.
//!
//! Execution is split in two phases:
//! 1. Validate operands, compute the result and any effective address, and
//!    stage every side effect in an [`ExecuteState`].
//! 2. Commit the staged effects in a fixed order: data-memory write, pointer
//!    update, destination register, carry, cycle counter.
//!
//! Phase 1 never mutates, so a faulting instruction has no side effects.

mod flags;
mod helpers;

pub use flags::CarryUpdate;
pub use helpers::{compute_effective_address, PointerAccess};

use crate::timing::{cycle_cost, CycleCostKind};
use crate::{
    validate_bit, validate_data_address, validate_index, AddressingMode, CpuState, Fault,
    Instruction, MemorySpace, PointerPair, Register, TraceEvent, TraceSink,
};

/// Outcome of a retired instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecuteOutcome {
    /// Instruction retired and mutated state.
    Retired {
        /// Fixed cycle cost consumed.
        cycles: u16,
    },
    /// Predicate instruction retired without mutating registers or memory.
    Predicate {
        /// Predicate value (`cpi`: equal, `sbrs`: bit set).
        result: bool,
        /// Fixed cycle cost consumed.
        cycles: u16,
    },
}

impl ExecuteOutcome {
    /// Cycles consumed by the instruction.
    #[must_use]
    pub const fn cycles(self) -> u16 {
        match self {
            Self::Retired { cycles } | Self::Predicate { cycles, .. } => cycles,
        }
    }

    /// Predicate value, for compare and bit-test instructions.
    #[must_use]
    pub const fn predicate(self) -> Option<bool> {
        match self {
            Self::Retired { .. } => None,
            Self::Predicate { result, .. } => Some(result),
        }
    }
}

/// Side effects staged by [`execute_instruction`] and applied by [`commit_execution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecuteState {
    /// Destination register and the value to write.
    pub dest: Option<(Register, u8)>,
    /// Data-memory read performed while staging (address, value).
    pub memory_read: Option<(usize, u8)>,
    /// Data-memory write to commit (address, value).
    pub memory_write: Option<(usize, u8)>,
    /// Pointer pair rewrite to commit.
    pub pointer_update: Option<(PointerPair, u16)>,
    /// Carry flag change to commit.
    pub carry_update: CarryUpdate,
    /// Predicate result, for compare and bit-test instructions.
    pub predicate: Option<bool>,
    /// Cycle cost for this instruction.
    pub cycles: u16,
}

impl ExecuteState {
    /// Creates an empty staging record with the given cycle cost.
    #[must_use]
    pub fn new(cycles: u16) -> Self {
        Self {
            cycles,
            ..Self::default()
        }
    }

    /// Outcome reported once these effects are committed.
    #[must_use]
    pub const fn outcome(&self) -> ExecuteOutcome {
        match self.predicate {
            Some(result) => ExecuteOutcome::Predicate {
                result,
                cycles: self.cycles,
            },
            None => ExecuteOutcome::Retired {
                cycles: self.cycles,
            },
        }
    }
}

/// Validates `instr` against `state` and stages its side effects.
///
/// # Errors
///
/// Returns [`Fault::InvalidOperand`] when an operand is outside its subset and
/// [`Fault::IndexOutOfBounds`] when a pointer addresses past data memory.
/// `state` is never modified.
pub fn execute_instruction(instr: &Instruction, state: &CpuState) -> Result<ExecuteState, Fault> {
    let mut exec = ExecuteState::new(instruction_cycles(instr.cycle_kind()));

    match *instr {
        Instruction::Ldi { rd, k } => {
            let rd = Register::high(rd)?;
            exec.dest = Some((rd, k));
        }
        Instruction::Subi { rd, k } => {
            // Clamps at zero instead of borrowing.
            execute_immediate(state, &mut exec, rd, |value| value.saturating_sub(k))?;
        }
        Instruction::Clr { rd } => {
            let rd = Register::new(rd)?;
            exec.dest = Some((rd, 0));
        }
        Instruction::Ser { rd } => {
            let rd = Register::high(rd)?;
            exec.dest = Some((rd, 0xFF));
        }
        Instruction::Sbr { rd, mask } => {
            execute_immediate(state, &mut exec, rd, |value| value | mask)?;
        }
        Instruction::Sbci { rd, k } => {
            let carry = state.flags.carry_bit();
            execute_immediate(state, &mut exec, rd, |value| {
                value.wrapping_sub(k).wrapping_sub(carry)
            })?;
        }
        Instruction::Cpi { rd, k } => {
            let rd = Register::high(rd)?;
            exec.predicate = Some(state.register(rd) == k);
        }
        Instruction::Cbr { rd, mask } => {
            execute_immediate(state, &mut exec, rd, |value| value & (0xFF ^ mask))?;
        }
        Instruction::Andi { rd, k } => {
            execute_immediate(state, &mut exec, rd, |value| value & k)?;
        }
        Instruction::Mov { rd, rr } => {
            let rd = Register::new(rd)?;
            let rr = Register::new(rr)?;
            exec.dest = Some((rd, state.register(rr)));
        }
        Instruction::Ld { rd, ptr, mode } => execute_load(state, &mut exec, rd, ptr, mode)?,
        Instruction::St { ptr, rr, mode } => execute_store(state, &mut exec, ptr, rr, mode)?,
        Instruction::Sec => exec.carry_update = CarryUpdate::Set,
        Instruction::Clc => exec.carry_update = CarryUpdate::Clear,
        Instruction::Sbrs { rr, bit } => {
            let rr = Register::new(rr)?;
            let bit = validate_bit(bit)?;
            exec.predicate = Some((state.register(rr) >> bit) & 1 == 1);
        }
    }

    Ok(exec)
}

/// Applies staged side effects to `state`.
///
/// # Errors
///
/// Returns [`Fault::IndexOutOfBounds`] when the staged write lies outside
/// data memory. Nothing is applied in that case, including the cycle cost.
pub fn commit_execution(state: &mut CpuState, exec: &ExecuteState) -> Result<(), Fault> {
    if let Some((addr, _)) = exec.memory_write {
        validate_index(MemorySpace::Data, addr)?;
    }

    if let Some((addr, value)) = exec.memory_write {
        state.memory.bytes_mut(MemorySpace::Data)[addr] = value;
    }

    if let Some((pair, value)) = exec.pointer_update {
        state.set_pair(pair, value);
    }

    // Written after the pointer so `ld` into a pointer byte keeps the loaded value.
    if let Some((reg, value)) = exec.dest {
        state.set_register(reg, value);
    }

    let carry = exec.carry_update.apply(state.flags.carry());
    state.flags.set_carry(carry);

    state.cycles = state.cycles.wrapping_add(u64::from(exec.cycles));
    Ok(())
}

/// Validates, commits, and traces one instruction.
///
/// Trace events are dispatched only when the session was created with
/// tracing enabled.
///
/// # Errors
///
/// Propagates the fault from [`execute_instruction`] or
/// [`commit_execution`]; `state` is unchanged.
pub fn step_one(
    state: &mut CpuState,
    instruction: Instruction,
    mut trace: Option<&mut dyn TraceSink>,
) -> Result<ExecuteOutcome, Fault> {
    if !state.tracing_enabled {
        trace = None;
    }
    emit(&mut trace, TraceEvent::InstructionStart { instruction });

    let staged = execute_instruction(&instruction, state)
        .and_then(|exec| commit_execution(state, &exec).map(|()| exec));
    let exec = match staged {
        Ok(exec) => exec,
        Err(fault) => {
            tracing::debug!(%instruction, %fault, "instruction rejected");
            emit(&mut trace, TraceEvent::FaultRaised { fault });
            return Err(fault);
        }
    };

    emit_commit_events(&mut trace, &exec);

    let cycles = exec.cycles;
    tracing::trace!(%instruction, cycles, "instruction retired");
    emit(
        &mut trace,
        TraceEvent::InstructionRetired {
            mnemonic: instruction.mnemonic(),
            cycles,
        },
    );

    Ok(exec.outcome())
}

impl CpuState {
    /// Executes one instruction.
    ///
    /// # Errors
    ///
    /// Returns the validation fault; no state changes in that case.
    pub fn execute(&mut self, instruction: Instruction) -> Result<ExecuteOutcome, Fault> {
        step_one(self, instruction, None)
    }

    /// Executes one instruction, reporting trace events to `sink`.
    ///
    /// # Errors
    ///
    /// Returns the validation fault; no state changes in that case.
    pub fn execute_traced(
        &mut self,
        instruction: Instruction,
        sink: &mut dyn TraceSink,
    ) -> Result<ExecuteOutcome, Fault> {
        step_one(self, instruction, Some(sink))
    }
}

fn instruction_cycles(kind: CycleCostKind) -> u16 {
    cycle_cost(kind).unwrap_or(1)
}

fn execute_immediate(
    state: &CpuState,
    exec: &mut ExecuteState,
    rd: u8,
    op: impl FnOnce(u8) -> u8,
) -> Result<(), Fault> {
    let rd = Register::high(rd)?;
    exec.dest = Some((rd, op(state.register(rd))));
    Ok(())
}

fn execute_load(
    state: &CpuState,
    exec: &mut ExecuteState,
    rd: u8,
    ptr: u8,
    mode: AddressingMode,
) -> Result<(), Fault> {
    let rd = Register::new(rd)?;
    let pair = PointerPair::from_low(ptr)?;
    let access = compute_effective_address(state, pair, mode);
    let addr = validate_data_address(access.addr)?;

    let value = state.memory.bytes(MemorySpace::Data)[addr];
    exec.memory_read = Some((addr, value));
    exec.pointer_update = access.updated_pair.map(|updated| (pair, updated));
    exec.dest = Some((rd, value));
    Ok(())
}

fn execute_store(
    state: &CpuState,
    exec: &mut ExecuteState,
    ptr: u8,
    rr: u8,
    mode: AddressingMode,
) -> Result<(), Fault> {
    let pair = PointerPair::from_low(ptr)?;
    let rr = Register::new(rr)?;
    let access = compute_effective_address(state, pair, mode);
    let addr = validate_data_address(access.addr)?;

    exec.memory_write = Some((addr, state.register(rr)));
    exec.pointer_update = access.updated_pair.map(|updated| (pair, updated));
    Ok(())
}

fn emit(trace: &mut Option<&mut dyn TraceSink>, event: TraceEvent) {
    if let Some(sink) = trace.as_deref_mut() {
        sink.on_event(event);
    }
}

fn emit_commit_events(trace: &mut Option<&mut dyn TraceSink>, exec: &ExecuteState) {
    if let Some((index, value)) = exec.memory_read {
        emit(
            trace,
            TraceEvent::MemoryAccess {
                space: MemorySpace::Data,
                index,
                value,
                is_write: false,
            },
        );
    }
    if let Some((index, value)) = exec.memory_write {
        emit(
            trace,
            TraceEvent::MemoryAccess {
                space: MemorySpace::Data,
                index,
                value,
                is_write: true,
            },
        );
    }
    if let Some((pair, value)) = exec.pointer_update {
        emit(trace, TraceEvent::PointerUpdate { pair, value });
    }
    match exec.carry_update {
        CarryUpdate::None => {}
        CarryUpdate::Set => emit(trace, TraceEvent::CarryWrite { carry: true }),
        CarryUpdate::Clear => emit(trace, TraceEvent::CarryWrite { carry: false }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CoreConfig, FillPolicy, PointerStorage, SRAM_START, X_LOW, Y_LOW, Z_LOW};

    fn traced_state() -> CpuState {
        CpuState::with_config(&CoreConfig {
            tracing_enabled: true,
            fill: FillPolicy::Erased,
            ..CoreConfig::default()
        })
    }

    #[test]
    fn staging_leaves_state_untouched() {
        let mut state = CpuState::default();
        state.write_register(16, 40).expect("valid register");
        let before = state.clone();

        let exec = execute_instruction(&Instruction::Subi { rd: 16, k: 2 }, &state)
            .expect("valid operands");

        assert_eq!(state, before);
        assert_eq!(exec.dest, Some((Register::high(16).expect("high"), 38)));
        assert_eq!(exec.cycles, 1);
    }

    #[test]
    fn subi_saturates_at_zero() {
        let mut state = CpuState::default();
        state.write_register(17, 5).expect("valid register");

        state
            .execute(Instruction::Subi { rd: 17, k: 10 })
            .expect("valid operands");

        assert_eq!(state.read_register(17), Ok(0));
    }

    #[test]
    fn sbci_consumes_carry_and_wraps() {
        let mut state = CpuState::default();
        state.write_register(18, 5).expect("valid register");
        state.set_carry(true);

        state
            .execute(Instruction::Sbci { rd: 18, k: 10 })
            .expect("valid operands");

        assert_eq!(state.read_register(18), Ok(250));
        assert!(state.carry(), "sbci does not compute a borrow");
    }

    #[test]
    fn cbr_clears_only_masked_bits() {
        let mut state = CpuState::default();
        state.write_register(20, 0b1111_0000).expect("valid register");

        state
            .execute(Instruction::Cbr {
                rd: 20,
                mask: 0b1010_1010,
            })
            .expect("valid operands");

        assert_eq!(state.read_register(20), Ok(0b0101_0000));
    }

    #[test]
    fn cpi_and_sbrs_report_predicates_without_mutation() {
        let mut state = CpuState::default();
        state.write_register(16, 0x80).expect("valid register");
        let before = state.clone();

        let equal = state
            .execute(Instruction::Cpi { rd: 16, k: 0x80 })
            .expect("valid operands");
        let bit7 = state
            .execute(Instruction::Sbrs { rr: 16, bit: 7 })
            .expect("valid operands");
        let bit0 = state
            .execute(Instruction::Sbrs { rr: 16, bit: 0 })
            .expect("valid operands");

        assert_eq!(equal.predicate(), Some(true));
        assert_eq!(bit7.predicate(), Some(true));
        assert_eq!(bit0.predicate(), Some(false));
        assert_eq!(state.read_register(16), before.read_register(16));
        assert_eq!(state.memory(), before.memory());
    }

    #[test]
    fn sec_and_clc_write_carry() {
        let mut state = CpuState::default();
        state.execute(Instruction::Sec).expect("no operands");
        assert!(state.carry());
        state.execute(Instruction::Clc).expect("no operands");
        assert!(!state.carry());
    }

    #[test]
    fn ld_post_increment_reads_then_advances() {
        let mut state = CpuState::default();
        let addr = usize::from(SRAM_START);
        state.write_data_memory(addr, 0x11).expect("sram");
        state.write_pair(X_LOW, SRAM_START).expect("valid pair");

        state
            .execute(Instruction::Ld {
                rd: 0,
                ptr: X_LOW,
                mode: AddressingMode::PostIncrement,
            })
            .expect("in bounds");

        assert_eq!(state.read_register(0), Ok(0x11));
        assert_eq!(state.read_pair(X_LOW), Ok(SRAM_START + 1));
    }

    #[test]
    fn st_pre_decrement_steps_back_then_writes() {
        let mut state = CpuState::default();
        state.write_register(4, 0x77).expect("valid register");
        state.write_pair(Z_LOW, 0x0101).expect("valid pair");

        state
            .execute(Instruction::St {
                ptr: Z_LOW,
                rr: 4,
                mode: AddressingMode::PreDecrement,
            })
            .expect("in bounds");

        assert_eq!(state.read_data_memory(0x0100), Ok(0x77));
        assert_eq!(state.read_pair(Z_LOW), Ok(0x0100));
    }

    #[test]
    fn out_of_bounds_pointer_faults_without_moving_the_pointer() {
        let mut state = CpuState::default();
        state.write_pair(Y_LOW, 0xFFFF).expect("valid pair");
        let before = state.clone();

        let result = state.execute(Instruction::Ld {
            rd: 1,
            ptr: Y_LOW,
            mode: AddressingMode::PostIncrement,
        });

        assert!(matches!(result, Err(Fault::IndexOutOfBounds { index: 0xFFFF, .. })));
        assert_eq!(state, before);
    }

    #[test]
    fn ld_into_a_pointer_byte_keeps_the_loaded_value() {
        let mut state = CpuState::with_config(&CoreConfig {
            pointer_storage: PointerStorage::DataMemory,
            ..CoreConfig::default()
        });
        state.write_data_memory(0x0180, 0xAB).expect("sram");
        state.write_pair(X_LOW, 0x0180).expect("valid pair");

        state
            .execute(Instruction::Ld {
                rd: X_LOW,
                ptr: X_LOW,
                mode: AddressingMode::PostIncrement,
            })
            .expect("in bounds");

        assert_eq!(state.read_register(X_LOW), Ok(0xAB));
        assert_eq!(state.read_register(X_LOW + 1), Ok(0x01));
    }

    #[test]
    fn cycles_accumulate_per_retired_instruction() {
        let mut state = CpuState::default();
        state.write_pair(X_LOW, 0x0100).expect("valid pair");

        state.execute(Instruction::Ldi { rd: 16, k: 1 }).expect("valid");
        state
            .execute(Instruction::St {
                ptr: X_LOW,
                rr: 16,
                mode: AddressingMode::Indirect,
            })
            .expect("valid");
        let _ = state.execute(Instruction::Ldi { rd: 0, k: 1 });

        assert_eq!(state.cycles(), 3);
    }

    #[test]
    fn committing_an_out_of_range_write_is_rejected_whole() {
        let mut state = CpuState::default();
        let before = state.clone();
        let mut exec = ExecuteState::new(2);
        exec.memory_write = Some((0xFFFF, 0xAB));
        exec.dest = Some((Register::new(1).expect("valid register"), 0x11));
        exec.carry_update = CarryUpdate::Set;

        assert_eq!(
            commit_execution(&mut state, &exec),
            Err(Fault::IndexOutOfBounds {
                space: MemorySpace::Data,
                index: 0xFFFF,
                len: crate::DATA_MEMORY_BYTES,
            })
        );
        assert_eq!(state, before);
        assert_eq!(state.cycles(), 0);
    }

    #[test]
    fn committing_a_staged_record_applies_every_effect() {
        let mut state = CpuState::default();
        state.write_register(7, 0x3C).expect("valid register");
        state.write_pair(X_LOW, 0x0150).expect("valid pair");
        let store = Instruction::St {
            ptr: X_LOW,
            rr: 7,
            mode: AddressingMode::PostIncrement,
        };

        let exec = execute_instruction(&store, &state).expect("in bounds");
        commit_execution(&mut state, &exec).expect("staged by the pipeline");

        assert_eq!(state.read_data_memory(0x0150), Ok(0x3C));
        assert_eq!(state.read_pair(X_LOW), Ok(0x0151));
        assert_eq!(state.cycles(), 2);
    }

    #[test]
    fn trace_reports_events_in_commit_order() {
        let mut state = traced_state();
        state.write_register(5, 0x42).expect("valid register");
        state.write_pair(Z_LOW, 0x0100).expect("valid pair");
        let mut events: Vec<TraceEvent> = Vec::new();

        let store = Instruction::St {
            ptr: Z_LOW,
            rr: 5,
            mode: AddressingMode::PostIncrement,
        };
        state.execute_traced(store, &mut events).expect("in bounds");

        assert_eq!(
            events,
            vec![
                TraceEvent::InstructionStart { instruction: store },
                TraceEvent::MemoryAccess {
                    space: MemorySpace::Data,
                    index: 0x0100,
                    value: 0x42,
                    is_write: true,
                },
                TraceEvent::PointerUpdate {
                    pair: PointerPair::Z,
                    value: 0x0101,
                },
                TraceEvent::InstructionRetired {
                    mnemonic: "st",
                    cycles: 2,
                },
            ]
        );
    }

    #[test]
    fn trace_reports_faults() {
        let mut state = traced_state();
        let mut events: Vec<TraceEvent> = Vec::new();

        let ldi = Instruction::Ldi { rd: 5, k: 10 };
        let fault = state
            .execute_traced(ldi, &mut events)
            .expect_err("r5 is not a high register");

        assert_eq!(
            events,
            vec![
                TraceEvent::InstructionStart { instruction: ldi },
                TraceEvent::FaultRaised { fault },
            ]
        );
    }

    #[test]
    fn trace_is_silent_when_disabled() {
        let mut state = CpuState::default();
        let mut events: Vec<TraceEvent> = Vec::new();

        state
            .execute_traced(Instruction::Sec, &mut events)
            .expect("no operands");

        assert!(events.is_empty());
        assert!(state.carry());
    }
}
