//! Named instruction entry points.
//!
//! Each function builds an [`Instruction`] and runs it through the execute
//! pipeline, so validation, trace hooks, and cycle accounting match
//! [`CpuState::execute`].

use crate::{AddressingMode, CpuState, Fault, Instruction, PointerPair};

fn retire(state: &mut CpuState, instruction: Instruction) -> Result<(), Fault> {
    state.execute(instruction).map(|_| ())
}

fn predicate(state: &mut CpuState, instruction: Instruction) -> Result<bool, Fault> {
    state
        .execute(instruction)
        .map(|outcome| outcome.predicate().unwrap_or(false))
}

/// `ldi Rd, K`: `Rd := K`.
///
/// # Errors
///
/// [`Fault::InvalidOperand`] unless `rd` is in `16..=31`.
pub fn ldi(state: &mut CpuState, rd: u8, k: u8) -> Result<(), Fault> {
    retire(state, Instruction::Ldi { rd, k })
}

/// `subi Rd, K`: `Rd := max(0, Rd - K)`.
///
/// # Errors
///
/// [`Fault::InvalidOperand`] unless `rd` is in `16..=31`.
pub fn subi(state: &mut CpuState, rd: u8, k: u8) -> Result<(), Fault> {
    retire(state, Instruction::Subi { rd, k })
}

/// `clr Rd`: `Rd := 0`.
///
/// # Errors
///
/// [`Fault::InvalidOperand`] unless `rd` is in `0..=31`.
pub fn clr(state: &mut CpuState, rd: u8) -> Result<(), Fault> {
    retire(state, Instruction::Clr { rd })
}

/// `ser Rd`: `Rd := 0xFF`.
///
/// # Errors
///
/// [`Fault::InvalidOperand`] unless `rd` is in `16..=31`.
pub fn ser(state: &mut CpuState, rd: u8) -> Result<(), Fault> {
    retire(state, Instruction::Ser { rd })
}

/// `sbr Rd, K`: `Rd := Rd | K`.
///
/// # Errors
///
/// [`Fault::InvalidOperand`] unless `rd` is in `16..=31`.
pub fn sbr(state: &mut CpuState, rd: u8, mask: u8) -> Result<(), Fault> {
    retire(state, Instruction::Sbr { rd, mask })
}

/// `sbci Rd, K`: `Rd := Rd - K - C`, modulo 256.
///
/// # Errors
///
/// [`Fault::InvalidOperand`] unless `rd` is in `16..=31`.
pub fn sbci(state: &mut CpuState, rd: u8, k: u8) -> Result<(), Fault> {
    retire(state, Instruction::Sbci { rd, k })
}

/// `cpi Rd, K`: returns `Rd == K`.
///
/// # Errors
///
/// [`Fault::InvalidOperand`] unless `rd` is in `16..=31`.
pub fn cpi(state: &mut CpuState, rd: u8, k: u8) -> Result<bool, Fault> {
    predicate(state, Instruction::Cpi { rd, k })
}

/// `cbr Rd, K`: `Rd := Rd & !K`.
///
/// # Errors
///
/// [`Fault::InvalidOperand`] unless `rd` is in `16..=31`.
pub fn cbr(state: &mut CpuState, rd: u8, mask: u8) -> Result<(), Fault> {
    retire(state, Instruction::Cbr { rd, mask })
}

/// `andi Rd, K`: `Rd := Rd & K`.
///
/// # Errors
///
/// [`Fault::InvalidOperand`] unless `rd` is in `16..=31`.
pub fn andi(state: &mut CpuState, rd: u8, k: u8) -> Result<(), Fault> {
    retire(state, Instruction::Andi { rd, k })
}

/// `mov Rd, Rr`: `Rd := Rr`.
///
/// # Errors
///
/// [`Fault::InvalidOperand`] unless both registers are in `0..=31`.
pub fn mov(state: &mut CpuState, rd: u8, rr: u8) -> Result<(), Fault> {
    retire(state, Instruction::Mov { rd, rr })
}

/// `ld Rd, X`: `Rd := DataMemory[pair]`.
///
/// # Errors
///
/// [`Fault::InvalidOperand`] for a bad register or pointer low byte;
/// [`Fault::IndexOutOfBounds`] when the pair points past data memory.
pub fn ld(state: &mut CpuState, rd: u8, ptr: u8) -> Result<(), Fault> {
    ld_with(state, rd, ptr, AddressingMode::Indirect)
}

/// `ld Rd, X+` / `ld Rd, -X`: load with a pointer side effect.
///
/// # Errors
///
/// As [`ld`]; the pointer is left untouched on error.
pub fn ld_with(state: &mut CpuState, rd: u8, ptr: u8, mode: AddressingMode) -> Result<(), Fault> {
    retire(state, Instruction::Ld { rd, ptr, mode })
}

/// `st X, Rr`: `DataMemory[pair] := Rr`.
///
/// # Errors
///
/// [`Fault::InvalidOperand`] for a bad register or pointer low byte;
/// [`Fault::IndexOutOfBounds`] when the pair points past data memory.
pub fn st(state: &mut CpuState, ptr: u8, rr: u8) -> Result<(), Fault> {
    st_with(state, ptr, rr, AddressingMode::Indirect)
}

/// `st X+, Rr` / `st -X, Rr`: store with a pointer side effect.
///
/// # Errors
///
/// As [`st`]; the pointer is left untouched on error.
pub fn st_with(state: &mut CpuState, ptr: u8, rr: u8, mode: AddressingMode) -> Result<(), Fault> {
    retire(state, Instruction::St { ptr, rr, mode })
}

/// `sec`: sets carry.
///
/// # Errors
///
/// Never fails; the `Result` keeps the signature uniform.
pub fn sec(state: &mut CpuState) -> Result<(), Fault> {
    retire(state, Instruction::Sec)
}

/// `clc`: clears carry.
///
/// # Errors
///
/// Never fails; the `Result` keeps the signature uniform.
pub fn clc(state: &mut CpuState) -> Result<(), Fault> {
    retire(state, Instruction::Clc)
}

/// `sbrs` condition: returns whether bit `bit` of `Rr` is set.
///
/// # Errors
///
/// [`Fault::InvalidOperand`] for a register outside `0..=31` or a bit above 7.
pub fn bit_is_set(state: &mut CpuState, rr: u8, bit: u8) -> Result<bool, Fault> {
    predicate(state, Instruction::Sbrs { rr, bit })
}

/// Post-increments the pair whose low byte is `low_index`, returning the old value.
///
/// Standalone pointer operations are not instructions and emit no trace events.
///
/// # Errors
///
/// [`Fault::InvalidOperand`] unless `low_index` is 26, 28 or 30.
pub fn post_increment(state: &mut CpuState, low_index: u8) -> Result<u16, Fault> {
    let pair = PointerPair::from_low(low_index)?;
    Ok(state.post_increment(pair))
}

/// Pre-decrements the pair whose low byte is `low_index`, returning the new value.
///
/// # Errors
///
/// [`Fault::InvalidOperand`] unless `low_index` is 26, 28 or 30.
pub fn pre_decrement(state: &mut CpuState, low_index: u8) -> Result<u16, Fault> {
    let pair = PointerPair::from_low(low_index)?;
    Ok(state.pre_decrement(pair))
}

/// `X+`.
pub fn x_post_increment(state: &mut CpuState) -> u16 {
    state.post_increment(PointerPair::X)
}

/// `Y+`.
pub fn y_post_increment(state: &mut CpuState) -> u16 {
    state.post_increment(PointerPair::Y)
}

/// `Z+`.
pub fn z_post_increment(state: &mut CpuState) -> u16 {
    state.post_increment(PointerPair::Z)
}

/// `-X`.
pub fn x_pre_decrement(state: &mut CpuState) -> u16 {
    state.pre_decrement(PointerPair::X)
}

/// `-Y`.
pub fn y_pre_decrement(state: &mut CpuState) -> u16 {
    state.pre_decrement(PointerPair::Y)
}

/// `-Z`.
pub fn z_pre_decrement(state: &mut CpuState) -> u16 {
    state.pre_decrement(PointerPair::Z)
}
