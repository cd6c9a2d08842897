//! AVR-compatible 8-bit core state model.
//!
//! The core owns three byte-addressed spaces (data memory, flash, EEPROM),
//! exposes the 32 general-purpose registers as the bottom of data memory,
//! composes the X/Y/Z pointer pairs from register-indexed bytes, and executes
//! a small ALU/load/store instruction subset with operand validation.

/// Memory spaces, region map, and fill policies.
pub mod memory;
pub use memory::{
    decode_data_region, validate_data_address, validate_index, DataRegion, FillPolicy,
    MemoryImage, MemorySpace, RegionDescriptor, SnapshotLayoutError, DATA_MEMORY_BYTES,
    DATA_MEMORY_REGIONS, DEFAULT_FILL_SEED, EEPROM_BYTES, ERASED_BYTE, FLASH_BYTES, IO_BYTES,
    IO_END, IO_START, REGISTERS_END, REGISTERS_START, REGISTER_FILE_BYTES, SRAM_BYTES, SRAM_END,
    SRAM_START,
};

/// Fault taxonomy for rejected operands and out-of-range accesses.
pub mod fault;
pub use fault::{Fault, FaultKind, OperandKind};

/// Architectural register, pointer-pair, and flag model.
pub mod state;
pub use state::{
    validate_bit, PointerPair, PointerStorage, Register, StatusFlags, GENERAL_REGISTER_COUNT,
    HIGH_REGISTER_FIRST, REGISTER_BITS, SREG_ACTIVE_MASK, SREG_C, X_HIGH, X_LOW, Y_HIGH, Y_LOW,
    Z_HIGH, Z_LOW,
};

/// Public host-facing API contract and integration types.
pub mod api;
pub use api::{CoreConfig, CpuState, TraceEvent, TraceSink};

/// Instruction values and assembler rendering.
pub mod instruction;
pub use instruction::{AddressingMode, Instruction};

/// Deterministic instruction cycle-cost table and lookup helpers.
pub mod timing;
pub use timing::{cycle_cost, CycleCostKind, CYCLE_COST_TABLE};

/// Instruction execution pipeline.
pub mod execute;
pub use execute::{
    commit_execution, compute_effective_address, execute_instruction, step_one, CarryUpdate,
    ExecuteOutcome, ExecuteState, PointerAccess,
};

/// Named instruction entry points.
pub mod ops;
pub use ops::{
    andi, bit_is_set, cbr, clc, clr, cpi, ld, ld_with, ldi, mov, post_increment, pre_decrement,
    sbci, sbr, sec, ser, st, st_with, subi, x_post_increment, x_pre_decrement, y_post_increment,
    y_pre_decrement, z_post_increment, z_pre_decrement,
};

/// Register rendering helpers.
pub mod display;
pub use display::format_register_binary;

#[cfg(test)]
use proptest as _;
