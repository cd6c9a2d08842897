//! Architectural register and flag model.

/// Status flag storage.
pub mod flags;
/// Register indices, pointer pairs, and operand validation.
pub mod registers;
/// Register file view over the memory spaces.
pub mod view;

pub use flags::{StatusFlags, SREG_ACTIVE_MASK, SREG_C};
pub use registers::{
    validate_bit, PointerPair, PointerStorage, Register, GENERAL_REGISTER_COUNT,
    HIGH_REGISTER_FIRST, REGISTER_BITS, X_HIGH, X_LOW, Y_HIGH, Y_LOW, Z_HIGH, Z_LOW,
};
