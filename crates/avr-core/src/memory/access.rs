//! Bounds policy helpers shared by every memory space.

use crate::{Fault, MemorySpace};

/// Validates that `index` addresses a byte inside `space`.
///
/// # Errors
///
/// Returns [`Fault::IndexOutOfBounds`] when `index >= space.len()`.
pub const fn validate_index(space: MemorySpace, index: usize) -> Result<(), Fault> {
    let len = space.len();
    if index < len {
        Ok(())
    } else {
        Err(Fault::IndexOutOfBounds { space, index, len })
    }
}

/// Validates a 16-bit pointer value as a data-memory address.
///
/// Pointer pairs span 64 KiB while data memory is far smaller, so this is
/// the check every indirect load and store goes through.
///
/// # Errors
///
/// Returns [`Fault::IndexOutOfBounds`] when `addr` lies past the end of SRAM.
pub const fn validate_data_address(addr: u16) -> Result<usize, Fault> {
    let index = addr as usize;
    match validate_index(MemorySpace::Data, index) {
        Ok(()) => Ok(index),
        Err(fault) => Err(fault),
    }
}
