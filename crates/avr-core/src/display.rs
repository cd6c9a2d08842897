//! Human-readable renderings of register contents.

use crate::{CpuState, Fault};

/// Formats register `index` as eight binary digits, most significant bit first.
///
/// # Errors
///
/// Returns [`Fault::InvalidOperand`] when `index` is not in `0..=31`.
pub fn format_register_binary(state: &CpuState, index: u8) -> Result<String, Fault> {
    let value = state.read_register(index)?;
    Ok(format!("{value:08b}"))
}
