//! Helper functions for instruction execution.

use crate::{AddressingMode, CpuState, PointerPair};

/// Address used by a pointer access plus the pair value left behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerAccess {
    /// Data-memory address the access targets.
    pub addr: u16,
    /// New pair value to commit, for auto-modifying modes.
    pub updated_pair: Option<u16>,
}

/// Computes the effective address for `pair` under `mode` without mutating state.
///
/// Mirrors [`CpuState::post_increment`] and [`CpuState::pre_decrement`] so
/// the pointer update can be staged and dropped if the access faults.
#[must_use]
pub fn compute_effective_address(
    state: &CpuState,
    pair: PointerPair,
    mode: AddressingMode,
) -> PointerAccess {
    let current = state.pair(pair);
    match mode {
        AddressingMode::Indirect => PointerAccess {
            addr: current,
            updated_pair: None,
        },
        AddressingMode::PostIncrement => PointerAccess {
            addr: current,
            updated_pair: Some(current.wrapping_add(1)),
        },
        AddressingMode::PreDecrement => {
            let decremented = current.wrapping_sub(1);
            PointerAccess {
                addr: decremented,
                updated_pair: Some(decremented),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{compute_effective_address, PointerAccess};
    use crate::{AddressingMode, CpuState, PointerPair};

    #[test]
    fn staged_addresses_match_the_mutating_pointer_operations() {
        for mode in [
            AddressingMode::Indirect,
            AddressingMode::PostIncrement,
            AddressingMode::PreDecrement,
        ] {
            let mut state = CpuState::default();
            state.set_pair(PointerPair::Y, 0x0200);
            let staged = compute_effective_address(&state, PointerPair::Y, mode);

            let addr = match mode {
                AddressingMode::Indirect => state.pair(PointerPair::Y),
                AddressingMode::PostIncrement => state.post_increment(PointerPair::Y),
                AddressingMode::PreDecrement => state.pre_decrement(PointerPair::Y),
            };

            assert_eq!(staged.addr, addr);
            assert_eq!(
                staged.updated_pair.unwrap_or(0x0200),
                state.pair(PointerPair::Y)
            );
        }
    }

    #[test]
    fn staging_does_not_touch_the_pair() {
        let mut state = CpuState::default();
        state.set_pair(PointerPair::X, 0);

        let staged =
            compute_effective_address(&state, PointerPair::X, AddressingMode::PreDecrement);

        assert_eq!(
            staged,
            PointerAccess {
                addr: u16::MAX,
                updated_pair: Some(u16::MAX),
            }
        );
        assert_eq!(state.pair(PointerPair::X), 0);
    }
}
