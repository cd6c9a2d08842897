use thiserror::Error;

use crate::MemorySpace;

/// Operand subsets an instruction or accessor can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum OperandKind {
    /// Any general-purpose register (`r0..=r31`).
    Register,
    /// Upper register half accepted by immediate forms (`r16..=r31`).
    HighRegister,
    /// Low byte of a pointer pair (`r26`, `r28`, `r30`).
    PointerLow,
    /// Bit position within an octet (`0..=7`).
    BitIndex,
}

impl OperandKind {
    /// Human-readable description of the accepted operand range.
    #[must_use]
    pub const fn accepted_range(self) -> &'static str {
        match self {
            Self::Register => "r0..=r31",
            Self::HighRegister => "r16..=r31",
            Self::PointerLow => "r26, r28 or r30",
            Self::BitIndex => "0..=7",
        }
    }
}

/// Coarse fault classes used for aggregation and policy decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum FaultKind {
    /// An operand failed its range or subset constraint.
    InvalidOperand,
    /// A computed address fell outside its memory space.
    IndexOutOfBounds,
}

/// Faults raised by state accessors and instruction execution.
///
/// Every fault is raised before any state is mutated, so a faulting call
/// has no observable effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Fault {
    /// Operand outside its declared subset.
    #[error("operand {value} is not a valid {kind:?} operand (expected {})", .kind.accepted_range())]
    InvalidOperand {
        /// Subset the operand had to belong to.
        kind: OperandKind,
        /// Raw operand value that was rejected.
        value: u8,
    },
    /// Address outside the valid range of a memory space.
    #[error("index {index:#06x} is out of bounds for {space} ({len} bytes)")]
    IndexOutOfBounds {
        /// Memory space that was addressed.
        space: MemorySpace,
        /// Rejected byte index.
        index: usize,
        /// Size of the addressed space in bytes.
        len: usize,
    },
}

impl Fault {
    /// Shorthand for an [`Fault::InvalidOperand`] fault.
    #[must_use]
    pub const fn invalid_operand(kind: OperandKind, value: u8) -> Self {
        Self::InvalidOperand { kind, value }
    }

    /// Returns the coarse fault class.
    #[must_use]
    pub const fn kind(self) -> FaultKind {
        match self {
            Self::InvalidOperand { .. } => FaultKind::InvalidOperand,
            Self::IndexOutOfBounds { .. } => FaultKind::IndexOutOfBounds,
        }
    }
}
