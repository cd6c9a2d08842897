//! Named instruction values with raw operand fields.
//!
//! Operands are carried exactly as a front end would supply them; range
//! checks happen when the instruction is executed, not when it is built.

use std::fmt;

use crate::timing::CycleCostKind;
use crate::PointerPair;

/// Pointer addressing forms for `ld` and `st`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum AddressingMode {
    /// `X`: use the pair as-is.
    #[default]
    Indirect,
    /// `X+`: use the pair, then increment it.
    PostIncrement,
    /// `-X`: decrement the pair, then use it.
    PreDecrement,
}

/// One instruction of the modeled subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Instruction {
    /// `ldi Rd, K`: load immediate.
    Ldi {
        /// Destination, `r16..=r31`.
        rd: u8,
        /// Immediate value.
        k: u8,
    },
    /// `subi Rd, K`: subtract immediate, saturating at zero.
    Subi {
        /// Destination, `r16..=r31`.
        rd: u8,
        /// Immediate subtrahend.
        k: u8,
    },
    /// `clr Rd`: clear register.
    Clr {
        /// Destination, `r0..=r31`.
        rd: u8,
    },
    /// `ser Rd`: set all bits.
    Ser {
        /// Destination, `r16..=r31`.
        rd: u8,
    },
    /// `sbr Rd, K`: set bits in register.
    Sbr {
        /// Destination, `r16..=r31`.
        rd: u8,
        /// Bits to set.
        mask: u8,
    },
    /// `sbci Rd, K`: subtract immediate with carry, wrapping modulo 256.
    Sbci {
        /// Destination, `r16..=r31`.
        rd: u8,
        /// Immediate subtrahend.
        k: u8,
    },
    /// `cpi Rd, K`: compare with immediate (predicate only).
    Cpi {
        /// Register compared, `r16..=r31`.
        rd: u8,
        /// Immediate compared against.
        k: u8,
    },
    /// `cbr Rd, K`: clear bits in register.
    Cbr {
        /// Destination, `r16..=r31`.
        rd: u8,
        /// Bits to clear.
        mask: u8,
    },
    /// `andi Rd, K`: logical AND with immediate.
    Andi {
        /// Destination, `r16..=r31`.
        rd: u8,
        /// Immediate operand.
        k: u8,
    },
    /// `mov Rd, Rr`: copy register.
    Mov {
        /// Destination, `r0..=r31`.
        rd: u8,
        /// Source, `r0..=r31`.
        rr: u8,
    },
    /// `ld Rd, X|X+|-X`: load from data memory through a pointer pair.
    Ld {
        /// Destination, `r0..=r31`.
        rd: u8,
        /// Low byte of the pointer pair (26, 28 or 30).
        ptr: u8,
        /// Pointer side effect.
        mode: AddressingMode,
    },
    /// `st X|X+|-X, Rr`: store to data memory through a pointer pair.
    St {
        /// Low byte of the pointer pair (26, 28 or 30).
        ptr: u8,
        /// Source, `r0..=r31`.
        rr: u8,
        /// Pointer side effect.
        mode: AddressingMode,
    },
    /// `sec`: set carry.
    Sec,
    /// `clc`: clear carry.
    Clc,
    /// `sbrs Rr, b`: skip condition, reported as a predicate.
    Sbrs {
        /// Register tested, `r0..=r31`.
        rr: u8,
        /// Bit position, `0..=7`.
        bit: u8,
    },
}

impl Instruction {
    /// Assembler mnemonic.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Ldi { .. } => "ldi",
            Self::Subi { .. } => "subi",
            Self::Clr { .. } => "clr",
            Self::Ser { .. } => "ser",
            Self::Sbr { .. } => "sbr",
            Self::Sbci { .. } => "sbci",
            Self::Cpi { .. } => "cpi",
            Self::Cbr { .. } => "cbr",
            Self::Andi { .. } => "andi",
            Self::Mov { .. } => "mov",
            Self::Ld { .. } => "ld",
            Self::St { .. } => "st",
            Self::Sec => "sec",
            Self::Clc => "clc",
            Self::Sbrs { .. } => "sbrs",
        }
    }

    /// Returns `true` for instructions that report a predicate instead of
    /// mutating state.
    #[must_use]
    pub const fn is_predicate(self) -> bool {
        matches!(self, Self::Cpi { .. } | Self::Sbrs { .. })
    }

    /// Cycle-cost class used for timing lookups.
    #[must_use]
    pub const fn cycle_kind(self) -> CycleCostKind {
        match self {
            Self::Ldi { .. }
            | Self::Subi { .. }
            | Self::Clr { .. }
            | Self::Ser { .. }
            | Self::Sbr { .. }
            | Self::Sbci { .. }
            | Self::Cpi { .. }
            | Self::Cbr { .. }
            | Self::Andi { .. } => CycleCostKind::Alu,
            Self::Mov { .. } => CycleCostKind::Mov,
            Self::Ld { .. } => CycleCostKind::Load,
            Self::St { .. } => CycleCostKind::Store,
            Self::Sec | Self::Clc => CycleCostKind::FlagWrite,
            Self::Sbrs { .. } => CycleCostKind::SkipTest,
        }
    }
}

struct PointerOperand {
    ptr: u8,
    mode: AddressingMode,
}

impl fmt::Display for PointerOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = PointerPair::from_low(self.ptr).map_or("?", PointerPair::name);
        match self.mode {
            AddressingMode::Indirect => write!(f, "{name}"),
            AddressingMode::PostIncrement => write!(f, "{name}+"),
            AddressingMode::PreDecrement => write!(f, "-{name}"),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mnemonic = self.mnemonic();
        match *self {
            Self::Ldi { rd, k }
            | Self::Subi { rd, k }
            | Self::Sbci { rd, k }
            | Self::Cpi { rd, k }
            | Self::Andi { rd, k }
            | Self::Sbr { rd, mask: k }
            | Self::Cbr { rd, mask: k } => write!(f, "{mnemonic} r{rd}, 0x{k:02X}"),
            Self::Clr { rd } | Self::Ser { rd } => write!(f, "{mnemonic} r{rd}"),
            Self::Mov { rd, rr } => write!(f, "{mnemonic} r{rd}, r{rr}"),
            Self::Ld { rd, ptr, mode } => {
                write!(f, "{mnemonic} r{rd}, {}", PointerOperand { ptr, mode })
            }
            Self::St { ptr, rr, mode } => {
                write!(f, "{mnemonic} {}, r{rr}", PointerOperand { ptr, mode })
            }
            Self::Sec | Self::Clc => f.write_str(mnemonic),
            Self::Sbrs { rr, bit } => write!(f, "{mnemonic} r{rr}, {bit}"),
        }
    }
}
