use crate::{Fault, MemorySpace, OperandKind};

/// Number of general-purpose registers (`r0..=r31`).
pub const GENERAL_REGISTER_COUNT: u8 = 32;
/// First register accepted by immediate-operand instructions.
pub const HIGH_REGISTER_FIRST: u8 = 16;
/// Number of bits in a register.
pub const REGISTER_BITS: u8 = 8;

/// Low byte of the X pointer.
pub const X_LOW: u8 = 26;
/// High byte of the X pointer.
pub const X_HIGH: u8 = 27;
/// Low byte of the Y pointer.
pub const Y_LOW: u8 = 28;
/// High byte of the Y pointer.
pub const Y_HIGH: u8 = 29;
/// Low byte of the Z pointer.
pub const Z_LOW: u8 = 30;
/// High byte of the Z pointer.
pub const Z_HIGH: u8 = 31;

/// A validated general-purpose register index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Register(u8);

impl Register {
    /// Validates any register index (`0..=31`).
    ///
    /// # Errors
    ///
    /// Returns [`Fault::InvalidOperand`] with [`OperandKind::Register`] when
    /// `index` is 32 or above.
    pub const fn new(index: u8) -> Result<Self, Fault> {
        if index < GENERAL_REGISTER_COUNT {
            Ok(Self(index))
        } else {
            Err(Fault::invalid_operand(OperandKind::Register, index))
        }
    }

    /// Validates an immediate-form register index (`16..=31`).
    ///
    /// # Errors
    ///
    /// Returns [`Fault::InvalidOperand`] with [`OperandKind::HighRegister`]
    /// when `index` is outside the upper half of the register file.
    pub const fn high(index: u8) -> Result<Self, Fault> {
        if index >= HIGH_REGISTER_FIRST && index < GENERAL_REGISTER_COUNT {
            Ok(Self(index))
        } else {
            Err(Fault::invalid_operand(OperandKind::HighRegister, index))
        }
    }

    /// Raw register number.
    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Data-memory address the register is mapped at.
    #[must_use]
    pub const fn address(self) -> usize {
        self.0 as usize
    }
}

/// The three 16-bit pointer register pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum PointerPair {
    /// `r27:r26`.
    X,
    /// `r29:r28`.
    Y,
    /// `r31:r30`.
    Z,
}

impl PointerPair {
    /// All pointer pairs in register order.
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];

    /// Resolves a pair from the index of its low byte.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::InvalidOperand`] with [`OperandKind::PointerLow`] for
    /// anything other than 26, 28 or 30.
    pub const fn from_low(index: u8) -> Result<Self, Fault> {
        match index {
            X_LOW => Ok(Self::X),
            Y_LOW => Ok(Self::Y),
            Z_LOW => Ok(Self::Z),
            _ => Err(Fault::invalid_operand(OperandKind::PointerLow, index)),
        }
    }

    /// Index of the low byte register.
    #[must_use]
    pub const fn low(self) -> u8 {
        match self {
            Self::X => X_LOW,
            Self::Y => Y_LOW,
            Self::Z => Z_LOW,
        }
    }

    /// Index of the high byte register.
    #[must_use]
    pub const fn high(self) -> u8 {
        self.low() + 1
    }

    /// Assembler name of the pair.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::X => "X",
            Self::Y => "Y",
            Self::Z => "Z",
        }
    }
}

/// Memory space that holds the bytes of the pointer pairs.
///
/// Single-register accessors always target data memory. Pair accessors
/// historically read and write program memory at the same offsets, so
/// `ProgramMemory` is the default; `DataMemory` follows the hardware, where
/// X/Y/Z are ordinary registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum PointerStorage {
    /// Pair bytes live in flash at offsets `low` and `low + 1`.
    #[default]
    ProgramMemory,
    /// Pair bytes alias the register file in data memory.
    DataMemory,
}

impl PointerStorage {
    /// Memory space backing the pairs.
    #[must_use]
    pub const fn space(self) -> MemorySpace {
        match self {
            Self::ProgramMemory => MemorySpace::Flash,
            Self::DataMemory => MemorySpace::Data,
        }
    }
}

/// Validates a bit position within a register.
///
/// # Errors
///
/// Returns [`Fault::InvalidOperand`] with [`OperandKind::BitIndex`] when
/// `bit` is 8 or above.
pub const fn validate_bit(bit: u8) -> Result<u8, Fault> {
    if bit < REGISTER_BITS {
        Ok(bit)
    } else {
        Err(Fault::invalid_operand(OperandKind::BitIndex, bit))
    }
}
