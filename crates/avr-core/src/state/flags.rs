/// `SREG` bit for carry/borrow.
pub const SREG_C: u8 = 1 << 0;
/// Mask of status bits the core models.
pub const SREG_ACTIVE_MASK: u8 = SREG_C;

/// Status register subset tracked by the core.
///
/// Only the carry bit is modeled. No instruction derives it from a result;
/// it changes only through `sec`, `clc`, or host writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct StatusFlags {
    bits: u8,
}

impl StatusFlags {
    /// Raw status bits, masked to [`SREG_ACTIVE_MASK`].
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.bits
    }

    /// Replaces the status bits; unmodeled bits are dropped.
    pub const fn set_bits(&mut self, bits: u8) {
        self.bits = bits & SREG_ACTIVE_MASK;
    }

    /// Reads the carry flag.
    #[must_use]
    pub const fn carry(self) -> bool {
        self.bits & SREG_C != 0
    }

    /// Carry as an octet operand (`0` or `1`).
    #[must_use]
    pub const fn carry_bit(self) -> u8 {
        self.bits & SREG_C
    }

    /// Sets or clears the carry flag.
    pub const fn set_carry(&mut self, carry: bool) {
        if carry {
            self.bits |= SREG_C;
        } else {
            self.bits &= !SREG_C;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{StatusFlags, SREG_ACTIVE_MASK, SREG_C};

    #[test]
    fn carry_defaults_clear() {
        let flags = StatusFlags::default();
        assert!(!flags.carry());
        assert_eq!(flags.carry_bit(), 0);
    }

    #[test]
    fn carry_can_be_set_and_cleared() {
        let mut flags = StatusFlags::default();
        flags.set_carry(true);
        assert!(flags.carry());
        assert_eq!(flags.carry_bit(), 1);
        assert_eq!(flags.bits(), SREG_C);

        flags.set_carry(false);
        assert!(!flags.carry());
        assert_eq!(flags.bits(), 0);
    }

    #[test]
    fn only_modeled_bits_are_stored() {
        let mut flags = StatusFlags::default();
        flags.set_bits(u8::MAX);
        assert_eq!(flags.bits(), SREG_ACTIVE_MASK);
        assert!(flags.carry());
    }
}
