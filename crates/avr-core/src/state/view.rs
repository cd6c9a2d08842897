//! Register file view: registers and pointer pairs overlaid on the memory spaces.
//!
//! Registers are not a separate store. `r0..=r31` are data-memory bytes
//! `0x00..=0x1F`, so register writes and data-memory writes are
//! interchangeable. Pointer pairs are composed on demand from two bytes of
//! the configured [`PointerStorage`](crate::PointerStorage) space.

use crate::{CpuState, Fault, MemorySpace, PointerPair, Register};

impl CpuState {
    /// Reads a general-purpose register.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::InvalidOperand`] when `index` is not in `0..=31`.
    pub fn read_register(&self, index: u8) -> Result<u8, Fault> {
        let reg = Register::new(index)?;
        Ok(self.register(reg))
    }

    /// Writes a general-purpose register.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::InvalidOperand`] when `index` is not in `0..=31`.
    pub fn write_register(&mut self, index: u8, value: u8) -> Result<(), Fault> {
        let reg = Register::new(index)?;
        self.set_register(reg, value);
        Ok(())
    }

    /// Reads a pointer pair given the index of its low byte.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::InvalidOperand`] unless `low_index` is 26, 28 or 30.
    pub fn read_pair(&self, low_index: u8) -> Result<u16, Fault> {
        PointerPair::from_low(low_index).map(|pair| self.pair(pair))
    }

    /// Writes a pointer pair given the index of its low byte.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::InvalidOperand`] unless `low_index` is 26, 28 or 30.
    pub fn write_pair(&mut self, low_index: u8, value: u16) -> Result<(), Fault> {
        let pair = PointerPair::from_low(low_index)?;
        self.set_pair(pair, value);
        Ok(())
    }

    /// Current 16-bit value of `pair`.
    #[must_use]
    pub fn pair(&self, pair: PointerPair) -> u16 {
        let bytes = self.memory.bytes(self.pointer_storage.space());
        let low = bytes[usize::from(pair.low())];
        let high = bytes[usize::from(pair.high())];
        u16::from_le_bytes([low, high])
    }

    /// Decomposes `value` into the low and high bytes of `pair`.
    pub fn set_pair(&mut self, pair: PointerPair, value: u16) {
        let [low, high] = value.to_le_bytes();
        let bytes = self.memory.bytes_mut(self.pointer_storage.space());
        bytes[usize::from(pair.low())] = low;
        bytes[usize::from(pair.high())] = high;
    }

    /// Post-increment (`X+`): advances the pair by one and yields the old value.
    ///
    /// The pair wraps from `0xFFFF` to `0x0000`. Emits no trace events.
    pub fn post_increment(&mut self, pair: PointerPair) -> u16 {
        let old = self.pair(pair);
        self.set_pair(pair, old.wrapping_add(1));
        old
    }

    /// Pre-decrement (`-X`): steps the pair back by one and yields the new value.
    ///
    /// The pair wraps from `0x0000` to `0xFFFF`. Emits no trace events.
    pub fn pre_decrement(&mut self, pair: PointerPair) -> u16 {
        let new = self.pair(pair).wrapping_sub(1);
        self.set_pair(pair, new);
        new
    }

    /// Reads the carry flag.
    #[must_use]
    pub const fn carry(&self) -> bool {
        self.flags.carry()
    }

    /// Sets the carry flag directly.
    pub const fn set_carry(&mut self, carry: bool) {
        self.flags.set_carry(carry);
    }

    pub(crate) fn register(&self, reg: Register) -> u8 {
        self.memory.bytes(MemorySpace::Data)[reg.address()]
    }

    pub(crate) fn set_register(&mut self, reg: Register, value: u8) {
        self.memory.bytes_mut(MemorySpace::Data)[reg.address()] = value;
    }
}
