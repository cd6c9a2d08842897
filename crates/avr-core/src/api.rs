//! Public host-facing API contracts for embedding the core.

use crate::{
    FillPolicy, Fault, Instruction, MemoryImage, MemorySpace, PointerPair, PointerStorage,
    StatusFlags,
};

/// Top-level immutable configuration for a core instance.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CoreConfig {
    /// Memory space that backs the X/Y/Z pointer pairs.
    pub pointer_storage: PointerStorage,
    /// Initial contents of flash and EEPROM.
    pub fill: FillPolicy,
    /// Enables deterministic trace callback dispatch.
    ///
    /// Only executed instructions report events. Direct accessor calls and
    /// the standalone `post_increment`/`pre_decrement` pair operations change
    /// state without passing through a trace sink.
    pub tracing_enabled: bool,
}

/// Complete simulated CPU session: memory spaces, status flags, cycle counter.
///
/// All mutation goes through `&mut self`, so a single owner is the only
/// writer. Hosts that share a core across threads must wrap it in a mutex.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CpuState {
    pub(crate) pointer_storage: PointerStorage,
    pub(crate) tracing_enabled: bool,
    pub(crate) memory: MemoryImage,
    pub(crate) flags: StatusFlags,
    pub(crate) cycles: u64,
}

impl Default for CpuState {
    fn default() -> Self {
        Self::with_config(&CoreConfig::default())
    }
}

impl CpuState {
    /// Starts a session: zeroed data memory, flash and EEPROM per `config.fill`.
    #[must_use]
    pub fn with_config(config: &CoreConfig) -> Self {
        Self {
            pointer_storage: config.pointer_storage,
            tracing_enabled: config.tracing_enabled,
            memory: MemoryImage::new(config.fill),
            flags: StatusFlags::default(),
            cycles: 0,
        }
    }

    /// Power-on reset: clears data memory, status flags and the cycle counter.
    ///
    /// Flash and EEPROM are non-volatile and keep their contents.
    pub fn reset(&mut self) {
        self.memory.clear_data();
        self.flags = StatusFlags::default();
        self.cycles = 0;
    }

    /// Space that backs the pointer pairs for this session.
    #[must_use]
    pub const fn pointer_storage(&self) -> PointerStorage {
        self.pointer_storage
    }

    /// Whether trace callbacks are dispatched.
    #[must_use]
    pub const fn tracing_enabled(&self) -> bool {
        self.tracing_enabled
    }

    /// Read-only access to the backing store of all spaces.
    #[must_use]
    pub const fn memory(&self) -> &MemoryImage {
        &self.memory
    }

    /// Status flags.
    #[must_use]
    pub const fn flags(&self) -> StatusFlags {
        self.flags
    }

    /// Cycles consumed by retired instructions since the session started.
    #[must_use]
    pub const fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Reads a data-memory byte.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::IndexOutOfBounds`] for addresses past the end of SRAM.
    pub fn read_data_memory(&self, addr: usize) -> Result<u8, Fault> {
        self.memory.get(MemorySpace::Data, addr)
    }

    /// Writes a data-memory byte.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::IndexOutOfBounds`] for addresses past the end of SRAM.
    pub fn write_data_memory(&mut self, addr: usize, value: u8) -> Result<(), Fault> {
        self.memory.set(MemorySpace::Data, addr, value)
    }

    /// Reads a program-memory byte.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::IndexOutOfBounds`] for addresses past 256 KiB.
    pub fn read_flash(&self, addr: usize) -> Result<u8, Fault> {
        self.memory.get(MemorySpace::Flash, addr)
    }

    /// Writes a program-memory byte.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::IndexOutOfBounds`] for addresses past 256 KiB.
    pub fn write_flash(&mut self, addr: usize, value: u8) -> Result<(), Fault> {
        self.memory.set(MemorySpace::Flash, addr, value)
    }

    /// Reads an EEPROM byte.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::IndexOutOfBounds`] for addresses past 4 KiB.
    pub fn read_eeprom(&self, addr: usize) -> Result<u8, Fault> {
        self.memory.get(MemorySpace::Eeprom, addr)
    }

    /// Writes an EEPROM byte.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::IndexOutOfBounds`] for addresses past 4 KiB.
    pub fn write_eeprom(&mut self, addr: usize, value: u8) -> Result<(), Fault> {
        self.memory.set(MemorySpace::Eeprom, addr, value)
    }
}

/// Deterministic trace events emitted in commit order when enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceEvent {
    /// Instruction accepted for execution.
    InstructionStart {
        /// The instruction about to be validated.
        instruction: Instruction,
    },
    /// Memory access in commit order.
    MemoryAccess {
        /// Space that was accessed.
        space: MemorySpace,
        /// Byte index within the space.
        index: usize,
        /// Byte read or written.
        value: u8,
        /// True for writes, false for reads.
        is_write: bool,
    },
    /// A pointer pair was rewritten by an auto-modifying access.
    PointerUpdate {
        /// Pair that changed.
        pair: PointerPair,
        /// New 16-bit value.
        value: u16,
    },
    /// The carry flag was written.
    CarryWrite {
        /// New carry value.
        carry: bool,
    },
    /// Post-retire event reporting consumed cycles.
    InstructionRetired {
        /// Mnemonic of the retired instruction.
        mnemonic: &'static str,
        /// Fixed cycle cost consumed by this retirement.
        cycles: u16,
    },
    /// Instruction rejected before any state changed.
    FaultRaised {
        /// Fault reported to the caller.
        fault: Fault,
    },
}

/// Sink trait for deterministic trace hooks.
pub trait TraceSink {
    /// Records an event in execution order.
    fn on_event(&mut self, event: TraceEvent);
}

impl TraceSink for Vec<TraceEvent> {
    fn on_event(&mut self, event: TraceEvent) {
        self.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, CpuState};
    use crate::{
        FillPolicy, Fault, MemorySpace, PointerStorage, DATA_MEMORY_BYTES, EEPROM_BYTES,
        ERASED_BYTE, FLASH_BYTES,
    };

    #[test]
    fn default_core_config_matches_documented_contract() {
        let config = CoreConfig::default();

        assert_eq!(config.pointer_storage, PointerStorage::ProgramMemory);
        assert_eq!(config.fill, FillPolicy::default());
        assert!(!config.tracing_enabled);
    }

    #[test]
    fn new_session_has_zeroed_data_memory_and_clear_carry() {
        let state = CpuState::default();

        assert!(state
            .memory()
            .bytes(MemorySpace::Data)
            .iter()
            .all(|byte| *byte == 0));
        assert!(!state.flags().carry());
        assert_eq!(state.cycles(), 0);
    }

    #[test]
    fn config_is_carried_into_the_session() {
        let config = CoreConfig {
            pointer_storage: PointerStorage::DataMemory,
            fill: FillPolicy::Erased,
            tracing_enabled: true,
        };
        let state = CpuState::with_config(&config);

        assert_eq!(state.pointer_storage(), PointerStorage::DataMemory);
        assert!(state.tracing_enabled());
        assert_eq!(state.read_flash(0), Ok(ERASED_BYTE));
        assert_eq!(state.read_eeprom(EEPROM_BYTES - 1), Ok(ERASED_BYTE));
    }

    #[test]
    fn raw_accessors_are_bounds_checked_per_space() {
        let mut state = CpuState::default();

        assert_eq!(
            state.write_data_memory(DATA_MEMORY_BYTES, 1),
            Err(Fault::IndexOutOfBounds {
                space: MemorySpace::Data,
                index: DATA_MEMORY_BYTES,
                len: DATA_MEMORY_BYTES,
            })
        );
        assert!(state.read_flash(FLASH_BYTES).is_err());
        assert!(state.read_eeprom(EEPROM_BYTES).is_err());

        state.write_data_memory(0x0100, 0x5A).expect("sram address");
        state.write_flash(0x1_0000, 0xA5).expect("flash address");
        state.write_eeprom(0x0FFF, 0x3C).expect("eeprom address");

        assert_eq!(state.read_data_memory(0x0100), Ok(0x5A));
        assert_eq!(state.read_flash(0x1_0000), Ok(0xA5));
        assert_eq!(state.read_eeprom(0x0FFF), Ok(0x3C));
    }

    #[test]
    fn reset_clears_volatile_state_and_keeps_non_volatile_state() {
        let mut state = CpuState::default();
        state.write_data_memory(0x0200, 0x11).expect("sram address");
        state.write_flash(0x0010, 0x22).expect("flash address");
        state.write_eeprom(0x0010, 0x33).expect("eeprom address");
        state.set_carry(true);
        state.cycles = 17;

        state.reset();

        assert_eq!(state.read_data_memory(0x0200), Ok(0));
        assert_eq!(state.read_flash(0x0010), Ok(0x22));
        assert_eq!(state.read_eeprom(0x0010), Ok(0x33));
        assert!(!state.carry());
        assert_eq!(state.cycles(), 0);
    }
}
