//! Fixed data-memory region map and address decoder.

/// Number of general-purpose registers mapped at the bottom of data memory.
pub const REGISTER_FILE_BYTES: usize = 32;
/// Number of I/O port bytes mapped after the register file.
pub const IO_BYTES: usize = 86;
/// Bytes of internal SRAM mapped after the I/O ports.
pub const SRAM_BYTES: usize = 8 * 1024;

/// Inclusive start address of the register file window.
pub const REGISTERS_START: u16 = 0x0000;
/// Inclusive end address of the register file window.
pub const REGISTERS_END: u16 = 0x001F;
/// Inclusive start address of the I/O port window.
pub const IO_START: u16 = 0x0020;
/// Inclusive end address of the I/O port window.
pub const IO_END: u16 = 0x0075;
/// Inclusive start address of internal SRAM.
pub const SRAM_START: u16 = 0x0076;
/// Inclusive end address of internal SRAM.
pub const SRAM_END: u16 = 0x2075;

/// Canonical fixed-region descriptor for the data-memory map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionDescriptor {
    /// Region classification.
    pub region: DataRegion,
    /// Inclusive start address.
    pub start: u16,
    /// Inclusive end address.
    pub end: u16,
}

/// Region classification for data-memory addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataRegion {
    /// General-purpose registers (`0x0000..=0x001F`).
    Registers,
    /// I/O ports (`0x0020..=0x0075`).
    Io,
    /// Internal SRAM (`0x0076..=0x2075`).
    Sram,
}

impl DataRegion {
    /// Returns the inclusive bounds for this region.
    #[must_use]
    pub const fn bounds(self) -> (u16, u16) {
        match self {
            Self::Registers => (REGISTERS_START, REGISTERS_END),
            Self::Io => (IO_START, IO_END),
            Self::Sram => (SRAM_START, SRAM_END),
        }
    }

    /// Returns `true` when `addr` belongs to this region.
    #[must_use]
    pub const fn contains(self, addr: u16) -> bool {
        let (start, end) = self.bounds();
        addr >= start && addr <= end
    }

    /// Returns the canonical descriptor for this region.
    #[must_use]
    pub const fn descriptor(self) -> RegionDescriptor {
        let (start, end) = self.bounds();
        RegionDescriptor {
            region: self,
            start,
            end,
        }
    }
}

/// Data-memory layout in ascending address order.
pub const DATA_MEMORY_REGIONS: [RegionDescriptor; 3] = [
    DataRegion::Registers.descriptor(),
    DataRegion::Io.descriptor(),
    DataRegion::Sram.descriptor(),
];

const _: () = assert_data_region_layout();

const fn assert_data_region_layout() {
    assert!(
        (REGISTERS_END - REGISTERS_START) as usize + 1 == REGISTER_FILE_BYTES,
        "register window must hold 32 registers"
    );
    assert!(
        (IO_END - IO_START) as usize + 1 == IO_BYTES,
        "io window must hold 86 ports"
    );
    assert!(
        (SRAM_END - SRAM_START) as usize + 1 == SRAM_BYTES,
        "sram window must hold 8 KiB"
    );

    let mut index = 1;
    while index < DATA_MEMORY_REGIONS.len() {
        assert!(
            DATA_MEMORY_REGIONS[index - 1].end + 1 == DATA_MEMORY_REGIONS[index].start,
            "data regions must be contiguous"
        );
        index += 1;
    }
}

/// Decodes a data-memory address into its region, or `None` past the end of SRAM.
#[must_use]
pub const fn decode_data_region(addr: u16) -> Option<DataRegion> {
    match addr {
        REGISTERS_START..=REGISTERS_END => Some(DataRegion::Registers),
        IO_START..=IO_END => Some(DataRegion::Io),
        SRAM_START..=SRAM_END => Some(DataRegion::Sram),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        decode_data_region, DataRegion, DATA_MEMORY_REGIONS, IO_END, IO_START, REGISTERS_END,
        REGISTERS_START, SRAM_END, SRAM_START,
    };
    use crate::DATA_MEMORY_BYTES;

    #[test]
    fn region_decode_is_correct_at_boundaries() {
        assert_eq!(
            decode_data_region(REGISTERS_START),
            Some(DataRegion::Registers)
        );
        assert_eq!(
            decode_data_region(REGISTERS_END),
            Some(DataRegion::Registers)
        );
        assert_eq!(decode_data_region(IO_START), Some(DataRegion::Io));
        assert_eq!(decode_data_region(IO_END), Some(DataRegion::Io));
        assert_eq!(decode_data_region(SRAM_START), Some(DataRegion::Sram));
        assert_eq!(decode_data_region(SRAM_END), Some(DataRegion::Sram));
        assert_eq!(decode_data_region(SRAM_END + 1), None);
        assert_eq!(decode_data_region(u16::MAX), None);
    }

    #[test]
    fn regions_cover_exactly_the_data_memory() {
        assert_eq!(DATA_MEMORY_REGIONS[0].start, 0);
        assert_eq!(usize::from(SRAM_END) + 1, DATA_MEMORY_BYTES);

        for addr in 0_u16..=u16::MAX {
            let decoded = decode_data_region(addr);
            assert_eq!(decoded.is_some(), usize::from(addr) < DATA_MEMORY_BYTES);
            for descriptor in DATA_MEMORY_REGIONS {
                assert_eq!(
                    descriptor.region.contains(addr),
                    decoded == Some(descriptor.region)
                );
            }
        }
    }
}
