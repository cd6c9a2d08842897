//! Memory spaces, fixed sizes, and initial-fill policies.

/// Bounds policy helpers.
pub mod access;
/// Fixed data-memory region map and address decoder.
pub mod map;

use std::fmt;

use rand::{rngs::StdRng, RngCore, SeedableRng};

pub use access::{validate_data_address, validate_index};
pub use map::{
    decode_data_region, DataRegion, RegionDescriptor, DATA_MEMORY_REGIONS, IO_BYTES, IO_END,
    IO_START, REGISTERS_END, REGISTERS_START, REGISTER_FILE_BYTES, SRAM_BYTES, SRAM_END,
    SRAM_START,
};

use crate::Fault;

/// Size in bytes of unified data memory (registers, I/O ports, SRAM).
pub const DATA_MEMORY_BYTES: usize = REGISTER_FILE_BYTES + IO_BYTES + SRAM_BYTES;
/// Size in bytes of program memory (256 KiB).
pub const FLASH_BYTES: usize = 256 * 1024;
/// Size in bytes of EEPROM (4 KiB).
pub const EEPROM_BYTES: usize = 4 * 1024;
/// Value of an erased flash or EEPROM cell.
pub const ERASED_BYTE: u8 = 0xFF;
/// Seed used by the default non-volatile fill policy.
pub const DEFAULT_FILL_SEED: u64 = 0x4156_525F_4E56_4D00;

/// The three independent address spaces of the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum MemorySpace {
    /// Unified register, I/O and SRAM space.
    Data,
    /// Program memory.
    Flash,
    /// Non-volatile configuration memory.
    Eeprom,
}

impl MemorySpace {
    /// Size of this space in bytes.
    #[must_use]
    pub const fn len(self) -> usize {
        match self {
            Self::Data => DATA_MEMORY_BYTES,
            Self::Flash => FLASH_BYTES,
            Self::Eeprom => EEPROM_BYTES,
        }
    }

    /// Every space is non-empty; present for API symmetry with `len`.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for MemorySpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Data => "data memory",
            Self::Flash => "flash",
            Self::Eeprom => "eeprom",
        })
    }
}

/// How flash and EEPROM are populated when a session starts.
///
/// Data memory is always zero-filled to model power-on reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum FillPolicy {
    /// Deterministic pseudo-random bytes derived from the seed.
    Seeded(u64),
    /// Pseudo-random bytes from the thread-local generator.
    Entropy,
    /// Every byte set to [`ERASED_BYTE`].
    Erased,
}

impl Default for FillPolicy {
    fn default() -> Self {
        Self::Seeded(DEFAULT_FILL_SEED)
    }
}

impl FillPolicy {
    fn fill(self, regions: [&mut [u8]; 2]) {
        match self {
            Self::Seeded(seed) => {
                let mut rng = StdRng::seed_from_u64(seed);
                for region in regions {
                    rng.fill_bytes(region);
                }
            }
            Self::Entropy => {
                let mut rng = rand::thread_rng();
                for region in regions {
                    rng.fill_bytes(region);
                }
            }
            Self::Erased => {
                for region in regions {
                    region.fill(ERASED_BYTE);
                }
            }
        }
    }
}

/// Backing store for all three memory spaces.
///
/// Deserialized images are length-checked per space, so the bounds checks in
/// [`MemoryImage::get`] and [`MemoryImage::set`] always match the storage.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(try_from = "MemoryImageParts")
)]
pub struct MemoryImage {
    data: Box<[u8]>,
    flash: Box<[u8]>,
    eeprom: Box<[u8]>,
}

impl MemoryImage {
    /// Allocates zeroed data memory and fills flash and EEPROM per `fill`.
    #[must_use]
    pub fn new(fill: FillPolicy) -> Self {
        let mut image = Self {
            data: vec![0; DATA_MEMORY_BYTES].into_boxed_slice(),
            flash: vec![0; FLASH_BYTES].into_boxed_slice(),
            eeprom: vec![0; EEPROM_BYTES].into_boxed_slice(),
        };
        fill.fill([&mut image.flash[..], &mut image.eeprom[..]]);
        image
    }

    /// Read-only view of a whole space.
    #[must_use]
    pub fn bytes(&self, space: MemorySpace) -> &[u8] {
        match space {
            MemorySpace::Data => &self.data,
            MemorySpace::Flash => &self.flash,
            MemorySpace::Eeprom => &self.eeprom,
        }
    }

    pub(crate) fn bytes_mut(&mut self, space: MemorySpace) -> &mut [u8] {
        match space {
            MemorySpace::Data => &mut self.data,
            MemorySpace::Flash => &mut self.flash,
            MemorySpace::Eeprom => &mut self.eeprom,
        }
    }

    /// Reads one byte.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::IndexOutOfBounds`] when `index` is outside `space`.
    pub fn get(&self, space: MemorySpace, index: usize) -> Result<u8, Fault> {
        validate_index(space, index)?;
        Ok(self.bytes(space)[index])
    }

    /// Writes one byte.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::IndexOutOfBounds`] when `index` is outside `space`;
    /// nothing is written in that case.
    pub fn set(&mut self, space: MemorySpace, index: usize, value: u8) -> Result<(), Fault> {
        validate_index(space, index)?;
        self.bytes_mut(space)[index] = value;
        Ok(())
    }

    /// Zero-fills data memory, leaving flash and EEPROM untouched.
    pub fn clear_data(&mut self) {
        self.data.fill(0);
    }
}

/// Snapshot image whose space does not have the fixed size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[error("{space} snapshot holds {actual} bytes (expected {})", .space.len())]
pub struct SnapshotLayoutError {
    /// Space with the wrong length.
    pub space: MemorySpace,
    /// Length found in the snapshot.
    pub actual: usize,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct MemoryImageParts {
    data: Box<[u8]>,
    flash: Box<[u8]>,
    eeprom: Box<[u8]>,
}

#[cfg(feature = "serde")]
impl TryFrom<MemoryImageParts> for MemoryImage {
    type Error = SnapshotLayoutError;

    fn try_from(parts: MemoryImageParts) -> Result<Self, Self::Error> {
        for (space, bytes) in [
            (MemorySpace::Data, &parts.data),
            (MemorySpace::Flash, &parts.flash),
            (MemorySpace::Eeprom, &parts.eeprom),
        ] {
            if bytes.len() != space.len() {
                return Err(SnapshotLayoutError {
                    space,
                    actual: bytes.len(),
                });
            }
        }

        Ok(Self {
            data: parts.data,
            flash: parts.flash,
            eeprom: parts.eeprom,
        })
    }
}
