//! Deterministic session fingerprint used for cross-host comparison.

use avr_core::{
    AddressingMode, CoreConfig, CpuState, ExecuteOutcome, Instruction, MemorySpace,
    PointerStorage, X_LOW, Z_LOW,
};
use proptest as _;
use rand as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;
use tracing as _;

const PROGRAM: &[Instruction] = &[
    Instruction::Ldi { rd: 16, k: 0x2A },
    Instruction::Ldi { rd: 17, k: 0x05 },
    Instruction::Subi { rd: 17, k: 0x0A },
    Instruction::Sbr { rd: 17, mask: 0b1000_0001 },
    Instruction::Sec,
    Instruction::Sbci { rd: 16, k: 0x02 },
    Instruction::Mov { rd: 2, rr: 16 },
    Instruction::St {
        ptr: X_LOW,
        rr: 2,
        mode: AddressingMode::PostIncrement,
    },
    Instruction::St {
        ptr: X_LOW,
        rr: 17,
        mode: AddressingMode::PostIncrement,
    },
    Instruction::Ld {
        rd: 3,
        ptr: Z_LOW,
        mode: AddressingMode::PreDecrement,
    },
    Instruction::Cpi { rd: 16, k: 0x27 },
    Instruction::Sbrs { rr: 3, bit: 7 },
    Instruction::Ldi { rd: 5, k: 0x01 },
    Instruction::Clc,
];

fn hash_bytes(hash: &mut u64, bytes: &[u8]) {
    for byte in bytes {
        *hash ^= u64::from(*byte);
        *hash = hash.wrapping_mul(0x1000_0000_01B3);
    }
}

fn fingerprint(pointer_storage: PointerStorage) -> String {
    let mut state = CpuState::with_config(&CoreConfig {
        pointer_storage,
        ..CoreConfig::default()
    });
    state.write_pair(X_LOW, 0x0100).expect("X is a valid pair");
    state.write_pair(Z_LOW, 0x0102).expect("Z is a valid pair");

    let mut hash = 0xcbf2_9ce4_8422_2325_u64;
    for instruction in PROGRAM {
        match state.execute(*instruction) {
            Ok(ExecuteOutcome::Retired { cycles }) => {
                hash_bytes(&mut hash, &[0x10]);
                hash_bytes(&mut hash, &cycles.to_le_bytes());
            }
            Ok(ExecuteOutcome::Predicate { result, cycles }) => {
                hash_bytes(&mut hash, &[0x11, u8::from(result)]);
                hash_bytes(&mut hash, &cycles.to_le_bytes());
            }
            Err(fault) => hash_bytes(&mut hash, fault.to_string().as_bytes()),
        }
    }

    hash_bytes(&mut hash, &state.cycles().to_le_bytes());
    hash_bytes(&mut hash, &[state.flags().bits()]);
    for space in [MemorySpace::Data, MemorySpace::Flash, MemorySpace::Eeprom] {
        hash_bytes(&mut hash, state.memory().bytes(space));
    }

    format!("{hash:016x}")
}

fn main() {
    println!("{}", fingerprint(PointerStorage::ProgramMemory));
    println!("{}", fingerprint(PointerStorage::DataMemory));
}
