#![no_main]

use avr_core::{
    AddressingMode, CoreConfig, CpuState, FillPolicy, Instruction, PointerStorage, TraceEvent,
};
use libfuzzer_sys::fuzz_target;

fn mode(byte: u8) -> AddressingMode {
    match byte % 3 {
        0 => AddressingMode::Indirect,
        1 => AddressingMode::PostIncrement,
        _ => AddressingMode::PreDecrement,
    }
}

fn instruction(chunk: &[u8]) -> Instruction {
    let (a, b, c) = (chunk[1], chunk[2], chunk[3]);
    match chunk[0] % 15 {
        0 => Instruction::Ldi { rd: a, k: b },
        1 => Instruction::Subi { rd: a, k: b },
        2 => Instruction::Clr { rd: a },
        3 => Instruction::Ser { rd: a },
        4 => Instruction::Sbr { rd: a, mask: b },
        5 => Instruction::Sbci { rd: a, k: b },
        6 => Instruction::Cpi { rd: a, k: b },
        7 => Instruction::Cbr { rd: a, mask: b },
        8 => Instruction::Andi { rd: a, k: b },
        9 => Instruction::Mov { rd: a, rr: b },
        10 => Instruction::Ld {
            rd: a,
            ptr: b,
            mode: mode(c),
        },
        11 => Instruction::St {
            ptr: a,
            rr: b,
            mode: mode(c),
        },
        12 => Instruction::Sec,
        13 => Instruction::Clc,
        _ => Instruction::Sbrs { rr: a, bit: b },
    }
}

fuzz_target!(|data: &[u8]| {
    let Some((&selector, program)) = data.split_first() else {
        return;
    };

    let pointer_storage = if selector & 1 == 0 {
        PointerStorage::ProgramMemory
    } else {
        PointerStorage::DataMemory
    };
    let mut state = CpuState::with_config(&CoreConfig {
        pointer_storage,
        fill: FillPolicy::Seeded(u64::from(selector)),
        tracing_enabled: true,
    });
    let mut events: Vec<TraceEvent> = Vec::new();

    for chunk in program.chunks_exact(4) {
        let instruction = instruction(chunk);
        let before = state.clone();
        events.clear();
        if state.execute_traced(instruction, &mut events).is_err() {
            assert_eq!(state, before, "rejected {instruction} mutated the session");
        }
        let _ = instruction.to_string();
    }
});
