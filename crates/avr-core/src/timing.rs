/// Instruction forms that have fixed cycle costs in the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CycleCostKind {
    /// Register/immediate arithmetic and logic (`ldi`, `subi`, `andi`, ...).
    Alu,
    /// Register-to-register copy.
    Mov,
    /// Indirect data-memory read through a pointer pair.
    Load,
    /// Indirect data-memory write through a pointer pair.
    Store,
    /// Explicit status-flag set/clear.
    FlagWrite,
    /// Register bit test without a taken skip.
    SkipTest,
}

/// Single source-of-truth cycle-cost table, ATmega classic-core timings.
pub const CYCLE_COST_TABLE: &[(CycleCostKind, u16)] = &[
    (CycleCostKind::Alu, 1),
    (CycleCostKind::Mov, 1),
    (CycleCostKind::Load, 2),
    (CycleCostKind::Store, 2),
    (CycleCostKind::FlagWrite, 1),
    (CycleCostKind::SkipTest, 1),
];

/// Looks up the cycle cost for a cycle-cost kind.
#[must_use]
pub fn cycle_cost(kind: CycleCostKind) -> Option<u16> {
    CYCLE_COST_TABLE
        .iter()
        .find_map(|(entry_kind, cycles)| (*entry_kind == kind).then_some(*cycles))
}
