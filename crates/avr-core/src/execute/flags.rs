//! Carry-flag update behaviors for different instruction classes.

/// Describes how the carry flag changes when an instruction commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CarryUpdate {
    /// No change to carry.
    #[default]
    None,
    /// Force carry to 1.
    Set,
    /// Force carry to 0.
    Clear,
}

impl CarryUpdate {
    /// Carry value after the update, given the current one.
    #[must_use]
    pub const fn apply(self, carry: bool) -> bool {
        match self {
            Self::None => carry,
            Self::Set => true,
            Self::Clear => false,
        }
    }
}
