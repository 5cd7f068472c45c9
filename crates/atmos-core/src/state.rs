//! Cell lifecycle states.

use std::fmt;

/// Lifecycle state of a cell.
///
/// The active set that the compute stages iterate is rebuilt each tick
/// from these states. `Active` cells compute transfers; `Semiactive`
/// cells are kept warm for one more tick so late arrivals reactivate
/// them cheaply; `Inactive` cells cost nothing. `Blocked` and `Vacuum`
/// are sticky terrain states that only an explicit state change leaves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CellState {
    /// At equilibrium; skipped by the compute stages.
    #[default]
    Inactive,
    /// Moving gas or heat this tick.
    Active,
    /// Recently active; written back but not computed. Demoted to
    /// `Inactive` after one further tick without activity.
    Semiactive,
    /// A wall. Transfers nothing, accepts nothing, ignores gas and
    /// heat mutations.
    Blocked,
    /// Open space. Accepts any inflow and discards it; temperature is
    /// pinned to the cosmic background.
    Vacuum,
}

impl CellState {
    /// True if the compute stages may move gas or heat out of a cell
    /// in this state.
    pub fn transfers(self) -> bool {
        matches!(self, CellState::Active)
    }

    /// True for terrain states that activity bookkeeping never
    /// overwrites. Leaving a sticky state requires an explicit
    /// [`Mutation::SetState`](crate::Mutation::SetState).
    pub fn is_sticky(self) -> bool {
        matches!(self, CellState::Blocked | CellState::Vacuum)
    }
}

impl fmt::Display for CellState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CellState::Inactive => "inactive",
            CellState::Active => "active",
            CellState::Semiactive => "semiactive",
            CellState::Blocked => "blocked",
            CellState::Vacuum => "vacuum",
        };
        write!(f, "{name}")
    }
}
