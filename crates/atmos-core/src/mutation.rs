//! Mutations: the write interface between hosts and the simulation.
//!
//! Hosts never touch cells directly. They queue [`MutationRecord`]s,
//! which the engine drains in submission order at the start of the
//! next tick, before any transfer is computed. This keeps writes
//! deterministic and keeps the compute stages free of aliasing.

use crate::gas::GasVec;
use crate::id::{Layer, TilePos};
use crate::state::CellState;

/// A single requested change to one cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Mutation {
    /// Add the given moles to the cell.
    AddGas(GasVec),
    /// Remove up to the given moles, clamping each species at zero.
    RemoveGas(GasVec),
    /// Add thermal energy, in joules.
    AddHeat(f32),
    /// Remove up to the given thermal energy, in joules. Temperature
    /// clamps at absolute zero.
    RemoveHeat(f32),
    /// Overwrite the cell's lifecycle state. The only way in or out of
    /// [`CellState::Blocked`] and [`CellState::Vacuum`].
    SetState(CellState),
}

/// A [`Mutation`] addressed to a cell.
///
/// Targets that do not resolve to a created chunk are dropped silently
/// when the queue is drained.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MutationRecord {
    /// Tile the mutation applies to.
    pub pos: TilePos,
    /// Layer of the targeted cell.
    pub layer: Layer,
    /// The change to apply.
    pub mutation: Mutation,
}

impl MutationRecord {
    /// Create a record targeting any layer.
    pub fn new(pos: TilePos, layer: Layer, mutation: Mutation) -> Self {
        Self {
            pos,
            layer,
            mutation,
        }
    }

    /// Create a record targeting the environment layer.
    pub fn environment(pos: TilePos, mutation: Mutation) -> Self {
        Self {
            pos,
            layer: Layer::Environment,
            mutation,
        }
    }

    /// Create a record targeting the pipe layer.
    pub fn pipe(pos: TilePos, mutation: Mutation) -> Self {
        Self {
            pos,
            layer: Layer::Pipe,
            mutation,
        }
    }
}
