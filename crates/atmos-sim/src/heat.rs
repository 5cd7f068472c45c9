//! The heat stage: conduction proposals.
//!
//! Read-only over the snapshot, like the flux stage. Heat moves as
//! joules so the commit can apply it through each side's own heat
//! capacity; a hot wisp touching a dense room nudges the room barely
//! at all.

use std::ops::Range;

use atmos_core::{CellState, Direction, SimConfig};

use crate::snapshot::Snapshot;

/// Proposed conduction out of one active cell, in joules per face.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HeatTransfer {
    /// Linear index of the source cell.
    pub cell: u32,
    /// Outgoing energy per face.
    pub joules: [f32; 4],
}

impl HeatTransfer {
    /// Total joules this transfer would move.
    pub fn total(&self) -> f32 {
        self.joules.iter().sum()
    }
}

/// Compute proposed conduction for `snapshot.active[range]`.
///
/// Only flows from hotter to colder; a cell at equilibrium with all
/// neighbours proposes nothing. The per-face sum is clamped to the
/// thermal energy the source actually holds.
pub fn compute(
    snapshot: &Snapshot,
    config: &SimConfig,
    dt: f32,
    range: Range<usize>,
) -> Vec<HeatTransfer> {
    let scale = dt * config.sim_speed * config.thermal_base;
    let mut out = Vec::with_capacity(range.len());
    for &index in &snapshot.active[range] {
        let cell = &snapshot.cells[index as usize];
        let mut transfer = HeatTransfer {
            cell: index,
            ..HeatTransfer::default()
        };
        if cell.state.transfers() {
            for dir in Direction::ALL {
                let Some(n) = snapshot.neighbours.neighbour(index, dir) else {
                    continue;
                };
                let nbr = &snapshot.cells[n as usize];
                if nbr.state == CellState::Blocked {
                    continue;
                }
                let dtemp = cell.temperature - nbr.temperature;
                if dtemp <= config.thermal_epsilon {
                    continue;
                }
                let q = dtemp * cell.volume * scale;
                if q.is_finite() && q > 0.0 {
                    transfer.joules[dir.index()] = q;
                }
            }
            // Never propose more energy than the source holds.
            let budget = cell.heat_capacity() * cell.temperature;
            let outgoing = transfer.total();
            if outgoing > budget && outgoing > 0.0 {
                let factor = budget.max(0.0) / outgoing;
                for q in &mut transfer.joules {
                    *q *= factor;
                }
            }
        }
        out.push(transfer);
    }
    out
}
