//! The flux stage: gas movement proposals.
//!
//! Read-only over the snapshot. Each active cell yields one
//! [`GasTransfer`] describing its proposed outflow per face and
//! species; nothing is written until commit. Proposals are clamped so
//! a cell never promises more of a species than it holds, then scaled
//! by drag.

use std::ops::Range;

use atmos_core::constants::GAS_MIN_MOLES;
use atmos_core::gas::{Species, GAS_COUNT};
use atmos_core::{CellState, Direction, SimConfig, TransferMode};
use atmos_grid::Cell;

use crate::snapshot::Snapshot;

/// Proposed outflow from one active cell, in moles, indexed
/// `[direction][species]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GasTransfer {
    /// Linear index of the source cell.
    pub cell: u32,
    /// Outflow per face and species.
    pub amounts: [[f32; GAS_COUNT]; 4],
}

impl GasTransfer {
    /// Total moles this transfer would move.
    pub fn total(&self) -> f32 {
        self.amounts.iter().flatten().sum()
    }
}

/// Compute proposed outflow for `snapshot.active[range]`.
///
/// Ranges are disjoint across workers and the output is ordered like
/// the active list, so scattered results concatenate into exactly the
/// sequence a single-threaded pass would produce.
pub fn compute(
    snapshot: &Snapshot,
    config: &SimConfig,
    dt: f32,
    range: Range<usize>,
) -> Vec<GasTransfer> {
    let scale = dt * config.sim_speed;
    let mut out = Vec::with_capacity(range.len());
    for &index in &snapshot.active[range] {
        let cell = &snapshot.cells[index as usize];
        let mut transfer = GasTransfer {
            cell: index,
            ..GasTransfer::default()
        };
        if cell.state.transfers() {
            match config.transfer_mode {
                TransferMode::ActiveFlux => {
                    active_flux(snapshot, config, cell, index, scale, &mut transfer.amounts)
                }
                TransferMode::Diffusion => {
                    diffusion(snapshot, config, cell, index, scale, &mut transfer.amounts)
                }
            }
            clamp_to_reservoir(cell, &mut transfer.amounts);
            for row in &mut transfer.amounts {
                for v in row.iter_mut() {
                    *v *= config.drag;
                    if !v.is_finite() {
                        *v = 0.0;
                    }
                }
            }
        }
        out.push(transfer);
    }
    out
}

/// Per-species concentration diffusion.
fn diffusion(
    snapshot: &Snapshot,
    config: &SimConfig,
    cell: &Cell,
    index: u32,
    scale: f32,
    amounts: &mut [[f32; GAS_COUNT]; 4],
) {
    for dir in Direction::ALL {
        let Some(n) = snapshot.neighbours.neighbour(index, dir) else {
            continue;
        };
        let nbr = &snapshot.cells[n as usize];
        if nbr.state == CellState::Blocked {
            continue;
        }
        if cell.gasses.max_delta(&nbr.gasses) <= config.diffusion_epsilon {
            continue;
        }
        for s in Species::ALL {
            let diff = cell.gasses[s] - nbr.gasses[s];
            if diff <= config.diffusion_epsilon {
                continue;
            }
            amounts[dir.index()][s.index()] = diff * s.diffusion_rate() * scale;
        }
    }
}

/// Pressure-driven bulk flow with a velocity bias.
///
/// Flow down each species' partial-pressure gradient, amplified by a
/// wind term carrying last tick's momentum: flow that entered from the
/// upstream face reinforces this face, the neighbour's counterflow
/// cancels the bias back down to the bare gradient. The entering term
/// only counts when the grid continues behind the upstream cell, so a
/// dead end does not fake momentum.
fn active_flux(
    snapshot: &Snapshot,
    config: &SimConfig,
    cell: &Cell,
    index: u32,
    scale: f32,
    amounts: &mut [[f32; GAS_COUNT]; 4],
) {
    let law = config.pressure_law;
    let p_self = cell.pressure(law);
    for dir in Direction::ALL {
        let Some(n) = snapshot.neighbours.neighbour(index, dir) else {
            continue;
        };
        let nbr = &snapshot.cells[n as usize];
        if nbr.state == CellState::Blocked {
            continue;
        }
        let p_nbr = nbr.pressure(law);
        let dp = p_self - p_nbr;
        let near_vacuum = dp.abs() <= config.pressure_epsilon && p_nbr <= config.pressure_epsilon;
        if near_vacuum || dp.abs() <= config.diffusion_epsilon {
            continue;
        }
        let upstream = snapshot
            .neighbours
            .neighbour(index, dir.opposite())
            .filter(|&u| snapshot.neighbours.neighbour(u, dir.opposite()).is_some());
        for s in Species::ALL {
            let dpp = cell.partial_pressure(law, s) - nbr.partial_pressure(law, s);
            if dpp <= 0.0 {
                continue;
            }
            let entering = upstream
                .map(|u| snapshot.cells[u as usize].velocity[dir.index()][s.index()])
                .unwrap_or(0.0);
            let opposing = nbr.velocity[dir.opposite().index()][s.index()];
            let wind = (entering - opposing).max(0.0);
            let amount =
                (1.0 + config.wind_factor * wind) * dpp * config.active_flux_factor * scale;
            if amount > GAS_MIN_MOLES {
                amounts[dir.index()][s.index()] = amount;
            }
        }
    }
}

/// Scale down each species' proposals so their sum never exceeds what
/// the cell holds.
fn clamp_to_reservoir(cell: &Cell, amounts: &mut [[f32; GAS_COUNT]; 4]) {
    for s in 0..GAS_COUNT {
        let outgoing: f32 = (0..4).map(|d| amounts[d][s]).sum();
        if outgoing <= GAS_MIN_MOLES {
            continue;
        }
        let available = cell.gasses.0[s].max(0.0);
        if outgoing > available {
            let factor = available / outgoing;
            for d in 0..4 {
                amounts[d][s] *= factor;
            }
        }
    }
}
