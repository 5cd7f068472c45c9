//! The commit stage: sequential application of transfer records.
//!
//! The only writer of cell contents during a tick. Applying records
//! one at a time keeps debits and credits exactly paired, so moles and
//! joules are conserved to floating-point accuracy no matter how the
//! compute work was scattered.

use atmos_core::gas::GasVec;
use atmos_core::{CellState, Direction, SimConfig};

use crate::flux::GasTransfer;
use crate::heat::HeatTransfer;
use crate::snapshot::Snapshot;

/// What a commit pass did.
#[derive(Clone, Debug, Default)]
pub struct CommitStats {
    /// Total moles moved, vented gas included.
    pub moles_moved: f32,
    /// Total joules conducted, vented heat included.
    pub joules_moved: f32,
    /// Cells promoted to `Active` by an incoming credit this tick.
    pub promoted: Vec<u32>,
}

/// Apply gas and heat transfers to the snapshot.
///
/// `gas` and `heat` are index-aligned over the active list. For each
/// source: debit what it actually holds, credit the receiving face's
/// neighbour, record the outflow as velocity for next tick's wind
/// term. Credits into `Vacuum` cells are discarded; the debit stands,
/// which is what venting to space means. A source that moved anything
/// wakes all four neighbours; one that moved less than the activity
/// threshold demotes to `Semiactive`.
pub fn apply(
    snapshot: &mut Snapshot,
    config: &SimConfig,
    gas: &[GasTransfer],
    heat: &[HeatTransfer],
) -> CommitStats {
    debug_assert_eq!(gas.len(), heat.len());
    let mut stats = CommitStats::default();
    for (g, h) in gas.iter().zip(heat) {
        debug_assert_eq!(g.cell, h.cell);
        let src = g.cell;
        let faces = snapshot.neighbours.entry(src);
        snapshot.cells[src as usize].clear_velocity();
        let mut moles_src = 0.0f32;
        let mut joules_src = 0.0f32;

        for dir in Direction::ALL {
            let Some(n) = faces[dir.index()] else {
                continue;
            };

            let ask = GasVec(g.amounts[dir.index()]);
            if ask.total() > 0.0 {
                let removed = snapshot.cells[src as usize].remove_gas(&ask);
                let moved = removed.total();
                if moved > 0.0 {
                    match snapshot.cells[n as usize].state {
                        CellState::Blocked => {
                            // Should not be proposed; restore the debit.
                            snapshot.cells[src as usize].add_gas(&removed);
                        }
                        CellState::Vacuum => {
                            snapshot.cells[src as usize].velocity[dir.index()] = removed.0;
                            moles_src += moved;
                        }
                        _ => {
                            snapshot.cells[src as usize].velocity[dir.index()] = removed.0;
                            moles_src += moved;
                            snapshot.cells[n as usize].add_gas(&removed);
                            promote(snapshot, n, &mut stats);
                        }
                    }
                }
            }

            // Credit only what the debit actually yielded: the gas
            // debit above may have shrunk the source's heat capacity
            // below what the compute stage budgeted against.
            let q = h.joules[dir.index()];
            if q > 0.0 {
                match snapshot.cells[n as usize].state {
                    CellState::Blocked => {}
                    CellState::Vacuum => {
                        joules_src += snapshot.cells[src as usize].remove_heat(q);
                    }
                    _ => {
                        let moved = snapshot.cells[src as usize].remove_heat(q);
                        if moved > 0.0 {
                            snapshot.cells[n as usize].add_heat(moved);
                            joules_src += moved;
                            promote(snapshot, n, &mut stats);
                        }
                    }
                }
            }
        }

        // Real movement disturbs the whole neighbourhood: cells uphill
        // of a draining source must wake to keep feeding the gradient,
        // or a breach would stall one tile deep.
        if moles_src > 0.0 || joules_src > 0.0 {
            for dir in Direction::ALL {
                if let Some(n) = faces[dir.index()] {
                    promote(snapshot, n, &mut stats);
                }
            }
        }

        stats.moles_moved += moles_src;
        stats.joules_moved += joules_src;
        let cell = &mut snapshot.cells[src as usize];
        if cell.state == CellState::Active
            && moles_src < config.activity_epsilon
            && joules_src <= 0.0
        {
            cell.state = CellState::Semiactive;
        }
    }
    stats
}

fn promote(snapshot: &mut Snapshot, index: u32, stats: &mut CommitStats) {
    let cell = &mut snapshot.cells[index as usize];
    if !cell.state.is_sticky() && cell.state != CellState::Active {
        cell.state = CellState::Active;
        stats.promoted.push(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atmos_core::constants::CHUNK_AREA;
    use atmos_core::gas::{Species, GAS_COUNT};
    use atmos_core::{ChunkKey, TilePos};
    use atmos_grid::{CellSeed, Map};

    fn world() -> (Map, Snapshot) {
        let mut map = Map::new();
        map.create_chunk(ChunkKey::new(0, 0), &vec![CellSeed::Wall; CHUNK_AREA])
            .unwrap();
        let mut snapshot = Snapshot::new();
        snapshot.sync_chunks(&map);
        (map, snapshot)
    }

    fn transfer_east(cell: u32, o2: f32) -> (Vec<GasTransfer>, Vec<HeatTransfer>) {
        let mut g = GasTransfer {
            cell,
            ..GasTransfer::default()
        };
        g.amounts[Direction::East.index()][Species::Oxygen.index()] = o2;
        let h = HeatTransfer {
            cell,
            ..HeatTransfer::default()
        };
        (vec![g], vec![h])
    }

    fn set_cell(snapshot: &mut Snapshot, map: &Map, pos: TilePos, o2: f32, state: CellState) -> u32 {
        let idx = map.linear_index(pos).unwrap();
        let cell = &mut snapshot.cells[idx as usize];
        cell.state = state;
        cell.gasses = GasVec::ZERO;
        cell.gasses[Species::Oxygen] = o2;
        idx
    }

    #[test]
    fn commit_conserves_moles_and_promotes_receiver() {
        let (map, mut snapshot) = world();
        let a = set_cell(&mut snapshot, &map, TilePos::new(5, 5), 100.0, CellState::Active);
        let b = set_cell(&mut snapshot, &map, TilePos::new(6, 5), 0.0, CellState::Inactive);
        snapshot.active = vec![a];

        let (gas, heat) = transfer_east(a, 10.0);
        let stats = apply(&mut snapshot, &SimConfig::default(), &gas, &heat);

        assert_eq!(snapshot.cells[a as usize].gasses[Species::Oxygen], 90.0);
        assert_eq!(snapshot.cells[b as usize].gasses[Species::Oxygen], 10.0);
        assert!((stats.moles_moved - 10.0).abs() < 1e-5);
        assert_eq!(snapshot.cells[b as usize].state, CellState::Active);
        assert_eq!(stats.promoted, vec![b]);
        // Outflow recorded as velocity for the wind term.
        assert_eq!(
            snapshot.cells[a as usize].velocity[Direction::East.index()]
                [Species::Oxygen.index()],
            10.0
        );
    }

    #[test]
    fn debit_clamps_to_what_source_holds() {
        let (map, mut snapshot) = world();
        let a = set_cell(&mut snapshot, &map, TilePos::new(5, 5), 3.0, CellState::Active);
        let b = set_cell(&mut snapshot, &map, TilePos::new(6, 5), 0.0, CellState::Inactive);
        snapshot.active = vec![a];

        let (gas, heat) = transfer_east(a, 10.0);
        apply(&mut snapshot, &SimConfig::default(), &gas, &heat);

        assert_eq!(snapshot.cells[a as usize].gasses[Species::Oxygen], 0.0);
        assert_eq!(snapshot.cells[b as usize].gasses[Species::Oxygen], 3.0);
    }

    #[test]
    fn vacuum_discards_credits_but_debit_stands() {
        let (map, mut snapshot) = world();
        let a = set_cell(&mut snapshot, &map, TilePos::new(5, 5), 100.0, CellState::Active);
        let b = map.linear_index(TilePos::new(6, 5)).unwrap();
        snapshot.cells[b as usize] = atmos_grid::Cell::space();
        snapshot.active = vec![a];

        let (gas, heat) = transfer_east(a, 10.0);
        let stats = apply(&mut snapshot, &SimConfig::default(), &gas, &heat);

        assert_eq!(snapshot.cells[a as usize].gasses[Species::Oxygen], 90.0);
        assert!(snapshot.cells[b as usize].gasses.is_empty());
        assert_eq!(snapshot.cells[b as usize].state, CellState::Vacuum);
        assert!((stats.moles_moved - 10.0).abs() < 1e-5);
        assert!(stats.promoted.is_empty());
    }

    #[test]
    fn quiet_source_demotes_to_semiactive() {
        let (map, mut snapshot) = world();
        let a = set_cell(&mut snapshot, &map, TilePos::new(5, 5), 100.0, CellState::Active);
        snapshot.active = vec![a];

        // Empty proposal: nothing to move this tick.
        let gas = vec![GasTransfer {
            cell: a,
            amounts: [[0.0; GAS_COUNT]; 4],
        }];
        let heat = vec![HeatTransfer {
            cell: a,
            joules: [0.0; 4],
        }];
        apply(&mut snapshot, &SimConfig::default(), &gas, &heat);

        assert_eq!(snapshot.cells[a as usize].state, CellState::Semiactive);
    }

    #[test]
    fn heat_credit_never_exceeds_post_debit_energy() {
        let (map, mut snapshot) = world();
        let a = set_cell(&mut snapshot, &map, TilePos::new(5, 5), 10.0, CellState::Active);
        let b = set_cell(&mut snapshot, &map, TilePos::new(6, 5), 100.0, CellState::Inactive);
        snapshot.cells[a as usize].temperature = 300.0;
        snapshot.cells[b as usize].temperature = 300.0;
        snapshot.active = vec![a];

        // One record drains the source's whole reservoir and asks for
        // its whole pre-tick energy budget on the same face. The gas
        // debit lands first and takes the heat capacity with it, so
        // only the leftover energy may follow.
        let mut g = GasTransfer {
            cell: a,
            ..GasTransfer::default()
        };
        g.amounts[Direction::East.index()][Species::Oxygen.index()] = 10.0;
        let mut h = HeatTransfer {
            cell: a,
            ..HeatTransfer::default()
        };
        h.joules[Direction::East.index()] = 60_000.0;
        let stats = apply(&mut snapshot, &SimConfig::default(), &[g], &[h]);

        assert!(stats.joules_moved < 1.0, "moved {} J", stats.joules_moved);
        assert!(snapshot.cells[a as usize].temperature >= 0.0);
        // The receiver is not boosted by joules the source never held.
        let t_b = snapshot.cells[b as usize].temperature;
        assert!((t_b - 300.0).abs() < 0.01, "t = {t_b}");
    }

    #[test]
    fn heat_commit_conserves_energy() {
        let (map, mut snapshot) = world();
        let a = set_cell(&mut snapshot, &map, TilePos::new(5, 5), 100.0, CellState::Active);
        let b = set_cell(&mut snapshot, &map, TilePos::new(6, 5), 100.0, CellState::Inactive);
        snapshot.cells[a as usize].temperature = 600.0;
        snapshot.cells[b as usize].temperature = 300.0;
        snapshot.active = vec![a];

        let energy = |snapshot: &Snapshot, i: u32| {
            let c = &snapshot.cells[i as usize];
            c.heat_capacity() * c.temperature
        };
        let before = energy(&snapshot, a) + energy(&snapshot, b);

        let gas = [GasTransfer {
            cell: a,
            ..GasTransfer::default()
        }];
        let mut h = HeatTransfer {
            cell: a,
            ..HeatTransfer::default()
        };
        h.joules[Direction::East.index()] = 500.0;
        let heat = [h];
        let stats = apply(&mut snapshot, &SimConfig::default(), &gas, &heat);

        let after = energy(&snapshot, a) + energy(&snapshot, b);
        assert!((before - after).abs() < before * 1e-5);
        assert!((stats.joules_moved - 500.0).abs() < 1e-3);
        assert!(snapshot.cells[a as usize].temperature < 600.0);
        assert!(snapshot.cells[b as usize].temperature > 300.0);
        // Conduction alone keeps the source active.
        assert_eq!(snapshot.cells[a as usize].state, CellState::Active);
    }
}
