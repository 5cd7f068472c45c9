//! Pooled mixture operations over a net's member segments.

use atmos_core::gas::GasVec;
use atmos_core::{Layer, NetId, TilePos};
use atmos_grid::Map;

use crate::graph::PipeGraph;

/// A connected pipe network: the segments it owns.
#[derive(Clone, Debug, Default)]
pub struct PipeNet {
    /// Member segment positions, in placement order.
    pub(crate) members: Vec<TilePos>,
}

impl PipeGraph {
    /// Equalise `net`: pool the gas and thermal energy of every member
    /// segment and redistribute both evenly.
    ///
    /// Gas splits into equal shares per segment; the pooled
    /// temperature is the heat-capacity-weighted mean, so equalising
    /// conserves both moles and joules. Members whose chunk has not
    /// been created are skipped. Returns `false` without touching
    /// anything if the net is unknown or has no reachable members.
    pub fn equalize(&self, net: NetId, map: &mut Map) -> bool {
        let members = match self.nets.get(&net) {
            Some(n) => &n.members,
            None => return false,
        };
        let mut total = GasVec::ZERO;
        let mut energy = 0.0f32;
        let mut capacity = 0.0f32;
        let mut reachable = 0usize;
        for &pos in members {
            if let Some(cell) = map.cell(pos, Layer::Pipe) {
                total += cell.gasses;
                let cap = cell.heat_capacity();
                energy += cap * cell.temperature;
                capacity += cap;
                reachable += 1;
            }
        }
        if reachable == 0 {
            return false;
        }
        let share = total.scaled(1.0 / reachable as f32);
        let temperature = energy / capacity;
        for &pos in members {
            if let Some(cell) = map.cell_mut(pos, Layer::Pipe) {
                cell.gasses = share;
                cell.temperature = temperature;
            }
        }
        true
    }

    /// Add `amounts` to `net`, split evenly across reachable members.
    ///
    /// Returns `false` without touching anything if the net is unknown
    /// or has no reachable members.
    pub fn add_gasses(&self, net: NetId, map: &mut Map, amounts: &GasVec) -> bool {
        let members = match self.nets.get(&net) {
            Some(n) => &n.members,
            None => return false,
        };
        let reachable = members.iter().filter(|p| map.is_paved(**p)).count();
        if reachable == 0 {
            return false;
        }
        let share = amounts.scaled(1.0 / reachable as f32);
        for &pos in members {
            if let Some(cell) = map.cell_mut(pos, Layer::Pipe) {
                cell.add_gas(&share);
            }
        }
        true
    }

    /// Remove up to `amounts` from `net`, asking each reachable member
    /// for an even share and clamping per segment. Returns what was
    /// actually removed; an equalised net yields the full request or
    /// everything it has.
    pub fn remove_gasses(&self, net: NetId, map: &mut Map, amounts: &GasVec) -> GasVec {
        let members = match self.nets.get(&net) {
            Some(n) => &n.members,
            None => return GasVec::ZERO,
        };
        let reachable = members.iter().filter(|p| map.is_paved(**p)).count();
        if reachable == 0 {
            return GasVec::ZERO;
        }
        let share = amounts.scaled(1.0 / reachable as f32);
        let mut removed = GasVec::ZERO;
        for &pos in members {
            if let Some(cell) = map.cell_mut(pos, Layer::Pipe) {
                removed += cell.remove_gas(&share);
            }
        }
        removed
    }
}
