//! The compute snapshot.

use atmos_core::constants::CHUNK_AREA;
use atmos_core::Layer;
use atmos_grid::{Cell, Map, NeighbourTable};

/// Flat mirror of the environment layer for the compute stages.
///
/// Cells sit at their stable linear indices, so the flux and heat
/// stages index straight into `cells` and `neighbours` with no
/// coordinate math. The active and semiactive sets are sorted lists of
/// linear indices, rebuilt each refresh.
///
/// Between ticks the engine owns the snapshot exclusively; during the
/// compute stages it is shared read-only with the worker pool.
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    /// Environment cells, in linear index order.
    pub cells: Vec<Cell>,
    /// Flattened adjacency, aligned with `cells`.
    pub neighbours: NeighbourTable,
    /// Linear indices of cells computed this tick. Sorted.
    pub active: Vec<u32>,
    /// Linear indices of recently active cells. Sorted.
    pub semiactive: Vec<u32>,
}

impl Snapshot {
    /// An empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mirror chunks created in `map` since the last call.
    ///
    /// Appends the new chunks' environment cells and extends the
    /// neighbour table. Existing entries keep their indices and
    /// contents.
    pub fn sync_chunks(&mut self, map: &Map) {
        let covered = self.cells.len() / CHUNK_AREA;
        if covered == map.chunk_count() {
            return;
        }
        for (_, chunk) in map.chunks().skip(covered) {
            self.cells.extend_from_slice(chunk.cells(Layer::Environment));
        }
        self.neighbours.sync(map);
    }

    /// Copy the snapshot cell at `index` back to the chunk store.
    pub fn write_back(&self, map: &mut Map, index: u32) {
        *map.cell_at_mut(index, Layer::Environment) = self.cells[index as usize];
    }
}
