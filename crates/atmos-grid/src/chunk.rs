//! Fixed-size chunks of cells.

use atmos_core::constants::CHUNK_AREA;
use atmos_core::Layer;

use crate::cell::{Cell, CellSeed};

/// A 16×16 block of tiles, one grid of cells per layer.
///
/// Cells are stored row-major. The pipe layer starts out as empty
/// sealed segments everywhere; pipe topology is tracked separately by
/// the pipe graph.
#[derive(Clone, Debug)]
pub struct Chunk {
    layers: [Vec<Cell>; Layer::COUNT],
}

impl Chunk {
    /// Build a chunk from exactly [`CHUNK_AREA`] environment seeds.
    ///
    /// Callers validate the seed count; see
    /// [`Map::create_chunk`](crate::Map::create_chunk).
    pub fn from_seeds(seeds: &[CellSeed]) -> Self {
        debug_assert_eq!(seeds.len(), CHUNK_AREA);
        let environment = seeds.iter().map(|s| s.build()).collect();
        let pipe = vec![Cell::pipe(); CHUNK_AREA];
        Self {
            layers: [environment, pipe],
        }
    }

    /// The cell at `local` (row-major, `0..CHUNK_AREA`) on `layer`.
    pub fn cell(&self, layer: Layer, local: usize) -> &Cell {
        &self.layers[layer.index()][local]
    }

    /// Mutable access to the cell at `local` on `layer`.
    pub fn cell_mut(&mut self, layer: Layer, local: usize) -> &mut Cell {
        &mut self.layers[layer.index()][local]
    }

    /// All cells of one layer, row-major.
    pub fn cells(&self, layer: Layer) -> &[Cell] {
        &self.layers[layer.index()]
    }
}
