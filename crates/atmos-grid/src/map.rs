//! The chunk store.

use indexmap::IndexMap;

use atmos_core::constants::CHUNK_AREA;
use atmos_core::{ChunkKey, Layer, TilePos};

use crate::cell::{Cell, CellSeed};
use crate::chunk::Chunk;
use crate::error::GridError;

/// All created chunks, in creation order.
///
/// Creation order is load-bearing: the position of a chunk in the map
/// times [`CHUNK_AREA`] plus a cell's local index is that cell's
/// stable linear index, used by the tick snapshot and the neighbour
/// table. Chunks are never removed, so linear indices never move.
#[derive(Clone, Debug, Default)]
pub struct Map {
    chunks: IndexMap<ChunkKey, Chunk>,
}

impl Map {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and seed the chunk at `key`.
    ///
    /// `seeds` covers the environment layer row-major and must hold
    /// exactly [`CHUNK_AREA`] entries. Fails if the key is occupied;
    /// chunk shape is fixed once created.
    pub fn create_chunk(&mut self, key: ChunkKey, seeds: &[CellSeed]) -> Result<(), GridError> {
        if seeds.len() != CHUNK_AREA {
            return Err(GridError::SeedCountMismatch { got: seeds.len() });
        }
        if self.chunks.contains_key(&key) {
            return Err(GridError::ChunkExists { key });
        }
        self.chunks.insert(key, Chunk::from_seeds(seeds));
        Ok(())
    }

    /// Number of created chunks.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Number of cells per layer across all created chunks.
    pub fn cell_count(&self) -> usize {
        self.chunks.len() * CHUNK_AREA
    }

    /// True if the chunk containing `pos` has been created.
    pub fn is_paved(&self, pos: TilePos) -> bool {
        self.chunks.contains_key(&pos.chunk())
    }

    /// The key of the chunk in creation slot `slot`.
    pub fn key_at(&self, slot: usize) -> ChunkKey {
        *self
            .chunks
            .get_index(slot)
            .map(|(key, _)| key)
            .unwrap_or_else(|| panic!("chunk slot {slot} out of range"))
    }

    /// The cell at `pos` on `layer`, if its chunk exists.
    pub fn cell(&self, pos: TilePos, layer: Layer) -> Option<&Cell> {
        self.chunks
            .get(&pos.chunk())
            .map(|chunk| chunk.cell(layer, pos.local_index()))
    }

    /// Mutable access to the cell at `pos` on `layer`.
    pub fn cell_mut(&mut self, pos: TilePos, layer: Layer) -> Option<&mut Cell> {
        self.chunks
            .get_mut(&pos.chunk())
            .map(|chunk| chunk.cell_mut(layer, pos.local_index()))
    }

    /// Stable linear index of `pos`, if its chunk exists.
    ///
    /// Indices are dense in `0..cell_count()` and shared between
    /// layers; they identify a tile, not a layer.
    pub fn linear_index(&self, pos: TilePos) -> Option<u32> {
        self.chunks
            .get_index_of(&pos.chunk())
            .map(|slot| (slot * CHUNK_AREA + pos.local_index()) as u32)
    }

    /// Tile position of a linear index. Inverse of [`linear_index`](Map::linear_index).
    pub fn position_of(&self, index: u32) -> TilePos {
        let slot = index as usize / CHUNK_AREA;
        let local = index as usize % CHUNK_AREA;
        self.key_at(slot).tile(local)
    }

    /// The cell at linear `index` on `layer`.
    pub fn cell_at(&self, index: u32, layer: Layer) -> &Cell {
        let slot = index as usize / CHUNK_AREA;
        let local = index as usize % CHUNK_AREA;
        let (_, chunk) = self
            .chunks
            .get_index(slot)
            .unwrap_or_else(|| panic!("cell index {index} out of range"));
        chunk.cell(layer, local)
    }

    /// Mutable access to the cell at linear `index` on `layer`.
    pub fn cell_at_mut(&mut self, index: u32, layer: Layer) -> &mut Cell {
        let slot = index as usize / CHUNK_AREA;
        let local = index as usize % CHUNK_AREA;
        let (_, chunk) = self
            .chunks
            .get_index_mut(slot)
            .unwrap_or_else(|| panic!("cell index {index} out of range"));
        chunk.cell_mut(layer, local)
    }

    /// Created chunks in creation order.
    pub fn chunks(&self) -> impl Iterator<Item = (&ChunkKey, &Chunk)> {
        self.chunks.iter()
    }
}
