//! Flattened neighbour topology.

use atmos_core::constants::{CHUNK_AREA, CHUNK_DIM};
use atmos_core::Direction;

use crate::map::Map;

/// Per-cell table of the four cardinal neighbours as linear indices.
///
/// `None` marks an edge into unpaved territory; such faces are sealed
/// and transfer nothing. The table is rebuilt incrementally: creating
/// a chunk fills entries for its own cells and patches the border
/// cells of already-created adjacent chunks, leaving everything else
/// untouched.
#[derive(Clone, Debug, Default)]
pub struct NeighbourTable {
    entries: Vec<[Option<u32>; 4]>,
}

impl NeighbourTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cells covered.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no cells are covered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The neighbour of `index` in `dir`, if that tile is paved.
    pub fn neighbour(&self, index: u32, dir: Direction) -> Option<u32> {
        self.entries[index as usize][dir.index()]
    }

    /// All four neighbours of `index`, in direction index order.
    pub fn entry(&self, index: u32) -> [Option<u32>; 4] {
        self.entries[index as usize]
    }

    /// Bring the table up to date with `map` after chunk creation.
    ///
    /// Appends entries for chunks created since the last call and
    /// patches the facing border cells of their existing neighbours.
    /// No-op when nothing changed.
    pub fn sync(&mut self, map: &Map) {
        let covered_chunks = self.entries.len() / CHUNK_AREA;
        let total_chunks = map.chunk_count();
        if covered_chunks == total_chunks {
            return;
        }
        self.entries.resize(total_chunks * CHUNK_AREA, [None; 4]);
        for slot in covered_chunks..total_chunks {
            let key = map.key_at(slot);
            let base = (slot * CHUNK_AREA) as u32;
            for local in 0..CHUNK_AREA {
                let index = base + local as u32;
                self.recompute(map, index);
                // Patch paved cells facing this chunk from outside.
                // Interior neighbours get recomputed redundantly, which
                // is harmless; only border tiles reach other chunks.
                if local < CHUNK_DIM
                    || local >= CHUNK_AREA - CHUNK_DIM
                    || local % CHUNK_DIM == 0
                    || local % CHUNK_DIM == CHUNK_DIM - 1
                {
                    let pos = key.tile(local);
                    for dir in Direction::ALL {
                        let there = pos.step(dir);
                        if there.chunk() != key {
                            if let Some(outer) = map.linear_index(there) {
                                if (outer as usize) < covered_chunks * CHUNK_AREA {
                                    self.recompute(map, outer);
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    fn recompute(&mut self, map: &Map, index: u32) {
        let pos = map.position_of(index);
        let mut entry = [None; 4];
        for dir in Direction::ALL {
            entry[dir.index()] = map.linear_index(pos.step(dir));
        }
        self.entries[index as usize] = entry;
    }
}
