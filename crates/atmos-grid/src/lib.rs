//! Chunked tile storage for the Atmos simulation kernel.
//!
//! The world is an unbounded 2D grid of cells, stored as 16×16 chunks
//! created on demand. Chunks are held in insertion order, which gives
//! every cell a stable dense linear index; the [`NeighbourTable`]
//! flattens adjacency into those indices so the hot compute loops
//! never do coordinate math or hash lookups.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cell;
pub mod chunk;
pub mod error;
pub mod map;
pub mod neighbours;

pub use cell::{Cell, CellSeed, CellView};
pub use chunk::Chunk;
pub use error::GridError;
pub use map::Map;
pub use neighbours::NeighbourTable;
