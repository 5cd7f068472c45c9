//! Grid error types.

use std::error::Error;
use std::fmt;

use atmos_core::ChunkKey;
use atmos_core::constants::CHUNK_AREA;

/// Errors from chunk creation and grid maintenance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GridError {
    /// The chunk key is already occupied. Chunk shape is fixed once
    /// created; re-seeding is not supported.
    ChunkExists {
        /// The occupied key.
        key: ChunkKey,
    },
    /// The seed slice does not cover exactly one chunk.
    SeedCountMismatch {
        /// Seeds provided.
        got: usize,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChunkExists { key } => write!(f, "{key} already exists"),
            Self::SeedCountMismatch { got } => {
                write!(f, "expected {CHUNK_AREA} seeds, got {got}")
            }
        }
    }
}

impl Error for GridError {}
