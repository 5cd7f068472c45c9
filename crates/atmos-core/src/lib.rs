//! Core types for the Atmos gas simulation kernel.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental vocabulary used throughout the Atmos workspace:
//! tile and chunk addressing, gas species and mixtures, the equation
//! of state, cell lifecycle states, mutations, and simulation
//! configuration.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod constants;
pub mod error;
pub mod gas;
pub mod id;
pub mod mutation;
pub mod state;

pub use config::{PressureLaw, SimConfig, TransferMode};
pub use error::ConfigError;
pub use gas::{heat_capacity, partial_pressure, pressure, GasVec, Species, GAS_COUNT};
pub use id::{ChunkKey, Direction, Layer, NetId, TickId, TilePos};
pub use mutation::{Mutation, MutationRecord};
pub use state::CellState;
