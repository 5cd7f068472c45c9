//! Atmos: a chunked gas and heat simulation kernel for tile-based worlds.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Atmos sub-crates. For most users, adding `atmos` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use atmos::prelude::*;
//! use atmos::core::constants::CHUNK_AREA;
//!
//! // Pave one chunk of solid wall, then carve a two-tile room.
//! let mut engine = Atmosphere::new(SimConfig::default()).unwrap();
//! engine
//!     .create_chunk_with(ChunkKey::new(0, 0), &vec![CellSeed::Wall; CHUNK_AREA])
//!     .unwrap();
//! let a = TilePos::new(5, 5);
//! let b = TilePos::new(6, 5);
//! engine.queue_set_state(a, Layer::Environment, CellState::Inactive);
//! engine.queue_set_state(b, Layer::Environment, CellState::Inactive);
//!
//! // Release a burst of oxygen and let it spread.
//! let mut o2 = GasVec::ZERO;
//! o2[Species::Oxygen] = 100.0;
//! engine.queue_add_gas(a, Layer::Environment, o2);
//! let report = engine.step(1.0);
//!
//! assert_eq!(report.tick, atmos::core::TickId(1));
//! assert!(report.moles_moved > 0.0);
//! let view = engine.cell(b, Layer::Environment).unwrap();
//! assert!(view.gasses[Species::Oxygen] > 0.0);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the
//! prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`core`] | `atmos-core` | IDs, gas vectors, physics constants, config, mutations |
//! | [`grid`] | `atmos-grid` | Cells, chunks, the map, neighbour tables |
//! | [`pipes`] | `atmos-pipes` | Pipe graph topology and pooled-net operations |
//! | [`sim`] | `atmos-sim` | The [`sim::Atmosphere`] tick engine |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, physics constants, and configuration (`atmos-core`).
///
/// Contains [`core::TilePos`], [`core::gas::GasVec`], the gas-law
/// functions, [`core::SimConfig`], and the mutation types.
pub use atmos_core as core;

/// Cell and chunk storage (`atmos-grid`).
///
/// Provides [`grid::Map`], [`grid::Chunk`], [`grid::Cell`], seeded chunk
/// creation via [`grid::CellSeed`], and the [`grid::NeighbourTable`].
pub use atmos_grid as grid;

/// Pipe networks (`atmos-pipes`).
///
/// The [`pipes::PipeGraph`] tracks segment connectivity and supports
/// pooled equalisation and gas injection per net.
pub use atmos_pipes as pipes;

/// The tick engine (`atmos-sim`).
///
/// [`sim::Atmosphere`] is the single host-facing handle: queue
/// mutations, step the world, read cells back.
pub use atmos_sim as sim;

/// Common imports for typical Atmos usage.
///
/// ```rust
/// use atmos::prelude::*;
/// ```
///
/// This imports the engine handle, configuration, the gas and position
/// types, and everything needed to seed a world and queue mutations.
pub mod prelude {
    // Engine
    pub use atmos_sim::{Atmosphere, EngineError, StepReport};

    // Core types
    pub use atmos_core::gas::{GasVec, Species};
    pub use atmos_core::{
        CellState, ChunkKey, Direction, Layer, Mutation, MutationRecord, NetId, PressureLaw,
        SimConfig, TilePos, TransferMode,
    };

    // Grid
    pub use atmos_grid::{CellSeed, CellView};
}
