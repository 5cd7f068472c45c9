//! The Atmos tick engine.
//!
//! [`Atmosphere`] owns the grid, the pipe graph, the mutation queue,
//! and the compute snapshot, and advances the world one tick at a
//! time. Each tick runs a fixed pipeline:
//!
//! 1. **Refresh** — drain queued mutations into the snapshot, demote
//!    stale cells, rebuild the active and semiactive sets.
//! 2. **Flux** and **heat** compute — read-only over the snapshot,
//!    one transfer record per active cell, scattered across a worker
//!    pool for large active sets.
//! 3. **Commit** — apply every record sequentially, promote credited
//!    neighbours, demote sources that moved next to nothing.
//! 4. **Write-back** — copy touched snapshot cells to the chunk store.
//!
//! Hosts interact through [`Atmosphere`] only: queue mutations, call
//! [`step`](Atmosphere::step), read cells back.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod commit;
pub mod engine;
pub mod flux;
pub mod heat;
mod pool;
pub mod queue;
pub mod snapshot;

pub use engine::{Atmosphere, EngineError, StepReport};
pub use flux::GasTransfer;
pub use heat::HeatTransfer;
pub use queue::MutationQueue;
pub use snapshot::Snapshot;
