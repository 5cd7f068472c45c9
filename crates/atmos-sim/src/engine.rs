//! The [`Atmosphere`] engine: the single host-facing handle.

use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use atmos_core::constants::{CHUNK_AREA, TCMB};
use atmos_core::gas::GasVec;
use atmos_core::{
    CellState, ChunkKey, ConfigError, Direction, Layer, Mutation, MutationRecord, NetId,
    SimConfig, TickId, TilePos,
};
use atmos_grid::{Cell, CellSeed, CellView, GridError, Map};
use atmos_pipes::PipeGraph;

use crate::commit::{self, CommitStats};
use crate::flux::{self, GasTransfer};
use crate::heat::{self, HeatTransfer};
use crate::pool::WorkerPool;
use crate::queue::MutationQueue;
use crate::snapshot::Snapshot;

/// Errors from engine construction.
#[derive(Debug)]
pub enum EngineError {
    /// Configuration failed validation.
    Config(ConfigError),
    /// A compute worker thread could not be spawned.
    ThreadSpawnFailed {
        /// Description of the spawn failure.
        reason: String,
    },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "invalid config: {e}"),
            Self::ThreadSpawnFailed { reason } => write!(f, "thread spawn failed: {reason}"),
        }
    }
}

impl Error for EngineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for EngineError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// What one call to [`Atmosphere::step`] did.
#[derive(Clone, Copy, Debug)]
pub struct StepReport {
    /// The tick that was just completed.
    pub tick: TickId,
    /// Cells the compute stages visited.
    pub active_cells: usize,
    /// Cells kept warm but not computed.
    pub semiactive_cells: usize,
    /// Total moles moved, vented gas included.
    pub moles_moved: f32,
    /// Total joules conducted, vented heat included.
    pub joules_moved: f32,
    /// Wall-clock duration of the tick.
    pub elapsed: Duration,
}

/// The simulation: grid, pipe graph, mutation queue, snapshot, and
/// worker pool behind one handle.
///
/// Everything goes through `&mut self`, so a queued mutation can never
/// interleave with a running tick and a pipe pooled operation can
/// never observe a half-updated topology.
pub struct Atmosphere {
    config: SimConfig,
    map: Map,
    snapshot: Snapshot,
    queue: MutationQueue,
    pipes: PipeGraph,
    pool: Option<WorkerPool>,
    tick: TickId,
    /// Cells promoted by last tick's commit; refresh candidates.
    promoted: Vec<u32>,
    /// Cells whose snapshot entry must be written back this tick.
    dirty: Vec<u32>,
}

impl Atmosphere {
    /// Build an engine from a validated config.
    ///
    /// Spawns the compute worker pool unless the resolved worker count
    /// is 1, in which case every tick computes inline.
    pub fn new(config: SimConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let workers = config.resolved_worker_count();
        let pool = if workers > 1 {
            let pool = WorkerPool::new(workers).map_err(|e| EngineError::ThreadSpawnFailed {
                reason: e.to_string(),
            })?;
            Some(pool)
        } else {
            None
        };
        Ok(Self {
            config,
            map: Map::new(),
            snapshot: Snapshot::new(),
            queue: MutationQueue::new(),
            pipes: PipeGraph::new(),
            pool,
            tick: TickId(0),
            promoted: Vec::new(),
            dirty: Vec::new(),
        })
    }

    /// The engine's configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Ticks completed so far.
    pub fn tick(&self) -> TickId {
        self.tick
    }

    /// Create the chunk at `key`, seeded entirely with standard air.
    /// The new cells join the simulation at the start of the next tick.
    pub fn create_chunk(&mut self, key: ChunkKey) -> Result<(), GridError> {
        self.map
            .create_chunk(key, &[CellSeed::Air; CHUNK_AREA])
    }

    /// Create the chunk at `key` from explicit per-tile seeds.
    pub fn create_chunk_with(&mut self, key: ChunkKey, seeds: &[CellSeed]) -> Result<(), GridError> {
        self.map.create_chunk(key, seeds)
    }

    /// Read one cell, with derived pressure, from the authoritative
    /// chunk store. Queued mutations are not visible until the next
    /// tick applies them.
    pub fn cell(&self, pos: TilePos, layer: Layer) -> Option<CellView> {
        self.map
            .cell(pos, layer)
            .map(|cell| CellView::new(pos, layer, cell, self.config.pressure_law))
    }

    /// Queue a mutation for the next tick. Targets on unpaved chunks
    /// are dropped silently when the queue drains.
    pub fn queue_mutation(&mut self, record: MutationRecord) {
        self.queue.push(record);
    }

    /// Mutations waiting for the next tick.
    pub fn pending_mutations(&self) -> usize {
        self.queue.len()
    }

    /// Queue adding `amounts` of gas to the cell at `pos`.
    pub fn queue_add_gas(&mut self, pos: TilePos, layer: Layer, amounts: GasVec) {
        self.queue.push(MutationRecord::new(pos, layer, Mutation::AddGas(amounts)));
    }

    /// Queue removing up to `amounts` of gas from the cell at `pos`.
    pub fn queue_remove_gas(&mut self, pos: TilePos, layer: Layer, amounts: GasVec) {
        self.queue.push(MutationRecord::new(pos, layer, Mutation::RemoveGas(amounts)));
    }

    /// Queue adding `joules` of thermal energy to the cell at `pos`.
    pub fn queue_add_heat(&mut self, pos: TilePos, layer: Layer, joules: f32) {
        self.queue.push(MutationRecord::new(pos, layer, Mutation::AddHeat(joules)));
    }

    /// Queue removing up to `joules` of thermal energy from the cell at `pos`.
    pub fn queue_remove_heat(&mut self, pos: TilePos, layer: Layer, joules: f32) {
        self.queue.push(MutationRecord::new(pos, layer, Mutation::RemoveHeat(joules)));
    }

    /// Queue a state change for the cell at `pos`. The only mutation a
    /// `Blocked` or `Vacuum` cell honours.
    pub fn queue_set_state(&mut self, pos: TilePos, layer: Layer, state: CellState) {
        self.queue.push(MutationRecord::new(pos, layer, Mutation::SetState(state)));
    }

    /// Advance the simulation by `dt` seconds.
    pub fn step(&mut self, dt: f32) -> StepReport {
        let started = Instant::now();
        self.refresh();
        let (gas, heat) = self.compute(dt);
        let stats = commit::apply(&mut self.snapshot, &self.config, &gas, &heat);
        self.write_back(&stats);
        self.tick = TickId(self.tick.0 + 1);
        StepReport {
            tick: self.tick,
            active_cells: self.snapshot.active.len(),
            semiactive_cells: self.snapshot.semiactive.len(),
            moles_moved: stats.moles_moved,
            joules_moved: stats.joules_moved,
            elapsed: started.elapsed(),
        }
    }

    // ── pipe surface ──

    /// Place a pipe segment; see [`PipeGraph::add_segment`].
    pub fn pipe_add_segment(&mut self, pos: TilePos) -> NetId {
        self.pipes.add_segment(pos)
    }

    /// Remove a pipe segment; see [`PipeGraph::remove_segment`].
    pub fn pipe_remove_segment(&mut self, pos: TilePos) -> Option<NetId> {
        self.pipes.remove_segment(pos)
    }

    /// The net owning the segment at `pos`, if any.
    pub fn pipe_net_at(&self, pos: TilePos) -> Option<NetId> {
        self.pipes.net_at(pos)
    }

    /// Member segments of `net`, if it exists.
    pub fn pipe_members(&self, net: NetId) -> Option<&[TilePos]> {
        self.pipes.members(net)
    }

    /// Equalise a net's pooled mixture across its segments.
    pub fn pipe_equalize(&mut self, net: NetId) -> bool {
        self.pipes.equalize(net, &mut self.map)
    }

    /// Add gas to a net, split evenly across its segments.
    pub fn pipe_add_gasses(&mut self, net: NetId, amounts: &GasVec) -> bool {
        self.pipes.add_gasses(net, &mut self.map, amounts)
    }

    /// Remove up to `amounts` from a net. Returns what was removed.
    pub fn pipe_remove_gasses(&mut self, net: NetId, amounts: &GasVec) -> GasVec {
        self.pipes.remove_gasses(net, &mut self.map, amounts)
    }

    // ── tick pipeline ──

    /// Sync new chunks, demote stale semiactive cells, drain the
    /// mutation queue, rebuild the active and semiactive sets.
    fn refresh(&mut self) {
        self.snapshot.sync_chunks(&self.map);

        let mut candidates = std::mem::take(&mut self.promoted);
        candidates.extend_from_slice(&self.snapshot.active);
        candidates.extend_from_slice(&self.snapshot.semiactive);
        self.dirty.extend_from_slice(&self.snapshot.semiactive);

        // A cell that sat out a full tick as semiactive goes quiet.
        let stale = std::mem::take(&mut self.snapshot.semiactive);
        for &i in &stale {
            let cell = &mut self.snapshot.cells[i as usize];
            if cell.state == CellState::Semiactive {
                cell.state = CellState::Inactive;
            }
        }

        for record in self.queue.drain() {
            match record.layer {
                Layer::Environment => {
                    if let Some(index) = self.map.linear_index(record.pos) {
                        apply_to_cell(&mut self.snapshot.cells[index as usize], record.mutation);
                        candidates.push(index);
                        // A state change reshapes the local topology:
                        // wake the neighbours so a fresh breach drains
                        // and an unsealed room starts mixing.
                        if matches!(record.mutation, Mutation::SetState(_)) {
                            for dir in Direction::ALL {
                                let Some(n) = self.map.linear_index(record.pos.step(dir)) else {
                                    continue;
                                };
                                let cell = &mut self.snapshot.cells[n as usize];
                                if !cell.state.is_sticky() {
                                    cell.state = CellState::Active;
                                    candidates.push(n);
                                }
                            }
                        }
                    }
                }
                // Pipe cells are outside the tick pipeline; writes land
                // directly in the chunk store.
                Layer::Pipe => {
                    if let Some(cell) = self.map.cell_mut(record.pos, Layer::Pipe) {
                        apply_to_cell(cell, record.mutation);
                    }
                }
            }
        }

        candidates.sort_unstable();
        candidates.dedup();
        self.dirty.extend_from_slice(&candidates);

        self.snapshot.active.clear();
        for &i in &candidates {
            match self.snapshot.cells[i as usize].state {
                CellState::Active => self.snapshot.active.push(i),
                CellState::Semiactive => self.snapshot.semiactive.push(i),
                _ => {}
            }
        }
    }

    /// Run the flux and heat stages, scattered across the pool when
    /// the active set is worth the fan-out.
    fn compute(&mut self, dt: f32) -> (Vec<GasTransfer>, Vec<HeatTransfer>) {
        let n = self.snapshot.active.len();
        if n == 0 {
            return (Vec::new(), Vec::new());
        }
        if let Some(pool) = &self.pool {
            if n >= self.config.inline_threshold {
                let shared = Arc::new(std::mem::take(&mut self.snapshot));
                let result = pool.dispatch(&shared, self.config, dt);
                self.snapshot = Arc::try_unwrap(shared).unwrap_or_else(|arc| (*arc).clone());
                if let Some(transfers) = result {
                    return transfers;
                }
                // Pool died; fall through to the inline path.
            }
        }
        let gas = flux::compute(&self.snapshot, &self.config, dt, 0..n);
        let heat = heat::compute(&self.snapshot, &self.config, dt, 0..n);
        (gas, heat)
    }

    /// Copy every touched snapshot cell back to the chunk store.
    fn write_back(&mut self, stats: &CommitStats) {
        self.dirty.extend_from_slice(&self.snapshot.active);
        self.dirty.extend_from_slice(&stats.promoted);
        self.dirty.sort_unstable();
        self.dirty.dedup();
        for &i in &self.dirty {
            self.snapshot.write_back(&mut self.map, i);
        }
        self.dirty.clear();
        self.promoted.extend_from_slice(&stats.promoted);
    }
}

/// Apply one mutation to one cell.
///
/// Walls ignore gas and heat writes outright. Vacuum swallows them:
/// the write is accepted and the contents immediately vented, so space
/// stays empty. State writes always land and are the only way to turn
/// terrain back into a live cell.
fn apply_to_cell(cell: &mut Cell, mutation: Mutation) {
    match mutation {
        Mutation::SetState(state) => {
            cell.state = state;
            if state == CellState::Vacuum {
                cell.gasses = GasVec::ZERO;
                cell.temperature = TCMB;
                cell.clear_velocity();
            }
        }
        _ if cell.state.is_sticky() => {}
        Mutation::AddGas(amounts) => {
            cell.add_gas(&amounts);
            cell.state = CellState::Active;
        }
        Mutation::RemoveGas(amounts) => {
            cell.remove_gas(&amounts);
            cell.state = CellState::Active;
        }
        Mutation::AddHeat(joules) => {
            cell.add_heat(joules);
            cell.state = CellState::Active;
        }
        Mutation::RemoveHeat(joules) => {
            cell.remove_heat(joules);
            cell.state = CellState::Active;
        }
    }
}
