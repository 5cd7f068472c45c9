//! The compute worker pool.
//!
//! Persistent threads fed over a crossbeam channel. Each tick the
//! engine splits the active list into disjoint ranges, sends one task
//! per range with a shared handle to the snapshot, and gathers the
//! batches back in range order. Workers never write; they return
//! proposals for the sequential commit. Dropping the pool closes the
//! task channel and the threads exit cleanly.

use std::ops::Range;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};

use atmos_core::SimConfig;

use crate::flux::{self, GasTransfer};
use crate::heat::{self, HeatTransfer};
use crate::snapshot::Snapshot;

/// One range of the active list, dispatched to a worker.
struct ComputeTask {
    snapshot: Arc<Snapshot>,
    config: SimConfig,
    dt: f32,
    range: Range<usize>,
    reply: Sender<ComputeBatch>,
}

/// A worker's results for its range.
struct ComputeBatch {
    start: usize,
    gas: Vec<GasTransfer>,
    heat: Vec<HeatTransfer>,
}

pub(crate) struct WorkerPool {
    task_tx: Option<Sender<ComputeTask>>,
    handles: Vec<JoinHandle<()>>,
    workers: usize,
}

impl WorkerPool {
    /// Spawn `workers` compute threads.
    pub(crate) fn new(workers: usize) -> std::io::Result<Self> {
        let (task_tx, task_rx) = unbounded::<ComputeTask>();
        let mut handles = Vec::with_capacity(workers);
        for i in 0..workers {
            let rx = task_rx.clone();
            let handle = thread::Builder::new()
                .name(format!("atmos-compute-{i}"))
                .spawn(move || worker_loop(rx))?;
            handles.push(handle);
        }
        Ok(Self {
            task_tx: Some(task_tx),
            handles,
            workers,
        })
    }

    /// Scatter the flux and heat stages across the pool and gather the
    /// results in active-list order.
    ///
    /// The output is bit-identical to a single-threaded pass: ranges
    /// are disjoint and reassembled by start offset. Returns `None` if
    /// the pool has died (a worker panicked); the engine then computes
    /// inline instead.
    pub(crate) fn dispatch(
        &self,
        snapshot: &Arc<Snapshot>,
        config: SimConfig,
        dt: f32,
    ) -> Option<(Vec<GasTransfer>, Vec<HeatTransfer>)> {
        let n = snapshot.active.len();
        let lanes = self.workers.min(n).max(1);
        let per_lane = n.div_ceil(lanes);
        let (reply_tx, reply_rx) = bounded(lanes);

        let mut sent = 0;
        for start in (0..n).step_by(per_lane) {
            let end = (start + per_lane).min(n);
            let task = ComputeTask {
                snapshot: Arc::clone(snapshot),
                config,
                dt,
                range: start..end,
                reply: reply_tx.clone(),
            };
            let tx = self.task_tx.as_ref()?;
            if tx.send(task).is_err() {
                return None;
            }
            sent += 1;
        }
        drop(reply_tx);

        let mut batches = Vec::with_capacity(sent);
        for _ in 0..sent {
            match reply_rx.recv() {
                Ok(batch) => batches.push(batch),
                Err(_) => return None,
            }
        }
        batches.sort_by_key(|b| b.start);

        let mut gas = Vec::with_capacity(n);
        let mut heat = Vec::with_capacity(n);
        for batch in batches {
            gas.extend(batch.gas);
            heat.extend(batch.heat);
        }
        Some((gas, heat))
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.task_tx.take();
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
    }
}

fn worker_loop(task_rx: Receiver<ComputeTask>) {
    while let Ok(task) = task_rx.recv() {
        let ComputeTask {
            snapshot,
            config,
            dt,
            range,
            reply,
        } = task;
        let gas = flux::compute(&snapshot, &config, dt, range.clone());
        let heat = heat::compute(&snapshot, &config, dt, range.clone());
        // Release the snapshot before replying so the engine can
        // reclaim exclusive ownership without cloning.
        drop(snapshot);
        let _ = reply.send(ComputeBatch {
            start: range.start,
            gas,
            heat,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atmos_core::constants::CHUNK_AREA;
    use atmos_core::gas::Species;
    use atmos_core::{CellState, ChunkKey};
    use atmos_grid::{CellSeed, Map};

    fn busy_snapshot() -> Snapshot {
        let mut map = Map::new();
        map.create_chunk(ChunkKey::new(0, 0), &vec![CellSeed::Air; CHUNK_AREA])
            .unwrap();
        let mut snapshot = Snapshot::new();
        snapshot.sync_chunks(&map);
        // A spread of uneven cells so every range has real work.
        for i in 0..CHUNK_AREA as u32 {
            let cell = &mut snapshot.cells[i as usize];
            cell.state = CellState::Active;
            cell.gasses[Species::Oxygen] += (i % 7) as f32 * 3.0;
            snapshot.active.push(i);
        }
        snapshot
    }

    #[test]
    fn scattered_results_match_inline_compute() {
        let snapshot = Arc::new(busy_snapshot());
        let config = SimConfig::default();
        let pool = WorkerPool::new(3).unwrap();

        let (gas, heat) = pool.dispatch(&snapshot, config, 1.0).unwrap();
        let inline_gas = flux::compute(&snapshot, &config, 1.0, 0..snapshot.active.len());
        let inline_heat = heat::compute(&snapshot, &config, 1.0, 0..snapshot.active.len());

        assert_eq!(gas, inline_gas);
        assert_eq!(heat, inline_heat);
    }

    #[test]
    fn snapshot_ownership_returns_after_dispatch() {
        let snapshot = Arc::new(busy_snapshot());
        let pool = WorkerPool::new(2).unwrap();
        let _ = pool.dispatch(&snapshot, SimConfig::default(), 1.0).unwrap();
        drop(pool);
        // All worker clones are gone; the engine's handle is unique again.
        assert!(Arc::try_unwrap(snapshot).is_ok());
    }

    #[test]
    fn more_workers_than_cells_is_fine() {
        let mut snapshot = busy_snapshot();
        snapshot.active.truncate(2);
        let snapshot = Arc::new(snapshot);
        let pool = WorkerPool::new(8).unwrap();
        let (gas, heat) = pool.dispatch(&snapshot, SimConfig::default(), 1.0).unwrap();
        assert_eq!(gas.len(), 2);
        assert_eq!(heat.len(), 2);
    }
}
