//! End-to-end scenarios: whole-engine behaviour over many ticks.

use atmos_core::constants::{CHUNK_AREA, CHUNK_DIM, TCMB};
use atmos_core::gas::{GasVec, Species};
use atmos_core::{CellState, ChunkKey, Layer, SimConfig, TilePos, TransferMode};
use atmos_grid::CellSeed;
use atmos_sim::Atmosphere;

fn o2(moles: f32) -> GasVec {
    let mut g = GasVec::ZERO;
    g[Species::Oxygen] = moles;
    g
}

fn walled_engine(keys: &[ChunkKey]) -> Atmosphere {
    let config = SimConfig {
        transfer_mode: TransferMode::Diffusion,
        worker_count: Some(1),
        ..SimConfig::default()
    };
    let mut engine = Atmosphere::new(config).unwrap();
    for &key in keys {
        engine
            .create_chunk_with(key, &vec![CellSeed::Wall; CHUNK_AREA])
            .unwrap();
    }
    engine
}

#[test]
fn gas_crosses_chunk_seams() {
    let mut engine = walled_engine(&[ChunkKey::new(0, 0), ChunkKey::new(1, 0)]);
    let edge = CHUNK_DIM as i32;
    // A corridor straddling the seam at x = 16.
    for x in (edge - 3)..(edge + 3) {
        engine.queue_set_state(TilePos::new(x, 5), Layer::Environment, CellState::Inactive);
    }
    engine.queue_add_gas(TilePos::new(edge - 3, 5), Layer::Environment, o2(120.0));

    for _ in 0..600 {
        let report = engine.step(1.0);
        if report.active_cells == 0 && report.semiactive_cells == 0 {
            break;
        }
    }

    // Every corridor cell ends up holding a share, including the ones
    // in the second chunk.
    let mut total = 0.0;
    for x in (edge - 3)..(edge + 3) {
        let moles = engine
            .cell(TilePos::new(x, 5), Layer::Environment)
            .unwrap()
            .total_moles;
        assert!(moles > 10.0, "cell at x={x} holds {moles}");
        total += moles;
    }
    assert!((total - 120.0).abs() < 1e-2, "total = {total}");
}

#[test]
fn hull_breach_empties_the_room() {
    let mut engine = walled_engine(&[ChunkKey::new(0, 0)]);
    // A 3x3 pressurised room.
    for y in 4..7 {
        for x in 4..7 {
            engine.queue_set_state(TilePos::new(x, y), Layer::Environment, CellState::Inactive);
            engine.queue_add_gas(TilePos::new(x, y), Layer::Environment, o2(50.0));
        }
    }
    for _ in 0..100 {
        engine.step(1.0);
    }

    // Breach the east wall into hard vacuum. The settled room must
    // wake and drain without any further gas mutation.
    engine.queue_set_state(TilePos::new(7, 5), Layer::Environment, CellState::Vacuum);
    for _ in 0..2000 {
        let report = engine.step(1.0);
        if report.active_cells == 0 && report.semiactive_cells == 0 {
            break;
        }
    }

    let mut remaining = 0.0;
    for y in 4..7 {
        for x in 4..7 {
            remaining += engine
                .cell(TilePos::new(x, y), Layer::Environment)
                .unwrap()
                .total_moles;
        }
    }
    assert!(remaining < 1.0, "room kept {remaining} moles after breach");

    let breach = engine
        .cell(TilePos::new(7, 5), Layer::Environment)
        .unwrap();
    assert_eq!(breach.state, CellState::Vacuum);
    assert!(breach.gasses.is_empty());
    assert_eq!(breach.temperature, TCMB);
}

#[test]
fn sealing_a_breach_stops_the_loss() {
    let mut engine = walled_engine(&[ChunkKey::new(0, 0)]);
    engine.queue_set_state(TilePos::new(5, 5), Layer::Environment, CellState::Inactive);
    engine.queue_add_gas(TilePos::new(5, 5), Layer::Environment, o2(100.0));
    engine.queue_set_state(TilePos::new(6, 5), Layer::Environment, CellState::Vacuum);

    // Vent for a handful of ticks, then weld the hole shut.
    for _ in 0..5 {
        engine.step(1.0);
    }
    engine.queue_set_state(TilePos::new(6, 5), Layer::Environment, CellState::Blocked);
    engine.step(1.0);
    let held = engine
        .cell(TilePos::new(5, 5), Layer::Environment)
        .unwrap()
        .total_moles;
    assert!(held > 0.0, "room vented dry before the seal landed");

    for _ in 0..50 {
        engine.step(1.0);
    }
    let after = engine
        .cell(TilePos::new(5, 5), Layer::Environment)
        .unwrap()
        .total_moles;
    assert!((after - held).abs() < 1e-4, "sealed room kept leaking");
}

#[test]
fn heat_equalises_between_rooms() {
    // Crank conduction so the corridor settles in test time.
    let config = SimConfig {
        transfer_mode: TransferMode::Diffusion,
        worker_count: Some(1),
        thermal_base: 1e-2,
        ..SimConfig::default()
    };
    let mut engine = Atmosphere::new(config).unwrap();
    engine
        .create_chunk_with(ChunkKey::new(0, 0), &vec![CellSeed::Wall; CHUNK_AREA])
        .unwrap();
    for x in 4..8 {
        engine.queue_set_state(TilePos::new(x, 5), Layer::Environment, CellState::Inactive);
        engine.queue_add_gas(TilePos::new(x, 5), Layer::Environment, o2(100.0));
    }
    engine.queue_add_heat(TilePos::new(4, 5), Layer::Environment, 1e6);

    for _ in 0..3000 {
        let report = engine.step(1.0);
        if report.active_cells == 0 && report.semiactive_cells == 0 {
            break;
        }
    }

    let temps: Vec<f32> = (4..8)
        .map(|x| {
            engine
                .cell(TilePos::new(x, 5), Layer::Environment)
                .unwrap()
                .temperature
        })
        .collect();
    let hottest = temps.iter().cloned().fold(f32::MIN, f32::max);
    let coldest = temps.iter().cloned().fold(f32::MAX, f32::min);
    assert!(coldest > 0.0);
    // Settled means the gradient fell below the conduction threshold.
    assert!(
        hottest - coldest < 1.0,
        "corridor settled with a {hottest}..{coldest} spread"
    );
}

#[test]
fn pipe_network_survives_splits_and_rejoins() {
    let mut engine = walled_engine(&[ChunkKey::new(0, 0)]);
    let net = engine.pipe_add_segment(TilePos::new(1, 1));
    for x in 2..6 {
        engine.pipe_add_segment(TilePos::new(x, 1));
    }
    engine.pipe_add_gasses(net, &o2(50.0));
    engine.pipe_equalize(net);

    // Cut the line in the middle.
    engine.pipe_remove_segment(TilePos::new(3, 1));
    let left = engine.pipe_net_at(TilePos::new(1, 1)).unwrap();
    let right = engine.pipe_net_at(TilePos::new(5, 1)).unwrap();
    assert_ne!(left, right);
    assert_eq!(engine.pipe_members(left).unwrap().len(), 2);
    assert_eq!(engine.pipe_members(right).unwrap().len(), 2);

    // Rejoin; everything pools into one net again.
    engine.pipe_add_segment(TilePos::new(3, 1));
    let rejoined = engine.pipe_net_at(TilePos::new(3, 1)).unwrap();
    assert_eq!(engine.pipe_members(rejoined).unwrap().len(), 5);
    assert!(engine.pipe_equalize(rejoined));

    // The 50 moles are still in the system, now evenly spread.
    for x in 1..6 {
        let view = engine.cell(TilePos::new(x, 1), Layer::Pipe).unwrap();
        assert!((view.gasses[Species::Oxygen] - 10.0).abs() < 1e-4);
    }
}

#[test]
fn active_flux_pressurises_a_room_from_one_burst() {
    let config = SimConfig {
        worker_count: Some(1),
        ..SimConfig::default()
    };
    let mut engine = Atmosphere::new(config).unwrap();
    engine
        .create_chunk_with(ChunkKey::new(0, 0), &vec![CellSeed::Wall; CHUNK_AREA])
        .unwrap();
    for y in 4..7 {
        for x in 4..7 {
            engine.queue_set_state(TilePos::new(x, y), Layer::Environment, CellState::Inactive);
        }
    }
    engine.queue_add_gas(TilePos::new(5, 5), Layer::Environment, o2(450.0));

    for _ in 0..2000 {
        let report = engine.step(1.0);
        if report.active_cells == 0 && report.semiactive_cells == 0 {
            break;
        }
    }

    // Pressure spread to every corner and mass was conserved.
    let mut total = 0.0;
    for y in 4..7 {
        for x in 4..7 {
            let view = engine.cell(TilePos::new(x, y), Layer::Environment).unwrap();
            assert!(view.pressure > 0.0, "({x},{y}) still empty");
            total += view.total_moles;
        }
    }
    assert!((total - 450.0).abs() < 0.1, "total = {total}");
}
