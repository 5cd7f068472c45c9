//! Physical constants and per-species property tables.
//!
//! Kelvin for temperature, moles for quantity, kilopascals for
//! pressure, litres for volume, joules for heat. There is exactly one
//! gas constant in the workspace; every pressure computation routes
//! through it.

use crate::gas::GAS_COUNT;

/// Ideal gas constant R, in kPa·L/(mol·K).
pub const GAS_CONSTANT_R: f32 = 8.31;

/// One standard atmosphere, in kPa.
pub const ONE_ATMOSPHERE: f32 = 101.325;

/// 0°C in Kelvin.
pub const T0C: f32 = 273.15;

/// Room temperature (20°C) in Kelvin.
pub const T20C: f32 = 293.15;

/// Cosmic microwave background temperature, in Kelvin.
///
/// Vacuum cells are pinned here; nothing in the simulation cools
/// below it.
pub const TCMB: f32 = 2.7;

/// Liquid volume of one environment tile, in litres.
pub const CELL_VOLUME: f32 = 2500.0;

/// Liquid volume of one pipe segment, in litres.
pub const PIPE_VOLUME: f32 = 70.0;

/// Total moles in one tile of standard station air.
pub const MOLES_CELL_STANDARD: f32 = ONE_ATMOSPHERE * CELL_VOLUME / (T20C * GAS_CONSTANT_R);

/// Oxygen fraction of standard station air.
pub const O2_STANDARD: f32 = 0.21;

/// Nitrogen fraction of standard station air.
pub const N2_STANDARD: f32 = 0.79;

/// Floor for mixture heat capacity, in J/K.
///
/// Keeps temperature updates finite when a cell is nearly empty.
pub const MINIMUM_HEAT_CAPACITY: f32 = 0.0003;

/// Mole quantities below this are treated as zero.
pub const GAS_MIN_MOLES: f32 = 5e-8;

/// Side length of a chunk, in tiles.
pub const CHUNK_DIM: usize = 16;

/// Cells per chunk layer.
pub const CHUNK_AREA: usize = CHUNK_DIM * CHUNK_DIM;

/// Base per-tick diffusion fraction, scaled per species below.
pub const GAS_DIFFUSION_BASE: f32 = 0.125;

/// Molar mass per species, in g/mol. Indexed by [`Species`](crate::Species).
pub const MOLAR_MASS: [f32; GAS_COUNT] = [32.0, 28.0, 44.0, 120.0];

/// Per-species diffusion rate: the fraction of a concentration
/// difference that crosses one face per unit time.
///
/// Heavier molecules diffuse slower; rates scale inversely with molar
/// mass, normalised so nitrogen moves at [`GAS_DIFFUSION_BASE`].
pub const GAS_DIFFUSION_RATE: [f32; GAS_COUNT] = [
    GAS_DIFFUSION_BASE * MOLAR_MASS[1] / MOLAR_MASS[0],
    GAS_DIFFUSION_BASE,
    GAS_DIFFUSION_BASE * MOLAR_MASS[1] / MOLAR_MASS[2],
    GAS_DIFFUSION_BASE * MOLAR_MASS[1] / MOLAR_MASS[3],
];

/// Specific heat per species, in J/(mol·K).
pub const SPECIFIC_HEAT: [f32; GAS_COUNT] = [20.0, 20.0, 30.0, 200.0];

/// Van der Waals attraction term `a` per species, in kPa·L²/mol².
pub const VDW_A: [f32; GAS_COUNT] = [137.8, 136.5, 365.8, 535.0];

/// Van der Waals covolume term `b` per species, in L/mol.
pub const VDW_B: [f32; GAS_COUNT] = [0.0319, 0.0387, 0.0427, 0.0651];
