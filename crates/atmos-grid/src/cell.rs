//! Cell state and seeding.

use atmos_core::constants::{CELL_VOLUME, PIPE_VOLUME, T20C, TCMB};
use atmos_core::gas::{heat_capacity, partial_pressure, pressure, GasVec, Species, GAS_COUNT};
use atmos_core::{CellState, Layer, PressureLaw, TilePos};

/// Per-direction, per-species record of last tick's outflow, in moles.
///
/// Indexed `[direction][species]`. Feeds the velocity-bias wind term
/// of the next tick's flux stage.
pub type Velocity = [[f32; GAS_COUNT]; 4];

/// One tile of one layer: a gas mixture with a temperature, a volume,
/// and a lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    /// Moles of each species.
    pub gasses: GasVec,
    /// Temperature in Kelvin.
    pub temperature: f32,
    /// Lifecycle state.
    pub state: CellState,
    /// Container volume in litres. Fixed at creation.
    pub volume: f32,
    /// Last tick's outflow per direction and species.
    pub velocity: Velocity,
}

impl Cell {
    /// An empty, inactive cell of the given volume at room temperature.
    pub fn empty(volume: f32) -> Self {
        Self {
            gasses: GasVec::ZERO,
            temperature: T20C,
            state: CellState::Inactive,
            volume,
            velocity: [[0.0; GAS_COUNT]; 4],
        }
    }

    /// An environment cell holding standard station air.
    pub fn air() -> Self {
        Self {
            gasses: GasVec::standard_air(),
            ..Self::empty(CELL_VOLUME)
        }
    }

    /// A wall.
    pub fn wall() -> Self {
        Self {
            state: CellState::Blocked,
            ..Self::empty(CELL_VOLUME)
        }
    }

    /// Open space: empty, at the cosmic background temperature.
    pub fn space() -> Self {
        Self {
            state: CellState::Vacuum,
            temperature: TCMB,
            ..Self::empty(CELL_VOLUME)
        }
    }

    /// An empty pipe segment interior.
    pub fn pipe() -> Self {
        Self::empty(PIPE_VOLUME)
    }

    /// Pressure of this cell's contents, in kPa.
    pub fn pressure(&self, law: PressureLaw) -> f32 {
        pressure(&self.gasses, self.temperature, self.volume, law)
    }

    /// Partial pressure of one species, in kPa.
    pub fn partial_pressure(&self, law: PressureLaw, species: Species) -> f32 {
        partial_pressure(&self.gasses, self.temperature, self.volume, law, species)
    }

    /// Heat capacity of this cell's contents, in J/K.
    pub fn heat_capacity(&self) -> f32 {
        heat_capacity(&self.gasses)
    }

    /// Add gas at the cell's own temperature. Each species clamps at
    /// zero, so a negative payload component acts as a bounded removal
    /// and the cell can never hold negative moles.
    pub fn add_gas(&mut self, amounts: &GasVec) {
        self.gasses += *amounts;
        for v in self.gasses.0.iter_mut() {
            *v = v.max(0.0);
        }
    }

    /// Remove up to `amounts`, clamping each species at zero. Returns
    /// what was actually removed.
    pub fn remove_gas(&mut self, amounts: &GasVec) -> GasVec {
        self.gasses.remove_up_to(amounts)
    }

    /// Add thermal energy, in joules. Temperature floors at absolute
    /// zero, so a negative payload acts as a bounded removal.
    pub fn add_heat(&mut self, joules: f32) {
        self.temperature = (self.temperature + joules / self.heat_capacity()).max(0.0);
    }

    /// Remove up to `joules` of thermal energy. Temperature clamps at
    /// absolute zero; returns the energy actually removed.
    pub fn remove_heat(&mut self, joules: f32) -> f32 {
        let cap = self.heat_capacity();
        let removed = joules.min(self.temperature * cap).max(0.0);
        self.temperature = (self.temperature - removed / cap).max(0.0);
        removed
    }

    /// Clear recorded outflow.
    pub fn clear_velocity(&mut self) {
        self.velocity = [[0.0; GAS_COUNT]; 4];
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::empty(CELL_VOLUME)
    }
}

/// Initial contents for one environment cell at chunk creation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CellSeed {
    /// Standard station air at one atmosphere and 20°C.
    #[default]
    Air,
    /// A wall.
    Wall,
    /// Open space.
    Space,
}

impl CellSeed {
    /// Materialise the seed into a cell.
    pub fn build(self) -> Cell {
        match self {
            CellSeed::Air => Cell::air(),
            CellSeed::Wall => Cell::wall(),
            CellSeed::Space => Cell::space(),
        }
    }
}

/// Read-only snapshot of one cell, with derived quantities, for host
/// queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellView {
    /// Tile position.
    pub pos: TilePos,
    /// Layer the cell lives on.
    pub layer: Layer,
    /// Moles of each species.
    pub gasses: GasVec,
    /// Temperature in Kelvin.
    pub temperature: f32,
    /// Lifecycle state.
    pub state: CellState,
    /// Container volume in litres.
    pub volume: f32,
    /// Total moles.
    pub total_moles: f32,
    /// Pressure in kPa under the configured law.
    pub pressure: f32,
}

impl CellView {
    /// Build a view of `cell`.
    pub fn new(pos: TilePos, layer: Layer, cell: &Cell, law: PressureLaw) -> Self {
        Self {
            pos,
            layer,
            gasses: cell.gasses,
            temperature: cell.temperature,
            state: cell.state,
            volume: cell.volume,
            total_moles: cell.gasses.total(),
            pressure: cell.pressure(law),
        }
    }
}
