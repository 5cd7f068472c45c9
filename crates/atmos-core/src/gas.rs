//! Gas species, mixtures, and the equation of state.

use std::fmt;
use std::ops::{Add, AddAssign, Index, IndexMut};

use crate::config::PressureLaw;
use crate::constants::{
    GAS_CONSTANT_R, GAS_DIFFUSION_RATE, GAS_MIN_MOLES, MINIMUM_HEAT_CAPACITY, MOLAR_MASS,
    MOLES_CELL_STANDARD, N2_STANDARD, O2_STANDARD, SPECIFIC_HEAT, VDW_A, VDW_B,
};

/// Number of simulated gas species.
pub const GAS_COUNT: usize = 4;

/// A simulated gas species.
///
/// The discriminant doubles as the index into per-species tables in
/// [`constants`](crate::constants) and into [`GasVec`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum Species {
    /// Breathable oxidiser.
    Oxygen = 0,
    /// Inert filler making up most of station air.
    Nitrogen = 1,
    /// Respiration byproduct.
    CarbonDioxide = 2,
    /// Heavy, energy-dense fuel gas.
    Plasma = 3,
}

impl Species {
    /// All species, in index order.
    pub const ALL: [Species; GAS_COUNT] = [
        Species::Oxygen,
        Species::Nitrogen,
        Species::CarbonDioxide,
        Species::Plasma,
    ];

    /// Array index of this species.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Per-tick diffusion rate for this species.
    pub fn diffusion_rate(self) -> f32 {
        GAS_DIFFUSION_RATE[self.index()]
    }

    /// Specific heat in J/(mol·K).
    pub fn specific_heat(self) -> f32 {
        SPECIFIC_HEAT[self.index()]
    }

    /// Molar mass in g/mol.
    pub fn molar_mass(self) -> f32 {
        MOLAR_MASS[self.index()]
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Species::Oxygen => "oxygen",
            Species::Nitrogen => "nitrogen",
            Species::CarbonDioxide => "carbon dioxide",
            Species::Plasma => "plasma",
        };
        write!(f, "{name}")
    }
}

/// Mole quantities for every species, in species index order.
///
/// The workhorse value type of the simulation: cell contents, mutation
/// payloads, and transfer amounts are all `GasVec`s. Quantities are
/// non-negative by construction everywhere the engine produces them.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GasVec(pub [f32; GAS_COUNT]);

impl GasVec {
    /// The empty mixture.
    pub const ZERO: GasVec = GasVec([0.0; GAS_COUNT]);

    /// One tile of standard station air at one atmosphere and 20°C:
    /// 21% oxygen, 79% nitrogen.
    pub fn standard_air() -> GasVec {
        let mut g = GasVec::ZERO;
        g[Species::Oxygen] = MOLES_CELL_STANDARD * O2_STANDARD;
        g[Species::Nitrogen] = MOLES_CELL_STANDARD * N2_STANDARD;
        g
    }

    /// Total moles across all species.
    pub fn total(&self) -> f32 {
        self.0.iter().sum()
    }

    /// True when the mixture holds no measurable gas.
    pub fn is_empty(&self) -> bool {
        self.total() <= GAS_MIN_MOLES
    }

    /// Multiply every component by `factor`.
    pub fn scaled(&self, factor: f32) -> GasVec {
        let mut out = *self;
        for v in &mut out.0 {
            *v *= factor;
        }
        out
    }

    /// Remove up to `amounts` from this mixture, clamping each
    /// component at zero. Returns what was actually removed.
    pub fn remove_up_to(&mut self, amounts: &GasVec) -> GasVec {
        let mut removed = GasVec::ZERO;
        for i in 0..GAS_COUNT {
            let take = amounts.0[i].min(self.0[i]).max(0.0);
            self.0[i] -= take;
            removed.0[i] = take;
        }
        removed
    }

    /// Largest absolute per-species difference against `other`.
    pub fn max_delta(&self, other: &GasVec) -> f32 {
        let mut max = 0.0f32;
        for i in 0..GAS_COUNT {
            max = max.max((self.0[i] - other.0[i]).abs());
        }
        max
    }
}

impl Index<Species> for GasVec {
    type Output = f32;

    fn index(&self, s: Species) -> &f32 {
        &self.0[s.index()]
    }
}

impl IndexMut<Species> for GasVec {
    fn index_mut(&mut self, s: Species) -> &mut f32 {
        &mut self.0[s.index()]
    }
}

impl Add for GasVec {
    type Output = GasVec;

    fn add(mut self, rhs: GasVec) -> GasVec {
        self += rhs;
        self
    }
}

impl AddAssign for GasVec {
    fn add_assign(&mut self, rhs: GasVec) {
        for i in 0..GAS_COUNT {
            self.0[i] += rhs.0[i];
        }
    }
}

impl fmt::Display for GasVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[O2 {:.3}, N2 {:.3}, CO2 {:.3}, plasma {:.3}]",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}

/// Pressure of a mixture in kPa.
///
/// Returns exactly `0.0` for an empty mixture or a degenerate volume;
/// never NaN or infinity, whatever the inputs.
///
/// Under [`PressureLaw::RealGas`] the van der Waals correction uses
/// mole-fraction-weighted `a` and `b` terms. If the covolume correction
/// would make the denominator non-positive (extreme overpacking), the
/// result falls back to the simplified law rather than going negative.
pub fn pressure(gasses: &GasVec, temperature: f32, volume: f32, law: PressureLaw) -> f32 {
    let n = gasses.total();
    if n <= GAS_MIN_MOLES || volume <= 0.0 {
        return 0.0;
    }
    let ideal = n * GAS_CONSTANT_R * temperature / volume;
    let p = match law {
        PressureLaw::Simplified => ideal,
        PressureLaw::RealGas => {
            let mut a_mix = 0.0f32;
            let mut b_mix = 0.0f32;
            for i in 0..GAS_COUNT {
                let fraction = gasses.0[i] / n;
                a_mix += fraction * VDW_A[i];
                b_mix += fraction * VDW_B[i];
            }
            let free_volume = volume - n * b_mix;
            if free_volume > 0.0 {
                let density = n / volume;
                n * GAS_CONSTANT_R * temperature / free_volume - a_mix * density * density
            } else {
                ideal
            }
        }
    };
    if p.is_finite() {
        p.max(0.0)
    } else {
        0.0
    }
}

/// Partial pressure of one species, in kPa.
///
/// The species' mole fraction of the total [`pressure`]. Zero for an
/// empty mixture.
pub fn partial_pressure(
    gasses: &GasVec,
    temperature: f32,
    volume: f32,
    law: PressureLaw,
    species: Species,
) -> f32 {
    let n = gasses.total();
    if n <= GAS_MIN_MOLES {
        return 0.0;
    }
    pressure(gasses, temperature, volume, law) * gasses[species] / n
}

/// Heat capacity of a mixture in J/K, floored at
/// [`MINIMUM_HEAT_CAPACITY`] so temperature updates stay finite.
pub fn heat_capacity(gasses: &GasVec) -> f32 {
    let mut cap = 0.0f32;
    for i in 0..GAS_COUNT {
        cap += gasses.0[i] * SPECIFIC_HEAT[i];
    }
    cap.max(MINIMUM_HEAT_CAPACITY)
}
