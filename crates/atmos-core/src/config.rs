//! Simulation configuration and validation.
//!
//! [`SimConfig`] is the tuning surface for the tick pipeline. It is
//! validated once at engine construction; the engine never has to
//! re-check these invariants per tick.

use crate::error::ConfigError;

/// Equation of state used for pressure computation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PressureLaw {
    /// Ideal gas law, `P = nRT/V`. The default.
    Simplified,
    /// Van der Waals law with mole-fraction-weighted correction terms.
    RealGas,
}

/// Gas transfer model used by the flux stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferMode {
    /// Pressure-driven bulk flow with velocity bias. The default.
    ActiveFlux,
    /// Pure per-species concentration diffusion.
    Diffusion,
}

/// Tuning parameters for the simulation.
///
/// The defaults reproduce standard station behaviour; all fields are
/// public so hosts can tune individual terms. Construct, adjust, then
/// pass to the engine, which calls [`validate`](SimConfig::validate).
#[derive(Clone, Copy, Debug)]
pub struct SimConfig {
    /// Global time multiplier applied to every transfer. Default: 1.0.
    pub sim_speed: f32,
    /// Fraction of a computed transfer that survives friction, in
    /// `(0, 1]`. Applied symmetrically to debit and credit. Default: 0.95.
    pub drag: f32,
    /// Transfer model for the flux stage. Default: [`TransferMode::ActiveFlux`].
    pub transfer_mode: TransferMode,
    /// Equation of state. Default: [`PressureLaw::Simplified`].
    pub pressure_law: PressureLaw,
    /// Scale factor on pressure-driven flow. Default: 0.125.
    pub active_flux_factor: f32,
    /// Weight of the velocity-bias wind term. Default: 0.3.
    pub wind_factor: f32,
    /// Per-species mole differences at or below this are not worth
    /// moving. Default: 0.01.
    pub diffusion_epsilon: f32,
    /// Pressure differences (kPa) at or below this are treated as
    /// equilibrium. Default: 0.5.
    pub pressure_epsilon: f32,
    /// Temperature differences (K) at or below this do not conduct.
    /// Default: 0.05.
    pub thermal_epsilon: f32,
    /// Scale factor on conductive heat flow. Default: 1e-4.
    pub thermal_base: f32,
    /// Total moles an active cell must move per tick to stay active.
    /// Default: 0.001.
    pub activity_epsilon: f32,
    /// Compute worker threads. `None` = auto-detect
    /// (`available_parallelism / 2`, clamped to `[1, 8]`).
    pub worker_count: Option<usize>,
    /// Active cells below this count are computed inline on the engine
    /// thread instead of being scattered to workers. Default: 64.
    pub inline_threshold: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            sim_speed: 1.0,
            drag: 0.95,
            transfer_mode: TransferMode::ActiveFlux,
            pressure_law: PressureLaw::Simplified,
            active_flux_factor: 0.125,
            wind_factor: 0.3,
            diffusion_epsilon: 0.01,
            pressure_epsilon: 0.5,
            thermal_epsilon: 0.05,
            thermal_base: 1e-4,
            activity_epsilon: 0.001,
            worker_count: None,
            inline_threshold: 64,
        }
    }
}

impl SimConfig {
    /// Check structural invariants.
    ///
    /// Returns the first violation found. A config that passes here
    /// cannot produce NaN transfers from finite cell state.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.sim_speed.is_finite() || self.sim_speed <= 0.0 {
            return Err(ConfigError::InvalidSimSpeed {
                value: self.sim_speed,
            });
        }
        if !self.drag.is_finite() || self.drag <= 0.0 || self.drag > 1.0 {
            return Err(ConfigError::InvalidDrag { value: self.drag });
        }
        for (name, value) in [
            ("active_flux_factor", self.active_flux_factor),
            ("wind_factor", self.wind_factor),
            ("thermal_base", self.thermal_base),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidFactor { name, value });
            }
        }
        for (name, value) in [
            ("diffusion_epsilon", self.diffusion_epsilon),
            ("pressure_epsilon", self.pressure_epsilon),
            ("thermal_epsilon", self.thermal_epsilon),
            ("activity_epsilon", self.activity_epsilon),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidEpsilon { name, value });
            }
        }
        if let Some(n) = self.worker_count {
            if n == 0 {
                return Err(ConfigError::ZeroWorkers);
            }
        }
        Ok(())
    }

    /// Resolve the actual worker count, applying auto-detection if `None`.
    ///
    /// Explicit values are clamped to `[1, 64]`.
    pub fn resolved_worker_count(&self) -> usize {
        match self.worker_count {
            Some(n) => n.clamp(1, 64),
            None => {
                let cpus = std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(4);
                (cpus / 2).clamp(1, 8)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_bad_drag() {
        for bad in [0.0, -0.5, 1.5, f32::NAN, f32::INFINITY] {
            let cfg = SimConfig {
                drag: bad,
                ..SimConfig::default()
            };
            assert!(
                matches!(cfg.validate(), Err(ConfigError::InvalidDrag { .. })),
                "drag {bad} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_bad_sim_speed() {
        for bad in [0.0, -1.0, f32::NAN] {
            let cfg = SimConfig {
                sim_speed: bad,
                ..SimConfig::default()
            };
            assert!(matches!(
                cfg.validate(),
                Err(ConfigError::InvalidSimSpeed { .. })
            ));
        }
    }

    #[test]
    fn rejects_negative_epsilon() {
        let cfg = SimConfig {
            pressure_epsilon: -0.1,
            ..SimConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidEpsilon {
                name: "pressure_epsilon",
                ..
            })
        ));
    }

    #[test]
    fn rejects_zero_workers() {
        let cfg = SimConfig {
            worker_count: Some(0),
            ..SimConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroWorkers));
    }

    #[test]
    fn resolved_worker_count_clamps() {
        let cfg = SimConfig {
            worker_count: Some(1000),
            ..SimConfig::default()
        };
        assert_eq!(cfg.resolved_worker_count(), 64);
        let auto = SimConfig::default().resolved_worker_count();
        assert!((1..=8).contains(&auto));
    }
}
