//! # Monte Carlo Engine
//!
//! Runs N independent shower trials. Each trial draws, in this order:
//!
//! 1. a duration from the lognormal duration model
//! 2. a heat source from the weighted heat catalog
//! 3. a water source from the uniform water catalog
//!
//! and then derives water, heat and CO₂ from those draws. All draws come from
//! one `StdRng` owned by the run. With a seed, the same configuration and
//! catalogs always reproduce the same result set; without one the RNG is
//! seeded from OS entropy.
//!
//! Configuration is validated before the first draw, so a failed run never
//! produces partial output.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::domain::{Catalogs, ResultSet, TrialRecord};
use crate::error::SimulationError;

use super::duration::{DurationSampler, LogNormalParams};
use super::emissions;
use super::progress::{NoopProgress, ProgressObserver};
use super::sources::SourceSampler;

/// Upper bound on trials per run
pub const MAX_TRIALS: usize = 20_000;
/// 2.5 US gal/min expressed in L/min (4.546 L/gal)
pub const DEFAULT_FLOW_RATE_L_PER_MIN: f64 = 2.5 * 4.546;
/// Heat needed to warm one liter of shower water (MJ/L)
pub const DEFAULT_HEAT_ENERGY_MJ_PER_L: f64 = 0.144;
pub const DEFAULT_TRIALS: usize = 1_000;

/// Parameters of one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of trials, `1..=MAX_TRIALS`
    pub trials: usize,
    /// RNG seed; `None` draws from OS entropy
    pub seed: Option<u64>,
    /// Lognormal shower length distribution (minutes)
    pub duration: LogNormalParams,
    /// Shower flow rate (L/min), > 0
    pub flow_rate_l_per_min: f64,
    /// Heat needed per liter of shower water (MJ/L), > 0
    pub heat_energy_mj_per_l: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            seed: None,
            duration: LogNormalParams::default(),
            flow_rate_l_per_min: DEFAULT_FLOW_RATE_L_PER_MIN,
            heat_energy_mj_per_l: DEFAULT_HEAT_ENERGY_MJ_PER_L,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), SimulationError> {
        if !(1..=MAX_TRIALS).contains(&self.trials) {
            return Err(SimulationError::Configuration(format!(
                "trials must be between 1 and {MAX_TRIALS}, got {}",
                self.trials
            )));
        }
        self.duration.validate()?;
        for (label, value) in [
            ("flow rate", self.flow_rate_l_per_min),
            ("heat energy per liter", self.heat_energy_mj_per_l),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SimulationError::Configuration(format!(
                    "{label} must be positive and finite, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Shower emissions simulator over a fixed pair of catalogs
///
/// The engine holds no mutable state; each run builds its own RNG, so one engine
/// can serve concurrent runs.
#[derive(Debug, Clone)]
pub struct MonteCarloEngine {
    catalogs: Catalogs,
}

impl MonteCarloEngine {
    pub fn new(catalogs: Catalogs) -> Self {
        Self { catalogs }
    }

    pub fn catalogs(&self) -> &Catalogs {
        &self.catalogs
    }

    pub fn run(&self, config: &SimulationConfig) -> Result<ResultSet, SimulationError> {
        self.run_with_progress(config, &mut NoopProgress)
    }

    pub fn run_with_progress(
        &self,
        config: &SimulationConfig,
        observer: &mut dyn ProgressObserver,
    ) -> Result<ResultSet, SimulationError> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        self.run_with_rng(config, &mut rng, observer)
    }

    /// Run with a caller-supplied RNG; `config.seed` is ignored
    pub fn run_with_rng<R: Rng + ?Sized>(
        &self,
        config: &SimulationConfig,
        rng: &mut R,
        observer: &mut dyn ProgressObserver,
    ) -> Result<ResultSet, SimulationError> {
        config.validate()?;

        let durations = DurationSampler::new(config.duration)?;
        let heat = SourceSampler::new(self.catalogs.heat())?;
        let water = SourceSampler::new(self.catalogs.water())?;

        debug!(
            trials = config.trials,
            seed = ?config.seed,
            mu = config.duration.mu,
            sigma = config.duration.sigma,
            "starting shower simulation"
        );

        let mut records = Vec::with_capacity(config.trials);
        for index in 1..=config.trials {
            let duration_min = durations.sample(rng);
            let heat_source = heat.sample(rng);
            let water_source = water.sample(rng);

            let breakdown = emissions::calculate(
                duration_min,
                config.flow_rate_l_per_min,
                water_source.co2_factor,
                heat_source.co2_factor,
                config.heat_energy_mj_per_l,
            )?;

            trace!(
                index,
                duration_min,
                heat = %heat_source.id,
                water = %water_source.id,
                co2_total_kg = breakdown.co2_total_kg,
                "trial"
            );

            records.push(TrialRecord {
                index,
                duration_min,
                heat_source: heat_source.name.clone(),
                heat_co2_factor: heat_source.co2_factor,
                water_source: water_source.name.clone(),
                water_co2_factor: water_source.co2_factor,
                total_water_l: breakdown.total_water_l,
                total_heat_energy_mj: breakdown.total_heat_energy_mj,
                co2_heat_kg: breakdown.co2_heat_kg,
                co2_water_kg: breakdown.co2_water_kg,
                co2_total_kg: breakdown.co2_total_kg,
            });

            observer.on_progress(index as f64 / config.trials as f64)?;
        }

        let results = ResultSet::new(records);
        info!(trials = results.len(), "shower simulation complete");
        Ok(results)
    }
}
