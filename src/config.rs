use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::{CatalogError, Catalogs};
use crate::simulation::duration::{DEFAULT_MEAN_MINUTES, DEFAULT_STD_MINUTES};
use crate::simulation::engine::DEFAULT_TRIALS;
use crate::simulation::{
    LogNormalParams, SimulationConfig, DEFAULT_FLOW_RATE_L_PER_MIN, DEFAULT_HEAT_ENERGY_MJ_PER_L,
};
use crate::SimulationError;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const ENV_PREFIX: &str = "SHOWER__";

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct Config {
    #[serde(default)]
    #[validate(nested)]
    pub simulation: SimulationSettings,
    #[serde(default)]
    #[validate(nested)]
    pub physics: PhysicsConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct SimulationSettings {
    #[validate(range(min = 1, max = 20000))]
    pub trials: usize,
    /// Omit for a non-reproducible run
    pub seed: Option<u64>,
    #[validate(custom(function = "validate_duration"))]
    pub duration: DurationSettings,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            seed: None,
            duration: DurationSettings::default(),
        }
    }
}

/// How the duration distribution is specified
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DurationSettings {
    /// Arithmetic mean and standard deviation in minutes
    Moments { mean_minutes: f64, std_minutes: f64 },
    /// Lognormal μ and σ directly
    LogSpace { mu: f64, sigma: f64 },
}

impl Default for DurationSettings {
    fn default() -> Self {
        DurationSettings::Moments {
            mean_minutes: DEFAULT_MEAN_MINUTES,
            std_minutes: DEFAULT_STD_MINUTES,
        }
    }
}

impl DurationSettings {
    pub fn to_params(&self) -> Result<LogNormalParams, SimulationError> {
        match *self {
            DurationSettings::Moments {
                mean_minutes,
                std_minutes,
            } => LogNormalParams::from_moments(mean_minutes, std_minutes),
            DurationSettings::LogSpace { mu, sigma } => LogNormalParams::new(mu, sigma),
        }
    }
}

fn validate_duration(duration: &DurationSettings) -> Result<(), ValidationError> {
    let ok = match *duration {
        DurationSettings::Moments {
            mean_minutes,
            std_minutes,
        } => mean_minutes > 0.0 && std_minutes > 0.0,
        DurationSettings::LogSpace { mu, sigma } => mu.is_finite() && sigma > 0.0,
    };
    if ok {
        Ok(())
    } else {
        Err(ValidationError::new("duration_parameters"))
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct PhysicsConfig {
    #[validate(range(exclusive_min = 0.0))]
    pub flow_rate_l_per_min: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub heat_energy_mj_per_l: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            flow_rate_l_per_min: DEFAULT_FLOW_RATE_L_PER_MIN,
            heat_energy_mj_per_l: DEFAULT_HEAT_ENERGY_MJ_PER_L,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogConfig {
    /// TOML catalog file; built-in reference tables when absent
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub json_path: Option<PathBuf>,
    pub summary: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            json_path: None,
            summary: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub json: bool,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load `path` (if present) overlaid with `SHOWER__`-prefixed environment variables
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let figment = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));
        let config: Config = figment
            .extract()
            .with_context(|| format!("reading configuration from {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn simulation_config(&self) -> Result<SimulationConfig, SimulationError> {
        let config = SimulationConfig {
            trials: self.simulation.trials,
            seed: self.simulation.seed,
            duration: self.simulation.duration.to_params()?,
            flow_rate_l_per_min: self.physics.flow_rate_l_per_min,
            heat_energy_mj_per_l: self.physics.heat_energy_mj_per_l,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn catalogs(&self) -> Result<Catalogs, CatalogError> {
        match &self.catalog.path {
            Some(path) => Catalogs::load(path),
            None => Catalogs::reference(),
        }
    }
}
