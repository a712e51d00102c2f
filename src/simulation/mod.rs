//! # Shower Emissions Simulation
//!
//! Monte Carlo model of the CO₂ attributable to one shower.
//!
//! ## Components
//!
//! - **Duration**: lognormal shower length, with moment matching from an arithmetic mean/std
//! - **Sources**: uniform water-source and weighted heat-source draws over the catalogs
//! - **Emissions**: deterministic water, heat and CO₂ arithmetic for one trial
//! - **Engine**: seeds the run, loops the trials and collects the [`ResultSet`](crate::domain::ResultSet)
//! - **Progress**: observer interface invoked after every trial
//!
//! ## Usage
//!
//! ```rust
//! use shower_emissions::domain::{Catalogs, Metric};
//! use shower_emissions::simulation::{MonteCarloEngine, SimulationConfig};
//!
//! let engine = MonteCarloEngine::new(Catalogs::reference()?);
//! let config = SimulationConfig {
//!     trials: 2_000,
//!     seed: Some(1350),
//!     ..Default::default()
//! };
//!
//! let results = engine.run(&config)?;
//! let co2 = results.summary(Metric::Co2Total).unwrap();
//! println!("median {:.3} kg CO2", co2.p50);
//! # Ok::<(), shower_emissions::SimulationError>(())
//! ```

pub mod duration;
pub mod emissions;
pub mod engine;
pub mod progress;
pub mod sources;

pub use duration::{DurationSampler, LogNormalParams, MIN_DURATION_MINUTES};
pub use emissions::calculate;
pub use engine::{
    MonteCarloEngine, SimulationConfig, DEFAULT_FLOW_RATE_L_PER_MIN, DEFAULT_HEAT_ENERGY_MJ_PER_L,
    MAX_TRIALS,
};
pub use progress::{LoggingProgress, NoopProgress, ProgressObserver, RecordingProgress};
pub use sources::SourceSampler;
