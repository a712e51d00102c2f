//! Monte Carlo estimation of the CO₂ emitted by a single shower.

pub mod config;
pub mod domain;
pub mod error;
pub mod simulation;
pub mod telemetry;

pub use error::{ProgressError, SimulationError};
