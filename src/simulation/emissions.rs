//! Deterministic water, heat and CO₂ arithmetic for one shower.

use crate::domain::EmissionBreakdown;
use crate::error::{ensure_finite, SimulationError};

/// Derive water use, heat use and CO₂ for a shower of `duration_min` minutes
///
/// `water_co2_factor` is kg CO₂ per liter and `heat_co2_factor` kg CO₂ per MJ.
/// Duration, flow rate and heat per liter must be non-negative; every input
/// must be finite.
pub fn calculate(
    duration_min: f64,
    flow_rate_l_per_min: f64,
    water_co2_factor: f64,
    heat_co2_factor: f64,
    heat_energy_mj_per_l: f64,
) -> Result<EmissionBreakdown, SimulationError> {
    for (label, value) in [
        ("duration", duration_min),
        ("flow rate", flow_rate_l_per_min),
        ("water CO2 factor", water_co2_factor),
        ("heat CO2 factor", heat_co2_factor),
        ("heat energy per liter", heat_energy_mj_per_l),
    ] {
        ensure_finite(label, value)?;
    }
    for (label, value) in [
        ("duration", duration_min),
        ("flow rate", flow_rate_l_per_min),
        ("heat energy per liter", heat_energy_mj_per_l),
    ] {
        if value < 0.0 {
            return Err(SimulationError::Computation(format!(
                "{label} must not be negative, got {value}"
            )));
        }
    }

    let total_water_l = ensure_finite("total water", duration_min * flow_rate_l_per_min)?;
    let total_heat_energy_mj =
        ensure_finite("total heat energy", total_water_l * heat_energy_mj_per_l)?;
    let co2_heat_kg = ensure_finite("heat CO2", total_heat_energy_mj * heat_co2_factor)?;
    let co2_water_kg = ensure_finite("water CO2", total_water_l * water_co2_factor)?;
    let co2_total_kg = ensure_finite("total CO2", co2_heat_kg + co2_water_kg)?;

    Ok(EmissionBreakdown {
        total_water_l,
        total_heat_energy_mj,
        co2_heat_kg,
        co2_water_kg,
        co2_total_kg,
    })
}
