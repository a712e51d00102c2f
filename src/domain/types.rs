use serde::{Deserialize, Serialize};

/// Physical and emission quantities derived from one shower
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmissionBreakdown {
    /// Water drawn (L)
    pub total_water_l: f64,
    /// Heat needed to warm that water (MJ)
    pub total_heat_energy_mj: f64,
    /// kg CO₂ from heat supply
    pub co2_heat_kg: f64,
    /// kg CO₂ from water supply
    pub co2_water_kg: f64,
    /// `co2_heat_kg + co2_water_kg`
    pub co2_total_kg: f64,
}

/// One simulated shower
///
/// Serialized with the column names of the exported sample table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    /// 1-based trial index
    #[serde(rename = "Simulation")]
    pub index: usize,

    /// Shower length (minutes), always > 0
    #[serde(rename = "Shower_time_min")]
    pub duration_min: f64,

    /// Name of the drawn heat source
    #[serde(rename = "Heat_Source")]
    pub heat_source: String,

    /// Heat source emission factor (kg CO₂/MJ)
    #[serde(rename = "Heat_CO2_factor")]
    pub heat_co2_factor: f64,

    /// Name of the drawn water source
    #[serde(rename = "Water_Source")]
    pub water_source: String,

    /// Water source emission factor (kg CO₂/L)
    #[serde(rename = "Water_CO2_factor")]
    pub water_co2_factor: f64,

    /// Water drawn (L)
    #[serde(rename = "Total_Water_L")]
    pub total_water_l: f64,

    /// Heat needed to warm that water (MJ)
    #[serde(rename = "Total_Heat_Energy_MJ")]
    pub total_heat_energy_mj: f64,

    /// CO₂ from heat supply (kg)
    #[serde(rename = "CO2_Heat")]
    pub co2_heat_kg: f64,

    /// CO₂ from water supply (kg)
    #[serde(rename = "CO2_Water")]
    pub co2_water_kg: f64,

    /// CO₂ heat plus water (kg)
    #[serde(rename = "CO2_Total")]
    pub co2_total_kg: f64,
}

impl TrialRecord {
    /// Recover the derived quantities of this record
    pub fn breakdown(&self) -> EmissionBreakdown {
        EmissionBreakdown {
            total_water_l: self.total_water_l,
            total_heat_energy_mj: self.total_heat_energy_mj,
            co2_heat_kg: self.co2_heat_kg,
            co2_water_kg: self.co2_water_kg,
            co2_total_kg: self.co2_total_kg,
        }
    }
}
