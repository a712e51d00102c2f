//! # Source Catalogs
//!
//! Immutable reference data for the two categorical draws of a trial:
//!
//! - **Water catalog**: tap-water supply chains, drawn uniformly. Factors are kg CO₂ per liter.
//! - **Heat catalog**: domestic hot-water heat supply, drawn by each entry's
//!   selection probability. Factors are kg CO₂ per MJ of heat.
//!
//! Catalogs are validated once when they are built (or loaded from TOML) and are
//! never mutated afterwards. Nothing is renormalized or corrected: a heat catalog
//! whose weights do not sum to one is rejected.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use thiserror::Error;

/// Allowed deviation of the heat weights from 1.0
pub const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Which draw a catalog feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SourceKind {
    Water,
    Heat,
}

/// Catalog construction and loading errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("{kind} catalog has no entries")]
    Empty { kind: SourceKind },

    #[error("{kind} catalog lists '{name}' more than once")]
    DuplicateName { kind: SourceKind, name: String },

    #[error("{kind} source '{name}' has invalid CO2 factor {factor}")]
    InvalidFactor {
        kind: SourceKind,
        name: String,
        factor: f64,
    },

    #[error("{kind} source '{name}' has no selection probability")]
    MissingProbability { kind: SourceKind, name: String },

    #[error("{kind} source '{name}' carries a selection probability but {kind} sources are drawn uniformly")]
    UnexpectedProbability { kind: SourceKind, name: String },

    #[error("{kind} source '{name}' has probability {probability} outside [0, 1]")]
    InvalidProbability {
        kind: SourceKind,
        name: String,
        probability: f64,
    },

    #[error("{kind} catalog weights sum to {sum}, expected 1 within 1e-6")]
    WeightSum { kind: SourceKind, sum: f64 },

    #[error("expected a {expected} catalog, got a {actual} catalog")]
    KindMismatch {
        expected: SourceKind,
        actual: SourceKind,
    },

    #[error("Failed to load catalog: {0}")]
    Load(String),

    #[error("Failed to serialize catalog: {0}")]
    Serialize(String),
}

/// One named source and its emission factor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceEntry {
    /// Short identifier (`w1`, `h3`, ...)
    pub id: String,
    /// Display name, unique within its catalog
    pub name: String,
    /// Life-cycle inventory dataset the factor was taken from
    #[serde(default)]
    pub dataset: String,
    /// Geography of the dataset
    #[serde(default)]
    pub geography: String,
    /// kg CO₂ per liter (water) or per MJ (heat)
    pub co2_factor: f64,
    /// Selection probability; heat sources only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>,
}

impl SourceEntry {
    pub fn water(id: &str, name: &str, dataset: &str, geography: &str, co2_factor: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            dataset: dataset.to_string(),
            geography: geography.to_string(),
            co2_factor,
            probability: None,
        }
    }

    pub fn heat(
        id: &str,
        name: &str,
        dataset: &str,
        geography: &str,
        co2_factor: f64,
        probability: f64,
    ) -> Self {
        Self {
            probability: Some(probability),
            ..Self::water(id, name, dataset, geography, co2_factor)
        }
    }
}

/// A validated, read-only list of sources of one kind
#[derive(Debug, Clone, PartialEq)]
pub struct SourceCatalog {
    kind: SourceKind,
    entries: Vec<SourceEntry>,
}

impl SourceCatalog {
    /// Validate `entries` and build a catalog
    ///
    /// Water entries must not carry probabilities; heat entries must all carry
    /// one, each in `[0, 1]`, summing to 1 within [`WEIGHT_TOLERANCE`].
    pub fn new(kind: SourceKind, entries: Vec<SourceEntry>) -> Result<Self, CatalogError> {
        if entries.is_empty() {
            return Err(CatalogError::Empty { kind });
        }

        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(entry.name.as_str()) {
                return Err(CatalogError::DuplicateName {
                    kind,
                    name: entry.name.clone(),
                });
            }
            if !entry.co2_factor.is_finite() || entry.co2_factor < 0.0 {
                return Err(CatalogError::InvalidFactor {
                    kind,
                    name: entry.name.clone(),
                    factor: entry.co2_factor,
                });
            }
        }

        match kind {
            SourceKind::Water => {
                if let Some(entry) = entries.iter().find(|e| e.probability.is_some()) {
                    return Err(CatalogError::UnexpectedProbability {
                        kind,
                        name: entry.name.clone(),
                    });
                }
            }
            SourceKind::Heat => {
                let mut sum = 0.0;
                for entry in &entries {
                    let probability =
                        entry
                            .probability
                            .ok_or_else(|| CatalogError::MissingProbability {
                                kind,
                                name: entry.name.clone(),
                            })?;
                    if !(0.0..=1.0).contains(&probability) {
                        return Err(CatalogError::InvalidProbability {
                            kind,
                            name: entry.name.clone(),
                            probability,
                        });
                    }
                    sum += probability;
                }
                if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
                    return Err(CatalogError::WeightSum { kind, sum });
                }
            }
        }

        Ok(Self { kind, entries })
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    pub fn entries(&self) -> &[SourceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a constructed catalog; present for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&SourceEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Selection weights in catalog order, `None` for uniformly drawn catalogs
    pub fn weights(&self) -> Option<Vec<f64>> {
        match self.kind {
            SourceKind::Water => None,
            SourceKind::Heat => Some(
                self.entries
                    .iter()
                    .map(|e| e.probability.unwrap_or(0.0))
                    .collect(),
            ),
        }
    }
}

/// TOML layout of an external catalog file
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogFile {
    water: Vec<SourceEntry>,
    heat: Vec<SourceEntry>,
}

/// The water and heat catalogs used by a simulation
#[derive(Debug, Clone, PartialEq)]
pub struct Catalogs {
    water: SourceCatalog,
    heat: SourceCatalog,
}

impl Catalogs {
    pub fn new(water: SourceCatalog, heat: SourceCatalog) -> Result<Self, CatalogError> {
        if water.kind() != SourceKind::Water {
            return Err(CatalogError::KindMismatch {
                expected: SourceKind::Water,
                actual: water.kind(),
            });
        }
        if heat.kind() != SourceKind::Heat {
            return Err(CatalogError::KindMismatch {
                expected: SourceKind::Heat,
                actual: heat.kind(),
            });
        }
        Ok(Self { water, heat })
    }

    /// Built-in reference tables (ecoinvent v3.5 factors, Swiss heat mix)
    pub fn reference() -> Result<Self, CatalogError> {
        let water = WATER_SOURCES
            .iter()
            .map(|&(id, name, dataset, geo, factor)| {
                SourceEntry::water(id, name, dataset, geo, factor)
            })
            .collect();
        let heat = HEAT_SOURCES
            .iter()
            .map(|&(id, name, dataset, geo, factor, probability)| {
                SourceEntry::heat(id, name, dataset, geo, factor, probability)
            })
            .collect();

        Self::new(
            SourceCatalog::new(SourceKind::Water, water)?,
            SourceCatalog::new(SourceKind::Heat, heat)?,
        )
    }

    /// Parse catalogs from a TOML document with `[[water]]` and `[[heat]]` tables
    pub fn from_toml_str(contents: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile =
            toml::from_str(contents).map_err(|e| CatalogError::Load(e.to_string()))?;
        Self::new(
            SourceCatalog::new(SourceKind::Water, file.water)?,
            SourceCatalog::new(SourceKind::Heat, file.heat)?,
        )
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::Load(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&contents)
    }

    /// Serialize back into the TOML layout accepted by [`Catalogs::from_toml_str`]
    pub fn to_toml_string(&self) -> Result<String, CatalogError> {
        let file = CatalogFile {
            water: self.water.entries.clone(),
            heat: self.heat.entries.clone(),
        };
        toml::to_string_pretty(&file).map_err(|e| CatalogError::Serialize(e.to_string()))
    }

    pub fn water(&self) -> &SourceCatalog {
        &self.water
    }

    pub fn heat(&self) -> &SourceCatalog {
        &self.heat
    }

    pub fn get(&self, kind: SourceKind) -> &SourceCatalog {
        match kind {
            SourceKind::Water => &self.water,
            SourceKind::Heat => &self.heat,
        }
    }
}

const WATER_SOURCES: [(&str, &str, &str, &str, f64); 7] = [
    (
        "w1",
        "underground water with disinfection",
        "tap water production, underground water with disinfection",
        "Europe without Switzerland",
        0.000136391,
    ),
    (
        "w2",
        "underground water with chemical treatment",
        "tap water production, underground water with chemical treatment",
        "Europe without Switzerland",
        0.000297429,
    ),
    (
        "w3",
        "underground water without treatment",
        "tap water production, underground water without treatment",
        "Switzerland (CH)",
        0.0000141293,
    ),
    (
        "w4",
        "conventional treatment",
        "tap water production, conventional treatment",
        "Europe without Switzerland",
        0.000218099,
    ),
    (
        "w5",
        "microstrainer treatment",
        "tap water production, microstrainer treatment",
        "Rest-of-World (RoW)",
        0.000376121,
    ),
    (
        "w6",
        "conventional with biological treatment",
        "tap water production, conventional with biological treatment",
        "Europe without Switzerland",
        0.000287996,
    ),
    (
        "w7",
        "seawater reverse osmosis",
        "tap water production, seawater reverse osmosis, conventional pretreatment, baseline module, single stage",
        "Global (GLO)",
        0.005769645,
    ),
];

const HEAT_SOURCES: [(&str, &str, &str, &str, f64, f64); 7] = [
    (
        "h1",
        "Heat, central or small-scale, share of gas heating",
        "Heat production, natural gas, at boiler condensing modulating <100kW",
        "Europe without Switzerland",
        0.074034296,
        0.385536583,
    ),
    (
        "h2",
        "Heat, central or small-scale, share of oil heating",
        "Heat production, light fuel oil, at boiler 10kW, non-modulating",
        "Europe without Switzerland",
        0.104351333,
        0.210152206,
    ),
    (
        "h3",
        "Heat, district or industrial, share of district heating",
        "Heat from municipal waste incineration to generic market for heat district or industrial, other than natural gas",
        "Switzerland (CH)",
        0.000259857,
        0.122073708,
    ),
    (
        "h4",
        "Heat, borehole heat pump {CH}",
        "Heat production, borehole heat exchanger, brine-water heat pump 10kW",
        "Europe without Switzerland",
        0.029316816,
        0.046202581,
    ),
    (
        "h5",
        "Heat, central or small-scale, share from wood heating",
        "Heat production, softwood chips from forest, at furnace 50kW",
        "Switzerland (CH)",
        0.006017536,
        0.007339875,
    ),
    (
        "h6",
        "Heat, central or small-scale, share from solar thermal",
        "Operation, solar collector system, Cu flat plate collector, multiple dwelling, for hot water",
        "Switzerland (CH)",
        0.002793585,
        0.037085683,
    ),
    (
        "h7",
        "Electricity, low voltage, Zurich, Switzerland",
        "",
        "Switzerland (CH)",
        0.033284045,
        0.191609364,
    ),
];
