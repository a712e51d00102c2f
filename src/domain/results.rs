//! # Result Set
//!
//! The ordered table of trial records produced by one simulation run, plus the
//! read-only queries consumers run over it: per-column summaries, source
//! filters and per-source tallies.

use std::collections::HashMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::catalog::SourceKind;
use super::types::TrialRecord;

/// Numeric column of the sample table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
pub enum Metric {
    #[strum(serialize = "Shower_time_min")]
    DurationMin,
    #[strum(serialize = "Total_Water_L")]
    TotalWaterL,
    #[strum(serialize = "Total_Heat_Energy_MJ")]
    TotalHeatEnergyMj,
    #[strum(serialize = "CO2_Heat")]
    Co2Heat,
    #[strum(serialize = "CO2_Water")]
    Co2Water,
    #[strum(serialize = "CO2_Total")]
    Co2Total,
}

impl Metric {
    pub fn value(&self, record: &TrialRecord) -> f64 {
        match self {
            Metric::DurationMin => record.duration_min,
            Metric::TotalWaterL => record.total_water_l,
            Metric::TotalHeatEnergyMj => record.total_heat_energy_mj,
            Metric::Co2Heat => record.co2_heat_kg,
            Metric::Co2Water => record.co2_water_kg,
            Metric::Co2Total => record.co2_total_kg,
        }
    }

    /// Unit label for display
    pub fn unit(&self) -> &'static str {
        match self {
            Metric::DurationMin => "min",
            Metric::TotalWaterL => "L",
            Metric::TotalHeatEnergyMj => "MJ",
            Metric::Co2Heat | Metric::Co2Water | Metric::Co2Total => "kg",
        }
    }
}

/// Descriptive statistics of one column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator); 0 for a single value
    pub std_dev: f64,
    pub min: f64,
    pub p5: f64,
    pub p50: f64,
    pub p95: f64,
    pub max: f64,
}

impl Summary {
    /// Summarize `values`, `None` when there is nothing to summarize
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;
        let std_dev = if count > 1 {
            let ss = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
            (ss / (count - 1) as f64).sqrt()
        } else {
            0.0
        };

        Some(Self {
            count,
            mean,
            std_dev,
            min: sorted[0],
            p5: percentile(&sorted, 0.05),
            p50: percentile(&sorted, 0.50),
            p95: percentile(&sorted, 0.95),
            max: sorted[count - 1],
        })
    }
}

/// Linear interpolation between closest ranks; `sorted` must be non-empty and ascending
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// All trial records of one run, in trial order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultSet {
    records: Vec<TrialRecord>,
}

impl ResultSet {
    pub(crate) fn new(records: Vec<TrialRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[TrialRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<TrialRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrialRecord> {
        self.records.iter()
    }

    pub fn column(&self, metric: Metric) -> Vec<f64> {
        self.records.iter().map(|r| metric.value(r)).collect()
    }

    pub fn summary(&self, metric: Metric) -> Option<Summary> {
        Summary::from_values(&self.column(metric))
    }

    /// Records whose `kind` source is one of `names`
    ///
    /// An empty selection matches nothing.
    pub fn filter_by_source<'a>(
        &'a self,
        kind: SourceKind,
        names: &'a [&'a str],
    ) -> impl Iterator<Item = &'a TrialRecord> + 'a {
        self.records.iter().filter(move |r| {
            let name = source_name(r, kind);
            names.iter().any(|n| *n == name)
        })
    }

    /// Summary of `metric` restricted to records drawing one of `names`
    pub fn filtered_summary(
        &self,
        kind: SourceKind,
        names: &[&str],
        metric: Metric,
    ) -> Option<Summary> {
        let values: Vec<f64> = self
            .filter_by_source(kind, names)
            .map(|r| metric.value(r))
            .collect();
        Summary::from_values(&values)
    }

    /// Number of trials that drew each source of `kind`
    pub fn source_counts(&self, kind: SourceKind) -> HashMap<&str, usize> {
        self.records.iter().map(|r| source_name(r, kind)).counts()
    }

    /// Distinct `kind` sources in order of first appearance
    pub fn distinct_sources(&self, kind: SourceKind) -> Vec<&str> {
        self.records
            .iter()
            .map(|r| source_name(r, kind))
            .unique()
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a TrialRecord;
    type IntoIter = std::slice::Iter<'a, TrialRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

fn source_name(record: &TrialRecord, kind: SourceKind) -> &str {
    match kind {
        SourceKind::Water => &record.water_source,
        SourceKind::Heat => &record.heat_source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn record(index: usize, duration: f64, heat: &str, water: &str) -> TrialRecord {
        let total_water_l = duration * 10.0;
        let total_heat_energy_mj = total_water_l * 0.144;
        let co2_heat_kg = total_heat_energy_mj * 0.07;
        let co2_water_kg = total_water_l * 0.0002;
        TrialRecord {
            index,
            duration_min: duration,
            heat_source: heat.to_string(),
            heat_co2_factor: 0.07,
            water_source: water.to_string(),
            water_co2_factor: 0.0002,
            total_water_l,
            total_heat_energy_mj,
            co2_heat_kg,
            co2_water_kg,
            co2_total_kg: co2_heat_kg + co2_water_kg,
        }
    }

    fn sample() -> ResultSet {
        ResultSet::new(vec![
            record(1, 8.0, "gas", "tap"),
            record(2, 10.0, "oil", "tap"),
            record(3, 12.0, "gas", "osmosis"),
            record(4, 6.0, "gas", "tap"),
        ])
    }

    #[test]
    fn test_summary_statistics() {
        let summary = Summary::from_values(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(summary.count, 5);
        assert_eq!(summary.mean, 3.0);
        assert!((summary.std_dev - 2.5f64.sqrt()).abs() < 1e-12);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.p50, 3.0);
        assert!((summary.p5 - 1.2).abs() < 1e-12);
        assert!((summary.p95 - 4.8).abs() < 1e-12);
        assert_eq!(summary.max, 5.0);
    }

    #[test]
    fn test_summary_of_single_value() {
        let summary = Summary::from_values(&[4.2]).unwrap();
        assert_eq!(summary.std_dev, 0.0);
        assert_eq!(summary.p5, 4.2);
        assert_eq!(summary.p95, 4.2);
        assert!(Summary::from_values(&[]).is_none());
    }

    #[test]
    fn test_column_and_summary() {
        let results = sample();
        assert_eq!(results.column(Metric::DurationMin), vec![8.0, 10.0, 12.0, 6.0]);
        let summary = results.summary(Metric::DurationMin).unwrap();
        assert_eq!(summary.mean, 9.0);
        assert_eq!(summary.min, 6.0);
        assert_eq!(summary.max, 12.0);
    }

    #[test]
    fn test_filter_by_source() {
        let results = sample();
        let gas: Vec<usize> = results
            .filter_by_source(SourceKind::Heat, &["gas"])
            .map(|r| r.index)
            .collect();
        assert_eq!(gas, vec![1, 3, 4]);

        assert_eq!(results.filter_by_source(SourceKind::Water, &[]).count(), 0);
        assert!(results
            .filtered_summary(SourceKind::Water, &[], Metric::Co2Water)
            .is_none());

        let osmosis = results
            .filtered_summary(SourceKind::Water, &["osmosis"], Metric::DurationMin)
            .unwrap();
        assert_eq!(osmosis.count, 1);
        assert_eq!(osmosis.mean, 12.0);
    }

    #[test]
    fn test_source_counts_and_distinct() {
        let results = sample();
        let counts = results.source_counts(SourceKind::Heat);
        assert_eq!(counts["gas"], 3);
        assert_eq!(counts["oil"], 1);
        assert_eq!(results.distinct_sources(SourceKind::Water), vec!["tap", "osmosis"]);
    }

    #[test]
    fn test_metric_names() {
        assert_eq!(Metric::Co2Total.to_string(), "CO2_Total");
        assert_eq!(Metric::from_str("Shower_time_min").unwrap(), Metric::DurationMin);
        assert_eq!(Metric::TotalHeatEnergyMj.unit(), "MJ");
    }

    #[test]
    fn test_json_uses_table_column_names() {
        let json = sample().to_json().unwrap();
        let rows: Vec<serde_json::Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0]["Simulation"], 1);
        assert_eq!(rows[2]["Water_Source"], "osmosis");
        assert!(rows[0].get("CO2_Total").is_some());
        assert!(rows[0].get("Total_Heat_Energy_MJ").is_some());
    }

    #[test]
    fn test_record_breakdown_matches_fields() {
        let results = sample();
        let first = &results.records()[0];
        let breakdown = first.breakdown();
        assert_eq!(breakdown.total_water_l, 80.0);
        assert_eq!(breakdown.co2_total_kg, first.co2_total_kg);
    }
}
