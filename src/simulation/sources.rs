//! Categorical samplers over the water and heat catalogs.
//!
//! Water catalogs are sampled uniformly; heat catalogs by their validated
//! selection probabilities. Both consume entropy only from the caller's RNG.

use rand::distributions::{Distribution, Uniform, WeightedIndex};
use rand::Rng;

use crate::domain::catalog::{SourceCatalog, SourceEntry, SourceKind};
use crate::error::SimulationError;

#[derive(Debug, Clone)]
enum Selector {
    Uniform(Uniform<usize>),
    Weighted(WeightedIndex<f64>),
}

/// Draws one entry of a catalog per call
#[derive(Debug, Clone)]
pub struct SourceSampler<'a> {
    catalog: &'a SourceCatalog,
    selector: Selector,
}

impl<'a> SourceSampler<'a> {
    pub fn new(catalog: &'a SourceCatalog) -> Result<Self, SimulationError> {
        let selector = match catalog.weights() {
            None => Selector::Uniform(Uniform::new(0, catalog.len())),
            Some(weights) => Selector::Weighted(WeightedIndex::new(&weights).map_err(|e| {
                SimulationError::Configuration(format!(
                    "{} catalog weights unusable: {e}",
                    catalog.kind()
                ))
            })?),
        };
        Ok(Self { catalog, selector })
    }

    pub fn kind(&self) -> SourceKind {
        self.catalog.kind()
    }

    /// Draw one source; the returned entry carries its name and CO₂ factor
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> &'a SourceEntry {
        let index = match &self.selector {
            Selector::Uniform(dist) => dist.sample(rng),
            Selector::Weighted(dist) => dist.sample(rng),
        };
        &self.catalog.entries()[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::Catalogs;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_water_sampler_is_uniform_kind() {
        let catalogs = Catalogs::reference().unwrap();
        let sampler = SourceSampler::new(catalogs.water()).unwrap();
        assert_eq!(sampler.kind(), SourceKind::Water);

        let mut rng = StdRng::seed_from_u64(1);
        let entry = sampler.sample(&mut rng);
        assert!(catalogs.water().get(&entry.name).is_some());
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let catalogs = Catalogs::reference().unwrap();
        let sampler = SourceSampler::new(catalogs.heat()).unwrap();

        let draw = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..200)
                .map(|_| sampler.sample(&mut rng).id.clone())
                .collect::<Vec<_>>()
        };

        assert_eq!(draw(99), draw(99));
        assert_ne!(draw(99), draw(100));
    }

    #[test]
    fn test_zero_weight_source_never_drawn() {
        let heat = SourceCatalog::new(
            SourceKind::Heat,
            vec![
                SourceEntry::heat("h1", "gas", "", "", 0.07, 1.0),
                SourceEntry::heat("h2", "solar", "", "", 0.003, 0.0),
            ],
        )
        .unwrap();
        let sampler = SourceSampler::new(&heat).unwrap();
        let mut rng = StdRng::seed_from_u64(5);

        assert!((0..1000).all(|_| sampler.sample(&mut rng).name == "gas"));
    }

    #[test]
    fn test_single_entry_catalog() {
        let water = SourceCatalog::new(
            SourceKind::Water,
            vec![SourceEntry::water("w1", "tap", "", "", 0.0002)],
        )
        .unwrap();
        let sampler = SourceSampler::new(&water).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(sampler.sample(&mut rng).co2_factor, 0.0002);
    }
}
