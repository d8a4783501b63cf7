//! Bounded archive of the best individuals seen across a run.

use super::types::{Individual, Species};
use crate::genome::Genotype;

/// Fitness-descending record of each generation's best individual,
/// truncated to a fixed capacity.
///
/// Members live outside the breeding population: recording clones the
/// individual, so later mutation of the population never disturbs the
/// archive. Ties keep the earlier-recorded entry first (stable sort).
pub struct EliteArchive<S: Species> {
    capacity: usize,
    entries: Vec<Individual<S>>,
}

impl<S: Species> EliteArchive<S> {
    /// Creates an empty archive holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::with_capacity(capacity.saturating_add(1)),
        }
    }

    /// Inserts an individual, re-sorts descending, and truncates to
    /// capacity. The best entry can only improve or stay.
    pub fn record(&mut self, individual: Individual<S>) {
        self.entries.push(individual);
        self.entries.sort_by(|a, b| {
            b.fitness_or_worst()
                .partial_cmp(&a.fitness_or_worst())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        self.entries.truncate(self.capacity);
    }

    /// The best individual recorded so far, if any.
    pub fn best(&self) -> Option<&Individual<S>> {
        self.entries.first()
    }

    /// The archived individuals, best first.
    pub fn as_slice(&self) -> &[Individual<S>] {
        &self.entries
    }

    /// The archived genotypes, best first. Used to build persisted state.
    pub fn genotypes(&self) -> Vec<Genotype<S::Value>> {
        self.entries
            .iter()
            .map(|ind| ind.genotype().clone())
            .collect()
    }

    /// Number of archived individuals.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::Domain;

    struct Plain {
        domain: Domain<u32>,
    }

    impl Plain {
        fn new() -> Self {
            Self {
                domain: Domain::builder().slot("v", 0u32..100).build().unwrap(),
            }
        }

        fn individual(&self, value: u32) -> Individual<Plain> {
            let genotype = [("v".to_string(), value)].into_iter().collect();
            let mut ind = Individual::from_genotype(genotype);
            ind.evaluate(self);
            ind
        }
    }

    impl Species for Plain {
        type Value = u32;
        type Phenotype = ();

        fn domain(&self) -> &Domain<u32> {
            &self.domain
        }

        fn fitness(&self, genotype: &Genotype<u32>, _phenotype: &()) -> f64 {
            f64::from(*genotype.get("v").unwrap())
        }
    }

    #[test]
    fn keeps_descending_order_and_capacity() {
        let species = Plain::new();
        let mut archive: EliteArchive<Plain> = EliteArchive::new(3);

        for value in [5, 50, 10, 99, 1, 70] {
            archive.record(species.individual(value));
            assert!(archive.len() <= 3);
            let fitnesses: Vec<f64> = archive
                .as_slice()
                .iter()
                .map(Individual::fitness_or_worst)
                .collect();
            for pair in fitnesses.windows(2) {
                assert!(pair[0] >= pair[1], "archive out of order: {fitnesses:?}");
            }
        }
        assert_eq!(archive.best().unwrap().fitness_or_worst(), 99.0);
    }

    #[test]
    fn best_never_degrades() {
        let species = Plain::new();
        let mut archive: EliteArchive<Plain> = EliteArchive::new(2);
        let mut top = f64::NEG_INFINITY;

        for value in [30, 10, 80, 20, 5] {
            archive.record(species.individual(value));
            let best = archive.best().unwrap().fitness_or_worst();
            assert!(best >= top);
            top = best;
        }
    }

    #[test]
    fn recorded_clone_is_isolated_from_population() {
        let species = Plain::new();
        let mut archive: EliteArchive<Plain> = EliteArchive::new(1);
        let mut ind = species.individual(40);
        archive.record(ind.clone());

        let mut rng = rand::rng();
        ind.randomize(&species, &mut rng);
        assert_eq!(archive.best().unwrap().fitness_or_worst(), 40.0);
    }
}
