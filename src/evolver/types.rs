//! Core trait definitions for the evolver.
//!
//! [`Species`] is the contract between the generic engine and a
//! domain-specific problem: it supplies the parameter domain and the
//! evaluation rule. [`Individual`] is the engine-owned candidate wrapper
//! that carries a genotype, its phenotype state, and an evaluation cache.

use super::elite::EliteArchive;
use crate::genome::{Domain, Gene, Genotype};
use rand::Rng;

/// Per-generation scalar statistics, kept in the evolver's run history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationStats {
    /// Zero-based generation index within the run.
    pub generation: usize,
    /// Fitness of the generation's best individual.
    pub best_fitness: f64,
    /// Mean fitness over the whole population.
    pub avg_fitness: f64,
}

/// Per-generation reporting surface handed to [`Species::on_generation`].
///
/// Borrows the engine's state for the duration of the callback: the ranked
/// population truncated to `best_count`, the elite archive as accumulated so
/// far, and the scalar statistics that also go into the run history.
pub struct GenerationReport<'a, S: Species> {
    /// Scalar statistics for this generation.
    pub stats: GenerationStats,
    /// This generation's population, ranked descending and truncated to
    /// `best_count`.
    pub best: &'a [Individual<S>],
    /// The elite archive, including this generation's best.
    pub elite: &'a EliteArchive<S>,
}

/// Defines an optimization problem over a discrete parameter domain.
///
/// Implementors supply the domain and the scoring rule; the engine owns
/// selection, breeding, mutation, and caching. Higher fitness is better.
///
/// # Thread safety
///
/// `Species` must be `Send + Sync` because the evolver may evaluate the
/// population in parallel (behind the `parallel` feature).
///
/// # Implementing
///
/// ```
/// use evolizer::genome::{Domain, Genotype};
/// use evolizer::evolver::Species;
///
/// struct BitFlags {
///     domain: Domain<bool>,
/// }
///
/// impl Species for BitFlags {
///     type Value = bool;
///     type Phenotype = ();
///
///     fn domain(&self) -> &Domain<bool> {
///         &self.domain
///     }
///
///     fn fitness(&self, genotype: &Genotype<bool>, _phenotype: &()) -> f64 {
///         genotype.values().filter(|&&b| b).count() as f64
///     }
/// }
/// ```
pub trait Species: Send + Sync {
    /// The gene value type.
    type Value: Gene;

    /// Candidate-local state produced by [`live`](Species::live).
    ///
    /// Problems that score the genotype directly use `()`.
    type Phenotype: Clone + Default + Send + Sync;

    /// The shared, immutable parameter domain for this species.
    fn domain(&self) -> &Domain<Self::Value>;

    /// Converts a genotype into its measurable phenotype.
    ///
    /// This is typically the expensive step (simulation, training, I/O).
    /// The engine skips it whenever the genotype is unchanged since the
    /// previous evaluation. The default returns `Phenotype::default()`.
    fn live(&self, _genotype: &Genotype<Self::Value>) -> Self::Phenotype {
        Self::Phenotype::default()
    }

    /// Deterministic, higher-is-better score for a candidate.
    ///
    /// Must not observe anything but the genotype and phenotype; repeated
    /// calls with the same inputs must return the same value (the engine
    /// memoizes the result).
    fn fitness(&self, genotype: &Genotype<Self::Value>, phenotype: &Self::Phenotype) -> f64;

    /// True iff the candidate is a satisfactory terminal solution.
    ///
    /// Used only to stop the generation loop early, never to filter
    /// population membership. Defaults to `false`.
    fn finished(&self, _genotype: &Genotype<Self::Value>, _phenotype: &Self::Phenotype) -> bool {
        false
    }

    /// Observation hook called once per generation after evaluation and
    /// elite recording.
    ///
    /// The report carries the ranked top individuals, the elite archive,
    /// and the generation's statistics. Useful for logging, progress
    /// reporting, or driving an external persistence layer. Default no-op.
    fn on_generation(&self, _report: &GenerationReport<'_, Self>)
    where
        Self: Sized,
    {
    }
}

/// A candidate solution: genotype, phenotype state, and evaluation cache.
///
/// The cache is a snapshot of the genotype at its last evaluation plus the
/// memoized fitness; it stays valid exactly while the current genotype
/// equals the snapshot, so any genotype change invalidates it implicitly.
pub struct Individual<S: Species> {
    genotype: Genotype<S::Value>,
    phenotype: S::Phenotype,
    evaluated: Option<(Genotype<S::Value>, f64)>,
}

impl<S: Species> Individual<S> {
    /// Creates an individual with a fully random genotype.
    pub fn random<R: Rng>(species: &S, rng: &mut R) -> Self {
        Self::from_genotype(species.domain().sample(rng))
    }

    /// Creates an individual from an explicit genotype (offspring, restore).
    pub fn from_genotype(genotype: Genotype<S::Value>) -> Self {
        Self {
            genotype,
            phenotype: S::Phenotype::default(),
            evaluated: None,
        }
    }

    /// The current genotype.
    pub fn genotype(&self) -> &Genotype<S::Value> {
        &self.genotype
    }

    /// The phenotype produced by the most recent [`evaluate`](Self::evaluate).
    pub fn phenotype(&self) -> &S::Phenotype {
        &self.phenotype
    }

    /// Runs `live()` and scores the candidate, unless the genotype is
    /// unchanged since the last evaluation, in which case both are skipped
    /// and the memoized fitness stands.
    pub fn evaluate(&mut self, species: &S) {
        if let Some((snapshot, _)) = &self.evaluated {
            if *snapshot == self.genotype {
                return;
            }
        }
        self.phenotype = species.live(&self.genotype);
        let fitness = species.fitness(&self.genotype, &self.phenotype);
        self.evaluated = Some((self.genotype.clone(), fitness));
    }

    /// The memoized fitness, valid only while the genotype matches the
    /// evaluation snapshot. `None` for never-evaluated or stale candidates.
    pub fn cached_fitness(&self) -> Option<f64> {
        match &self.evaluated {
            Some((snapshot, fitness)) if *snapshot == self.genotype => Some(*fitness),
            _ => None,
        }
    }

    /// The memoized fitness, or `f64::NEG_INFINITY` when none is valid.
    /// Unevaluated candidates rank below every evaluated one.
    pub fn fitness_or_worst(&self) -> f64 {
        self.cached_fitness().unwrap_or(f64::NEG_INFINITY)
    }

    /// True iff the species considers this candidate terminal.
    /// Meaningful after [`evaluate`](Self::evaluate).
    pub fn finished(&self, species: &S) -> bool {
        species.finished(&self.genotype, &self.phenotype)
    }

    /// Overwrites the genotype with a fresh uniform draw ("freak"
    /// reinitialization or initial population seeding).
    pub fn randomize<R: Rng>(&mut self, species: &S, rng: &mut R) {
        self.genotype = species.domain().sample(rng);
    }

    /// Single-point mutation of one uniformly chosen slot.
    pub fn mutate<R: Rng>(&mut self, species: &S, rng: &mut R) {
        species.domain().mutate(&mut self.genotype, rng);
    }

    /// Breeds a child by uniform crossover of two parents. The child starts
    /// unevaluated.
    pub fn crossover<R: Rng>(species: &S, mother: &Self, father: &Self, rng: &mut R) -> Self {
        Self::from_genotype(
            species
                .domain()
                .crossover(&mother.genotype, &father.genotype, rng),
        )
    }
}

impl<S: Species> Clone for Individual<S> {
    fn clone(&self) -> Self {
        Self {
            genotype: self.genotype.clone(),
            phenotype: self.phenotype.clone(),
            evaluated: self.evaluated.clone(),
        }
    }
}

impl<S: Species> std::fmt::Debug for Individual<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Individual")
            .field("genotype", &self.genotype)
            .field("fitness", &self.cached_fitness())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        domain: Domain<u8>,
        live_calls: AtomicUsize,
    }

    impl Counting {
        fn new() -> Self {
            let domain = Domain::builder()
                .slot("a", [0u8, 1, 2])
                .slot("b", [0u8, 1, 2])
                .build()
                .unwrap();
            Self {
                domain,
                live_calls: AtomicUsize::new(0),
            }
        }
    }

    impl Species for Counting {
        type Value = u8;
        type Phenotype = u64;

        fn domain(&self) -> &Domain<u8> {
            &self.domain
        }

        fn live(&self, genotype: &Genotype<u8>) -> u64 {
            self.live_calls.fetch_add(1, Ordering::SeqCst);
            genotype.values().map(|&v| u64::from(v)).sum()
        }

        fn fitness(&self, _genotype: &Genotype<u8>, phenotype: &u64) -> f64 {
            *phenotype as f64
        }
    }

    #[test]
    fn evaluate_skips_live_for_unchanged_genotype() {
        let species = Counting::new();
        let mut rng = StdRng::seed_from_u64(1);
        let mut ind = Individual::random(&species, &mut rng);

        ind.evaluate(&species);
        ind.evaluate(&species);
        ind.evaluate(&species);
        assert_eq!(species.live_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn randomize_invalidates_cache() {
        let species = Counting::new();
        let mut rng = StdRng::seed_from_u64(1);
        let mut ind = Individual::random(&species, &mut rng);

        ind.evaluate(&species);
        let first = ind.genotype().clone();
        // Loop until the draw actually differs; two three-way slots make a
        // repeat draw likely on any single attempt.
        loop {
            ind.randomize(&species, &mut rng);
            if *ind.genotype() != first {
                break;
            }
        }
        assert_eq!(ind.cached_fitness(), None);
        ind.evaluate(&species);
        assert_eq!(species.live_calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn noop_mutation_keeps_cache_warm() {
        let species = Counting::new();
        let mut rng = StdRng::seed_from_u64(1);
        let mut ind = Individual::random(&species, &mut rng);
        ind.evaluate(&species);
        let before = ind.genotype().clone();

        // Find a seed state where the mutation redraws the same value.
        loop {
            let mut probe = ind.clone();
            probe.mutate(&species, &mut rng);
            if *probe.genotype() == before {
                probe.evaluate(&species);
                assert_eq!(species.live_calls.load(Ordering::SeqCst), 1);
                break;
            }
        }
    }

    #[test]
    fn unevaluated_ranks_worst() {
        let species = Counting::new();
        let mut rng = StdRng::seed_from_u64(1);
        let ind = Individual::random(&species, &mut rng);
        assert_eq!(ind.cached_fitness(), None);
        assert_eq!(ind.fitness_or_worst(), f64::NEG_INFINITY);
    }

    #[test]
    fn crossover_child_starts_unevaluated() {
        let species = Counting::new();
        let mut rng = StdRng::seed_from_u64(1);
        let mut mother = Individual::random(&species, &mut rng);
        let mut father = Individual::random(&species, &mut rng);
        mother.evaluate(&species);
        father.evaluate(&species);

        let child = Individual::crossover(&species, &mother, &father, &mut rng);
        assert_eq!(child.cached_fitness(), None);
        assert!(species.domain.contains(child.genotype()));
    }
}
