//! The generation loop: evaluate, archive, terminate or breed.
//!
//! [`Evolver`] is an explicit run/session object. It owns the configuration,
//! RNG, generation counter, elite archive, and a cancellation flag, so any
//! number of runs can coexist in one process without shared state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::config::{ConfigError, EvolverConfig};
use super::elite::EliteArchive;
use super::types::{GenerationReport, GenerationStats, Individual, Species};

/// Result of an [`Evolver::optimize`] run.
pub struct RunResult<S: Species> {
    /// The final population, ranked by fitness descending.
    pub population: Vec<Individual<S>>,
    /// The top `best_count` of the final population.
    pub best: Vec<Individual<S>>,
    /// The elite archive contents, best first.
    pub elite: Vec<Individual<S>>,
    /// Mean fitness of the final population.
    pub avg_fitness: f64,
    /// Total generations processed by this evolver, across resumes.
    pub generations: usize,
    /// Whether a candidate reported itself finished.
    pub finished: bool,
    /// Whether the run was cancelled externally.
    pub cancelled: bool,
}

impl<S: Species> Clone for RunResult<S> {
    fn clone(&self) -> Self {
        Self {
            population: self.population.clone(),
            best: self.best.clone(),
            elite: self.elite.clone(),
            avg_fitness: self.avg_fitness,
            generations: self.generations,
            finished: self.finished,
            cancelled: self.cancelled,
        }
    }
}

/// Orchestrates selection, breeding, mutation, and elitism over a
/// population of [`Individual`]s.
///
/// # Usage
///
/// ```
/// use evolizer::evolver::{Evolver, EvolverConfig, Individual, Species};
/// use evolizer::genome::{Domain, Genotype};
///
/// struct BitFlags {
///     domain: Domain<bool>,
/// }
///
/// impl Species for BitFlags {
///     type Value = bool;
///     type Phenotype = ();
///     fn domain(&self) -> &Domain<bool> {
///         &self.domain
///     }
///     fn fitness(&self, genotype: &Genotype<bool>, _phenotype: &()) -> f64 {
///         genotype.values().filter(|&&b| b).count() as f64
///     }
/// }
///
/// let species = BitFlags {
///     domain: Domain::builder()
///         .slot("a", [false, true])
///         .slot("b", [false, true])
///         .build()
///         .unwrap(),
/// };
/// let mut evolver = Evolver::new(EvolverConfig::default().with_seed(42)).unwrap();
/// let population = evolver.initial_population(&species, 10);
/// let result = evolver.optimize(&species, population, 20);
/// assert_eq!(result.population.len(), 10);
/// ```
pub struct Evolver<S: Species> {
    config: EvolverConfig,
    rng: StdRng,
    elite: EliteArchive<S>,
    generation: usize,
    cancel: Arc<AtomicBool>,
    history: Vec<GenerationStats>,
}

impl<S: Species> Evolver<S> {
    /// Creates an evolver, validating the configuration first.
    ///
    /// # Errors
    /// Returns the validation error; no evolver is constructed for an
    /// invalid configuration.
    pub fn new(config: EvolverConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };
        let elite = EliteArchive::new(config.elite_count);
        Ok(Self {
            config,
            rng,
            elite,
            generation: 0,
            cancel: Arc::new(AtomicBool::new(false)),
            history: Vec::new(),
        })
    }

    /// Creates `size` individuals with random genotypes.
    pub fn initial_population(&mut self, species: &S, size: usize) -> Vec<Individual<S>> {
        (0..size)
            .map(|_| Individual::random(species, &mut self.rng))
            .collect()
    }

    /// A handle for requesting cooperative cancellation.
    ///
    /// Setting the flag stops the run at the next generation boundary;
    /// [`optimize`](Self::optimize) then produces its normal summary from
    /// whatever state exists. Cancellation is never an error.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// The configuration this evolver runs with.
    pub fn config(&self) -> &EvolverConfig {
        &self.config
    }

    /// Zero-based index of the next generation to process. Counts across
    /// resumed runs.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// The elite archive accumulated so far.
    pub fn elite(&self) -> &EliteArchive<S> {
        &self.elite
    }

    /// Per-generation statistics recorded so far.
    pub fn history(&self) -> &[GenerationStats] {
        &self.history
    }

    pub(super) fn set_generation(&mut self, generation: usize) {
        self.generation = generation;
    }

    pub(super) fn elite_mut(&mut self) -> &mut EliteArchive<S> {
        &mut self.elite
    }

    /// Produces the next generation from `population`.
    ///
    /// Ranks by fitness descending (ties keep input order), keeps the top
    /// `retain` fraction plus lucky survivors as parents, then breeds
    /// offspring until the population size is restored. Each breeding event
    /// pairs two distinct parents and yields a uniformly drawn brood of
    /// `min_childcount..=max_childcount` children; each child is mutated
    /// with probability `mutate_chance` and reinitialized ("freak") with
    /// probability `freak_chance`. The returned population has exactly the
    /// input size and is ranked descending.
    ///
    /// # Panics
    /// Panics if `population` holds fewer than two individuals — breeding
    /// needs a pair.
    pub fn evolve(&mut self, species: &S, population: Vec<Individual<S>>) -> Vec<Individual<S>> {
        let size = population.len();
        assert!(size >= 2, "population must hold at least two individuals");

        let mut graded = population;
        self.evaluate_population(species, &mut graded);
        rank_descending(&mut graded);

        let retain_len = (size as f64 * self.config.retain) as usize;
        let mut parents: Vec<Individual<S>> = Vec::with_capacity(size);
        let mut rejected: Vec<Individual<S>> = Vec::with_capacity(size - retain_len);
        for (rank, individual) in graded.into_iter().enumerate() {
            if rank < retain_len || self.rng.random_range(0.0..1.0) < self.config.lucky_chance {
                parents.push(individual);
            } else {
                rejected.push(individual);
            }
        }
        // Breeding needs a pair; top up from the best rejected if selection
        // left fewer than two parents.
        while parents.len() < 2 && !rejected.is_empty() {
            parents.push(rejected.remove(0));
        }
        drop(rejected);

        let needed = size - parents.len();
        let mut offspring: Vec<Individual<S>> = Vec::with_capacity(needed);
        while offspring.len() < needed {
            let mother = self.rng.random_range(0..parents.len());
            let father = self.rng.random_range(0..parents.len());
            if mother == father {
                // Self-pairing is expected; redraw.
                continue;
            }
            let brood = self
                .rng
                .random_range(self.config.min_childcount..=self.config.max_childcount);
            for _ in 0..brood {
                if offspring.len() >= needed {
                    break;
                }
                let mut child =
                    Individual::crossover(species, &parents[mother], &parents[father], &mut self.rng);
                if self.rng.random_range(0.0..1.0) < self.config.mutate_chance {
                    child.mutate(species, &mut self.rng);
                }
                if self.rng.random_range(0.0..1.0) < self.config.freak_chance {
                    child.randomize(species, &mut self.rng);
                }
                offspring.push(child);
            }
        }

        let mut next = parents;
        next.append(&mut offspring);
        self.evaluate_population(species, &mut next);
        rank_descending(&mut next);
        next
    }

    /// Runs the generation loop for up to `generations` generations.
    ///
    /// Each generation: checks the cancellation flag, evaluates the
    /// population (skipping `live()` for unchanged genotypes), records the
    /// generation's best in the elite archive, reports statistics, stops if
    /// any candidate is [`finished`](Species::finished), and otherwise
    /// evolves — except after the final generation. The summary is emitted
    /// on every exit path, including cancellation.
    ///
    /// # Panics
    /// Panics if `population` holds fewer than two individuals.
    pub fn optimize(
        &mut self,
        species: &S,
        mut population: Vec<Individual<S>>,
        generations: usize,
    ) -> RunResult<S> {
        assert!(
            population.len() >= 2,
            "population must hold at least two individuals"
        );

        let mut finished = false;
        let mut cancelled = false;

        for gen in 0..generations {
            if self.cancel.load(Ordering::Relaxed) {
                cancelled = true;
                break;
            }

            self.evaluate_population(species, &mut population);
            rank_descending(&mut population);

            if let Some(best) = population.first() {
                self.elite.record(best.clone());
            }

            let stats = GenerationStats {
                generation: self.generation,
                best_fitness: population
                    .first()
                    .map_or(f64::NEG_INFINITY, Individual::fitness_or_worst),
                avg_fitness: average_fitness(&population),
            };
            log::debug!(
                "generation {}: best={:.4} avg={:.4}",
                stats.generation,
                stats.best_fitness,
                stats.avg_fitness
            );
            let report_len = population.len().min(self.config.best_count);
            species.on_generation(&GenerationReport {
                stats,
                best: &population[..report_len],
                elite: &self.elite,
            });
            self.history.push(stats);

            if population.iter().any(|ind| ind.finished(species)) {
                finished = true;
                self.generation += 1;
                break;
            }

            if gen + 1 < generations {
                population = self.evolve(species, population);
            }
            self.generation += 1;
        }

        self.summarize(population, finished, cancelled)
    }

    fn summarize(
        &self,
        mut population: Vec<Individual<S>>,
        finished: bool,
        cancelled: bool,
    ) -> RunResult<S> {
        rank_descending(&mut population);
        let best: Vec<Individual<S>> = population
            .iter()
            .take(self.config.best_count)
            .cloned()
            .collect();
        let elite = self.elite.as_slice().to_vec();
        let avg_fitness = average_fitness(&population);

        log::info!(
            "run summary: generations={} best={:.4} avg={:.4} elite={} finished={} cancelled={}",
            self.generation,
            best.first().map_or(f64::NEG_INFINITY, Individual::fitness_or_worst),
            avg_fitness,
            elite.len(),
            finished,
            cancelled
        );

        RunResult {
            population,
            best,
            elite,
            avg_fitness,
            generations: self.generation,
            finished,
            cancelled,
        }
    }

    fn evaluate_population(&self, species: &S, population: &mut [Individual<S>]) {
        #[cfg(feature = "parallel")]
        if self.config.parallel {
            population
                .par_iter_mut()
                .for_each(|individual| individual.evaluate(species));
            return;
        }
        for individual in population.iter_mut() {
            individual.evaluate(species);
        }
    }
}

/// Sorts by cached fitness, best first. The sort is stable, so equally fit
/// individuals keep their input order — the documented tie-break.
fn rank_descending<S: Species>(population: &mut [Individual<S>]) {
    population.sort_by(|a, b| {
        b.fitness_or_worst()
            .partial_cmp(&a.fitness_or_worst())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Mean cached fitness over the population, `NEG_INFINITY` when empty or
/// fully unevaluated.
fn average_fitness<S: Species>(population: &[Individual<S>]) -> f64 {
    if population.is_empty() {
        return f64::NEG_INFINITY;
    }
    population
        .iter()
        .map(Individual::fitness_or_worst)
        .sum::<f64>()
        / population.len() as f64
}
