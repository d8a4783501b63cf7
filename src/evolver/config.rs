//! Evolver configuration.
//!
//! [`EvolverConfig`] holds all parameters that control selection, breeding,
//! and reporting. Values are validated by [`Evolver::new`](super::Evolver::new)
//! rather than clamped: a rate that would make evolution impossible is a
//! configuration error, not something to silently correct.

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Errors raised when validating an [`EvolverConfig`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// `retain` outside `[0, 1)`. A value of 1.0 would keep the whole
    /// population as parents and never breed children.
    #[error("retain must be in [0, 1), got {0}")]
    Retain(f64),

    /// `lucky_chance` outside `[0, 1)`. A value of 1.0 would keep every
    /// individual and disable selection pressure entirely.
    #[error("lucky_chance must be in [0, 1), got {0}")]
    LuckyChance(f64),

    /// `mutate_chance` outside `[0, 1]`.
    #[error("mutate_chance must be in [0, 1], got {0}")]
    MutateChance(f64),

    /// `freak_chance` outside `[0, 1)`. A value of 1.0 would reinitialize
    /// every offspring and prevent any evolution from occurring.
    #[error("freak_chance must be in [0, 1), got {0}")]
    FreakChance(f64),

    /// `best_count` of zero — the run summary would be empty.
    #[error("best_count must be at least 1")]
    ZeroBestCount,

    /// `elite_count` of zero — the elite archive could hold nothing.
    #[error("elite_count must be at least 1")]
    ZeroEliteCount,

    /// `min_childcount` of zero — a breeding event could produce no
    /// offspring and the breeding loop would never fill the population.
    #[error("min_childcount must be at least 1")]
    ZeroChildcount,

    /// `max_childcount` below `min_childcount`.
    #[error("max_childcount {max} is below min_childcount {min}")]
    ChildcountBounds {
        /// Configured lower bound.
        min: usize,
        /// Configured upper bound.
        max: usize,
    },
}

/// Configuration for the [`Evolver`](super::Evolver).
///
/// # Defaults
///
/// ```
/// use evolizer::evolver::EvolverConfig;
///
/// let config = EvolverConfig::default();
/// assert_eq!(config.retain, 0.4);
/// assert_eq!(config.lucky_chance, 0.1);
/// assert_eq!(config.mutate_chance, 0.2);
/// ```
///
/// # Builder pattern
///
/// ```
/// use evolizer::evolver::EvolverConfig;
///
/// let config = EvolverConfig::default()
///     .with_retain(0.3)
///     .with_mutate_chance(0.5)
///     .with_seed(42);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EvolverConfig {
    /// Fraction of the ranked population kept automatically as breeding
    /// parents. Must be in `[0, 1)`.
    pub retain: f64,

    /// Independent per-individual probability that a non-retained individual
    /// is kept as a parent anyway. Must be in `[0, 1)`.
    pub lucky_chance: f64,

    /// Independent per-offspring probability of one single-point mutation
    /// after crossover. Must be in `[0, 1]`.
    pub mutate_chance: f64,

    /// Independent per-offspring probability of full reinitialization after
    /// crossover and mutation — an unrelated "freak" genotype entering the
    /// gene pool. Must be in `[0, 1)`.
    pub freak_chance: f64,

    /// How many top-ranked individuals the run summary reports.
    pub best_count: usize,

    /// Capacity of the elite archive.
    pub elite_count: usize,

    /// Inclusive lower bound on offspring per breeding event. At least 1.
    pub min_childcount: usize,

    /// Inclusive upper bound on offspring per breeding event.
    /// At least `min_childcount`.
    pub max_childcount: usize,

    /// Whether to evaluate the population in parallel. Only effective with
    /// the `parallel` feature; ignored otherwise.
    pub parallel: bool,

    /// Random seed for reproducibility. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for EvolverConfig {
    fn default() -> Self {
        Self {
            retain: 0.4,
            lucky_chance: 0.1,
            mutate_chance: 0.2,
            freak_chance: 0.05,
            best_count: 5,
            elite_count: 10,
            min_childcount: 1,
            max_childcount: 4,
            parallel: false,
            seed: None,
        }
    }
}

impl EvolverConfig {
    /// Sets the retained parent fraction.
    pub fn with_retain(mut self, retain: f64) -> Self {
        self.retain = retain;
        self
    }

    /// Sets the lucky-survivor probability.
    pub fn with_lucky_chance(mut self, chance: f64) -> Self {
        self.lucky_chance = chance;
        self
    }

    /// Sets the per-offspring mutation probability.
    pub fn with_mutate_chance(mut self, chance: f64) -> Self {
        self.mutate_chance = chance;
        self
    }

    /// Sets the per-offspring freak-reinitialization probability.
    pub fn with_freak_chance(mut self, chance: f64) -> Self {
        self.freak_chance = chance;
        self
    }

    /// Sets how many top individuals the summary reports.
    pub fn with_best_count(mut self, count: usize) -> Self {
        self.best_count = count;
        self
    }

    /// Sets the elite archive capacity.
    pub fn with_elite_count(mut self, count: usize) -> Self {
        self.elite_count = count;
        self
    }

    /// Sets the inclusive offspring-per-breeding bounds.
    pub fn with_childcount(mut self, min: usize, max: usize) -> Self {
        self.min_childcount = min;
        self.max_childcount = max;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns the first violated constraint. Note the half-open ranges:
    /// `retain`, `lucky_chance`, and `freak_chance` at exactly 1.0 each make
    /// evolution impossible and are rejected.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..1.0).contains(&self.retain) {
            return Err(ConfigError::Retain(self.retain));
        }
        if !(0.0..1.0).contains(&self.lucky_chance) {
            return Err(ConfigError::LuckyChance(self.lucky_chance));
        }
        if !(0.0..=1.0).contains(&self.mutate_chance) {
            return Err(ConfigError::MutateChance(self.mutate_chance));
        }
        if !(0.0..1.0).contains(&self.freak_chance) {
            return Err(ConfigError::FreakChance(self.freak_chance));
        }
        if self.best_count == 0 {
            return Err(ConfigError::ZeroBestCount);
        }
        if self.elite_count == 0 {
            return Err(ConfigError::ZeroEliteCount);
        }
        if self.min_childcount == 0 {
            return Err(ConfigError::ZeroChildcount);
        }
        if self.max_childcount < self.min_childcount {
            return Err(ConfigError::ChildcountBounds {
                min: self.min_childcount,
                max: self.max_childcount,
            });
        }
        Ok(())
    }
}
