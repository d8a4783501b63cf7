//! Persisted-state shape for external storage layers.
//!
//! The engine never serializes itself; it exposes [`RunSnapshot`] as the
//! complete, plain-data description of a run — settings plus current state —
//! and can rebuild an [`Evolver`] and population from one. With the `serde`
//! feature the shape derives `Serialize`/`Deserialize`, so a storage
//! collaborator can persist it as JSON or anything else.

use super::config::{ConfigError, EvolverConfig};
use super::runner::Evolver;
use super::types::{Individual, Species};
use crate::genome::{Domain, Gene, Genotype};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Everything needed to restart a run: configuration, generation budget,
/// and the domain the genotypes are drawn from.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RunSettings<V: Gene> {
    /// The evolver configuration.
    pub config: EvolverConfig,
    /// The generation budget the run was started with.
    pub generations: usize,
    /// The parameter domain.
    pub domain: Domain<V>,
}

/// The mutable part of a run: where it is and what it holds.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RunState<V: Gene> {
    /// Zero-based index of the next generation to process.
    pub generation_index: usize,
    /// Elite archive genotypes, best first.
    pub elite: Vec<Genotype<V>>,
    /// Current population genotypes, ranked best first.
    pub population: Vec<Genotype<V>>,
}

/// A full snapshot of a run, ready for external persistence.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RunSnapshot<V: Gene> {
    /// Immutable run parameters.
    pub settings: RunSettings<V>,
    /// Current run state.
    pub state: RunState<V>,
}

impl<S: Species> Evolver<S> {
    /// Captures the current run as plain data.
    ///
    /// `generations` is the overall budget the caller runs with, recorded so
    /// a resumed run knows how much work remains.
    pub fn snapshot(
        &self,
        species: &S,
        population: &[Individual<S>],
        generations: usize,
    ) -> RunSnapshot<S::Value> {
        RunSnapshot {
            settings: RunSettings {
                config: self.config().clone(),
                generations,
                domain: species.domain().clone(),
            },
            state: RunState {
                generation_index: self.generation(),
                elite: self.elite().genotypes(),
                population: population
                    .iter()
                    .map(|ind| ind.genotype().clone())
                    .collect(),
            },
        }
    }

    /// Rebuilds an evolver and population from a snapshot.
    ///
    /// Elite members are re-evaluated so the archive keeps its ordering;
    /// the population comes back unevaluated and is scored by the next
    /// [`optimize`](Self::optimize) call through the normal cache path.
    /// The RNG restarts from the configured seed.
    ///
    /// # Errors
    /// Fails if the snapshot's configuration no longer validates.
    pub fn restore(
        species: &S,
        snapshot: &RunSnapshot<S::Value>,
    ) -> Result<(Self, Vec<Individual<S>>), ConfigError> {
        let mut evolver = Self::new(snapshot.settings.config.clone())?;
        evolver.set_generation(snapshot.state.generation_index);
        for genotype in &snapshot.state.elite {
            let mut member: Individual<S> = Individual::from_genotype(genotype.clone());
            member.evaluate(species);
            evolver.elite_mut().record(member);
        }
        let population = snapshot
            .state
            .population
            .iter()
            .map(|genotype| Individual::from_genotype(genotype.clone()))
            .collect();
        Ok((evolver, population))
    }
}
