//! Domain-agnostic evolutionary optimizer.
//!
//! Candidate solutions are described by a named set of discrete parameters,
//! each drawn from a finite domain. The engine iteratively selects, breeds,
//! and mutates a fixed-size population toward higher fitness, as scored by a
//! user-supplied evaluation rule. It knows nothing about any concrete
//! problem — strings, knapsacks, network layouts — those implement the
//! [`Species`](evolver::Species) contract.
//!
//! # Modules
//!
//! - [`genome`]: Parameter domains and genotypes, with uniform sampling,
//!   single-point mutation, and uniform crossover.
//! - [`evolver`]: The generation loop — selection, survivor retention,
//!   breeding with variable offspring counts, mutation, freak
//!   reinitialization, elitism, evaluation caching, early termination, and
//!   cooperative cancellation.
//!
//! # Example
//!
//! ```
//! use evolizer::evolver::{Evolver, EvolverConfig, Species};
//! use evolizer::genome::{Domain, Genotype};
//!
//! // Maximize the number of enabled flags.
//! struct Flags {
//!     domain: Domain<bool>,
//! }
//!
//! impl Species for Flags {
//!     type Value = bool;
//!     type Phenotype = ();
//!
//!     fn domain(&self) -> &Domain<bool> {
//!         &self.domain
//!     }
//!
//!     fn fitness(&self, genotype: &Genotype<bool>, _phenotype: &()) -> f64 {
//!         genotype.values().filter(|&&b| b).count() as f64
//!     }
//! }
//!
//! let mut builder = Domain::builder();
//! for i in 0..8 {
//!     builder = builder.slot(format!("flag{i}"), [false, true]);
//! }
//! let species = Flags {
//!     domain: builder.build().unwrap(),
//! };
//!
//! let mut evolver = Evolver::new(EvolverConfig::default().with_seed(42)).unwrap();
//! let population = evolver.initial_population(&species, 20);
//! let result = evolver.optimize(&species, population, 50);
//! assert_eq!(result.population.len(), 20);
//! ```
//!
//! # Features
//!
//! - `serde`: `Serialize`/`Deserialize` on domains, genotypes,
//!   configuration, and [`RunSnapshot`](evolver::RunSnapshot) for external
//!   persistence layers.
//! - `parallel`: rayon-based population evaluation, opted into per run via
//!   [`EvolverConfig::with_parallel`](evolver::EvolverConfig::with_parallel).

pub mod evolver;
pub mod genome;
