//! Evolutionary optimizer engine.
//!
//! A generic, domain-agnostic generation-evolution loop built on trait-based
//! abstractions. Users define their problem by implementing [`Species`],
//! which supplies the parameter domain and the evaluation rule; the engine
//! owns ranking, parent selection, breeding, mutation, freak
//! reinitialization, elitism, evaluation caching, and cancellation.
//!
//! # Core traits
//!
//! - [`Species`]: Problem definition — domain, `live`, `fitness`, `finished`
//!
//! # Key types
//!
//! - [`Individual`]: A candidate with genotype, phenotype, and fitness cache
//! - [`EvolverConfig`]: Algorithm parameters (selection, breeding, reporting)
//! - [`Evolver`]: Executes the generation loop as an explicit session
//! - [`EliteArchive`]: Bounded record of the best candidates across a run
//! - [`RunResult`]: Final population, top performers, and run statistics
//! - [`RunSnapshot`]: Plain-data run state for external persistence
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and
//!   Machine Learning*

mod config;
mod elite;
mod runner;
mod snapshot;
mod types;

pub use config::{ConfigError, EvolverConfig};
pub use elite::EliteArchive;
pub use runner::{Evolver, RunResult};
pub use snapshot::{RunSettings, RunSnapshot, RunState};
pub use types::{GenerationReport, GenerationStats, Individual, Species};
