//! # evo-archipelago
//!
//! A multi-population evolutionary optimization engine for Rust.
//!
//! Several populations of candidate solutions evolve side by side under a
//! pluggable model, optionally exchanging individuals (migration) and
//! splitting into niches (speciation), while a bounded hall of fame keeps
//! the best candidates ever seen. Fitness is minimized.
//!
//! ## Core Concepts
//!
//! - **Genome**: the user-defined representation; it evaluates, mutates and
//!   recombines itself
//! - **Model**: evolves one population by one generation
//! - **Migrator / Speciator**: pluggable policies that never change
//!   population sizes
//! - **Deterministic parallelism**: every per-population task draws from its
//!   own stream derived from the master seed
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use evo_archipelago::prelude::*;
//! use rand::rngs::StdRng;
//!
//! let mut ga: GA<RealVector> = GaBuilder::with_defaults()
//!     .n_pops(4)
//!     .pop_size(50)
//!     .migrator(TopologyMigrator::ring(2), 10)
//!     .seed(42)
//!     .build()?;
//!
//! ga.minimize(|rng: &mut StdRng| RealVector::random(10, -5.0, 5.0, rng))?;
//! println!("best fitness: {:?}", ga.best().map(|i| i.fitness));
//! # Ok::<(), EvolutionError>(())
//! ```

pub mod checkpoint;
pub mod error;
pub mod ga;
pub mod genome;
pub mod hall_of_fame;
pub mod migration;
pub mod models;
pub mod operators;
pub mod population;
pub mod random;
pub mod speciation;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::checkpoint::prelude::*;
    pub use crate::error::*;
    pub use crate::ga::{Callback, EarlyStop, GaBuilder, GaConfig, GA};
    pub use crate::genome::prelude::*;
    pub use crate::hall_of_fame::HallOfFame;
    pub use crate::migration::prelude::*;
    pub use crate::models::prelude::*;
    pub use crate::operators::prelude::*;
    pub use crate::population::prelude::*;
    pub use crate::speciation::prelude::*;
}
