//! Migration between populations
//!
//! A migrator exchanges individuals among populations at the cadence set on
//! the orchestrator. Migration only changes the composition of populations:
//! the number of populations, each population's size, and therefore the total
//! individual count are left untouched.

pub mod ring_swap;
pub mod topology;

use rand::RngCore;

use crate::error::EvoResult;
use crate::genome::traits::Genome;
use crate::population::population::Population;

/// Pluggable migration policy
pub trait Migrator<G: Genome>: Send + Sync {
    /// Check the policy against the configured number of populations and
    /// their size, called once at construction
    fn validate(&self, n_pops: usize, pop_size: usize) -> EvoResult<()>;

    /// Exchange individuals among `pops` in place
    fn apply(&self, pops: &mut [Population<G>], rng: &mut dyn RngCore) -> EvoResult<()>;
}

pub mod prelude {
    pub use super::ring_swap::*;
    pub use super::topology::*;
    pub use super::Migrator;
}
