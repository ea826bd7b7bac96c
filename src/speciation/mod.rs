//! Speciation
//!
//! A speciator partitions the individuals of one population into disjoint
//! niches. The orchestrator evolves each niche separately and concatenates
//! the results back into a population of the original size.

pub mod fitness_interval;
pub mod kmedoids;

use rand::RngCore;

use crate::error::EvoResult;
use crate::genome::traits::Genome;
use crate::population::individual::Individual;

/// Pluggable partitioning policy
pub trait Speciator<G: Genome>: Send + Sync {
    /// Check the configuration against the configured population size,
    /// called once at construction
    fn validate(&self, pop_size: usize) -> EvoResult<()>;

    /// Partition `individuals` into species
    ///
    /// Individuals are moved, never copied: the species are pairwise
    /// disjoint and together hold exactly the input.
    fn apply(
        &self,
        individuals: Vec<Individual<G>>,
        rng: &mut dyn RngCore,
    ) -> EvoResult<Vec<Vec<Individual<G>>>>;
}

pub mod prelude {
    pub use super::fitness_interval::*;
    pub use super::kmedoids::*;
    pub use super::Speciator;
}
