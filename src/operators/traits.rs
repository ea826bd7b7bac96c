//! Operator traits
//!
//! This module defines the parent selection trait used by the models.
//! Variation itself (mutation, crossover) belongs to the genome.

use rand::Rng;

use crate::error::EvoResult;
use crate::genome::traits::Genome;
use crate::population::individual::Individual;

/// Selection operator trait
///
/// Selects individuals from a population for reproduction. Fitness is
/// minimized, so lower values are preferred.
pub trait Selector: Send + Sync {
    /// Check the operator configuration
    fn validate(&self) -> EvoResult<()>;

    /// Select a single individual, returning its index
    fn select<G: Genome, R: Rng + ?Sized>(
        &self,
        individuals: &[Individual<G>],
        rng: &mut R,
    ) -> EvoResult<usize>;

    /// Select `n` individuals, returning their indices
    fn select_many<G: Genome, R: Rng + ?Sized>(
        &self,
        n: usize,
        individuals: &[Individual<G>],
        rng: &mut R,
    ) -> EvoResult<Vec<usize>> {
        (0..n).map(|_| self.select(individuals, rng)).collect()
    }
}
