//! Core genome trait
//!
//! This module defines the `Genome` capability contract that user-defined
//! candidate representations implement.

use rand::Rng;

use crate::error::EvoResult;

/// Candidate-solution representation evolved by the engine.
///
/// Fitness follows the minimization convention: lower is better.
/// `evaluate` may be called concurrently from several threads when parallel
/// evaluation is enabled, so it must not touch shared mutable state.
/// Cloning is provided by `Clone`.
pub trait Genome: Clone + Send + Sync + 'static {
    /// Compute the fitness of this genome
    fn evaluate(&self) -> EvoResult<f64>;

    /// Mutate the genome in place
    fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R);

    /// Recombine with `other`, overwriting both parents with the offspring
    fn crossover<R: Rng + ?Sized>(&mut self, other: &mut Self, rng: &mut R);

    /// Distance metric between two genomes (default: 0.0)
    fn distance(&self, _other: &Self) -> f64 {
        0.0
    }
}
