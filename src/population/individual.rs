//! Individual wrapper type
//!
//! This module provides the Individual type that wraps a genome with its fitness.

use std::cmp::Ordering;

use rand::Rng;

use crate::error::EvoResult;
use crate::genome::traits::Genome;

/// An individual in the population
///
/// Wraps a genome with its computed fitness value. The fitness is
/// meaningless until `evaluated` is true; unevaluated individuals carry
/// `+inf` so that they always rank last.
#[derive(Clone, Debug)]
pub struct Individual<G: Genome> {
    /// The genome of this individual
    pub genome: G,
    /// The fitness value (lower is better)
    pub fitness: f64,
    /// Whether `fitness` reflects the current genome
    pub evaluated: bool,
}

impl<G: Genome> Individual<G> {
    /// Create a new individual with an unevaluated genome
    pub fn new(genome: G) -> Self {
        Self {
            genome,
            fitness: f64::INFINITY,
            evaluated: false,
        }
    }

    /// Create a new individual with a known fitness
    pub fn with_fitness(genome: G, fitness: f64) -> Self {
        Self {
            genome,
            fitness,
            evaluated: true,
        }
    }

    /// Check if this individual has been evaluated
    pub fn is_evaluated(&self) -> bool {
        self.evaluated
    }

    /// Evaluate the genome if it has not been evaluated yet
    pub fn evaluate(&mut self) -> EvoResult<()> {
        if !self.evaluated {
            self.fitness = self.genome.evaluate()?;
            self.evaluated = true;
        }
        Ok(())
    }

    /// Set the fitness value
    pub fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
        self.evaluated = true;
    }

    /// Mutate the genome, invalidating the fitness
    pub fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.genome.mutate(rng);
        self.invalidate();
    }

    /// Cross over with another individual, invalidating both fitnesses
    pub fn crossover<R: Rng + ?Sized>(&mut self, other: &mut Self, rng: &mut R) {
        self.genome.crossover(&mut other.genome, rng);
        self.invalidate();
        other.invalidate();
    }

    fn invalidate(&mut self) {
        self.fitness = f64::INFINITY;
        self.evaluated = false;
    }

    /// Take the genome out of this individual
    pub fn into_genome(self) -> G {
        self.genome
    }

    /// Get a reference to the genome
    pub fn genome(&self) -> &G {
        &self.genome
    }

    /// Check if this individual is strictly better than another
    pub fn is_better_than(&self, other: &Self) -> bool {
        match (self.evaluated, other.evaluated) {
            (true, true) => self.fitness < other.fitness,
            (true, false) => true,
            _ => false,
        }
    }

    /// Total order on fitness, ascending (best first)
    pub fn cmp_fitness(&self, other: &Self) -> Ordering {
        self.fitness.total_cmp(&other.fitness)
    }
}
