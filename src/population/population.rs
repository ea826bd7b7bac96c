//! Population type
//!
//! This module provides the fixed-size Population container and the
//! fixed-cardinality Populations collection.

use std::io::Write;
use std::ops::{Deref, DerefMut};

use rand::rngs::StdRng;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{EvoResult, EvolutionError};
use crate::genome::traits::Genome;
use crate::population::individual::Individual;
use crate::random::{derive_streams, random_id};

/// Length of population identifiers
pub const POPULATION_ID_LEN: usize = 3;

/// Fitness statistics of a population
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PopulationStats {
    /// Lowest (best) fitness
    pub min: f64,
    /// Highest (worst) fitness
    pub max: f64,
    /// Mean fitness
    pub mean: f64,
    /// Population standard deviation of fitness
    pub std: f64,
}

/// A population of individuals
///
/// The number of individuals is fixed at creation: mutable access is only
/// handed out as a slice, and wholesale replacement checks the length.
#[derive(Clone, Debug)]
pub struct Population<G: Genome> {
    /// Stable identifier
    id: String,
    /// Number of completed evolution steps
    generation: usize,
    /// The individuals in this population
    individuals: Vec<Individual<G>>,
}

impl<G: Genome> Population<G> {
    /// Create a random population
    ///
    /// Genomes are built with `factory`. In parallel mode every individual
    /// gets its own stream derived from `rng`. The ID is drawn from `rng`
    /// after the individuals, so it depends on both the seed and `size`.
    pub fn random<F>(size: usize, parallel: bool, factory: &F, rng: &mut StdRng) -> Self
    where
        F: Fn(&mut StdRng) -> G + Sync,
    {
        let individuals = if parallel {
            let streams = derive_streams(rng, size);
            build_parallel(streams, factory)
        } else {
            (0..size).map(|_| Individual::new(factory(rng))).collect()
        };
        Self {
            id: random_id(POPULATION_ID_LEN, rng),
            generation: 0,
            individuals,
        }
    }

    /// Assemble a population from its parts
    pub fn from_parts(id: String, generation: usize, individuals: Vec<Individual<G>>) -> Self {
        Self {
            id,
            generation,
            individuals,
        }
    }

    /// Get the identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the current generation
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Increment the generation counter
    pub fn increment_generation(&mut self) {
        self.generation += 1;
    }

    /// Get the population size
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    /// Check if the population is empty
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Get the individuals
    pub fn individuals(&self) -> &[Individual<G>] {
        &self.individuals
    }

    /// Get mutable access to the individuals
    pub fn individuals_mut(&mut self) -> &mut [Individual<G>] {
        &mut self.individuals
    }

    /// Get an iterator over the individuals
    pub fn iter(&self) -> impl Iterator<Item = &Individual<G>> {
        self.individuals.iter()
    }

    /// Replace all individuals at once
    pub fn replace_individuals(&mut self, individuals: Vec<Individual<G>>) -> EvoResult<()> {
        if individuals.len() != self.individuals.len() {
            return Err(EvolutionError::PopulationSize {
                expected: self.individuals.len(),
                actual: individuals.len(),
            });
        }
        self.individuals = individuals;
        Ok(())
    }

    /// Take the individuals out of this population
    pub fn into_individuals(self) -> Vec<Individual<G>> {
        self.individuals
    }

    /// Get the best evaluated individual (lowest fitness)
    pub fn best(&self) -> Option<&Individual<G>> {
        self.individuals
            .iter()
            .filter(|i| i.is_evaluated())
            .min_by(|a, b| a.cmp_fitness(b))
    }

    /// Sort the population by fitness (best first)
    pub fn sort_by_fitness(&mut self) {
        self.individuals.sort_by(|a, b| a.cmp_fitness(b));
    }

    /// Check if all individuals have been evaluated
    pub fn all_evaluated(&self) -> bool {
        self.individuals.iter().all(|i| i.is_evaluated())
    }

    /// Evaluate every individual that is not yet evaluated
    ///
    /// Stops at the first error. Sequentially that is the first failing
    /// individual in order; in parallel it is the first failure observed.
    pub fn evaluate(&mut self, parallel: bool) -> EvoResult<()> {
        if parallel {
            evaluate_parallel(&mut self.individuals)
        } else {
            self.individuals.iter_mut().try_for_each(|i| i.evaluate())
        }
    }

    /// Fitness statistics over the evaluated individuals
    ///
    /// Returns `None` when no individual has been evaluated.
    pub fn stats(&self) -> Option<PopulationStats> {
        let fitnesses: Vec<f64> = self
            .individuals
            .iter()
            .filter(|i| i.is_evaluated())
            .map(|i| i.fitness)
            .collect();
        if fitnesses.is_empty() {
            return None;
        }

        let n = fitnesses.len() as f64;
        let min = fitnesses.iter().copied().fold(f64::INFINITY, f64::min);
        let max = fitnesses.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = fitnesses.iter().sum::<f64>() / n;
        let variance = fitnesses.iter().map(|f| (f - mean).powi(2)).sum::<f64>() / n;

        Some(PopulationStats {
            min,
            max,
            mean,
            std: variance.sqrt(),
        })
    }

    /// Write one statistics line to `sink`
    ///
    /// Format: `pop_id=<id> min=<v> max=<v> avg=<v> std=<v>` with six
    /// fractional digits per value. Without evaluated individuals every
    /// value is printed as `NaN`.
    pub fn log<W: Write + ?Sized>(&self, sink: &mut W) -> std::io::Result<()> {
        let stats = self.stats().unwrap_or(PopulationStats {
            min: f64::NAN,
            max: f64::NAN,
            mean: f64::NAN,
            std: f64::NAN,
        });
        writeln!(
            sink,
            "pop_id={} min={:.6} max={:.6} avg={:.6} std={:.6}",
            self.id, stats.min, stats.max, stats.mean, stats.std
        )
    }
}

#[cfg(feature = "parallel")]
fn build_parallel<G, F>(streams: Vec<StdRng>, factory: &F) -> Vec<Individual<G>>
where
    G: Genome,
    F: Fn(&mut StdRng) -> G + Sync,
{
    streams
        .into_par_iter()
        .map(|mut rng| Individual::new(factory(&mut rng)))
        .collect()
}

/// Sequential fallback (when the `parallel` feature is disabled)
#[cfg(not(feature = "parallel"))]
fn build_parallel<G, F>(streams: Vec<StdRng>, factory: &F) -> Vec<Individual<G>>
where
    G: Genome,
    F: Fn(&mut StdRng) -> G + Sync,
{
    streams
        .into_iter()
        .map(|mut rng| Individual::new(factory(&mut rng)))
        .collect()
}

#[cfg(feature = "parallel")]
fn evaluate_parallel<G: Genome>(individuals: &mut [Individual<G>]) -> EvoResult<()> {
    individuals
        .par_iter_mut()
        .filter(|i| !i.is_evaluated())
        .try_for_each(|i| i.evaluate())
}

/// Sequential fallback (when the `parallel` feature is disabled)
#[cfg(not(feature = "parallel"))]
fn evaluate_parallel<G: Genome>(individuals: &mut [Individual<G>]) -> EvoResult<()> {
    individuals.iter_mut().try_for_each(|i| i.evaluate())
}

impl<G: Genome> std::ops::Index<usize> for Population<G> {
    type Output = Individual<G>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.individuals[index]
    }
}

impl<G: Genome> std::ops::IndexMut<usize> for Population<G> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.individuals[index]
    }
}

/// A fixed set of populations
///
/// Dereferences to a slice, so populations can be mutated in place but
/// never added or removed.
#[derive(Clone, Debug)]
pub struct Populations<G: Genome>(Vec<Population<G>>);

impl<G: Genome> Populations<G> {
    /// Wrap a vector of populations
    pub fn new(populations: Vec<Population<G>>) -> Self {
        Self(populations)
    }

    /// Total number of individuals across all populations
    pub fn total_individuals(&self) -> usize {
        self.0.iter().map(Population::len).sum()
    }

    /// Take the populations out
    pub fn into_inner(self) -> Vec<Population<G>> {
        self.0
    }
}

impl<G: Genome> Default for Populations<G> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<G: Genome> Deref for Populations<G> {
    type Target = [Population<G>];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<G: Genome> DerefMut for Populations<G> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
