//! Selection operators
//!
//! This module provides parent selection operators. All of them treat
//! lower fitness as better.

use rand::seq::index;
use rand::Rng;
use rand_distr::{Distribution, WeightedIndex};

use crate::error::{EvoResult, EvolutionError};
use crate::genome::traits::Genome;
use crate::operators::traits::Selector;
use crate::population::individual::Individual;

fn ensure_non_empty<G: Genome>(individuals: &[Individual<G>]) -> EvoResult<()> {
    if individuals.is_empty() {
        return Err(EvolutionError::Selection(
            "cannot select from an empty population".to_string(),
        ));
    }
    Ok(())
}

/// Tournament selection operator
///
/// Selects the best individual from a random subset of distinct contestants.
#[derive(Clone, Debug)]
pub struct TournamentSelection {
    /// Tournament size (number of individuals competing)
    pub contestants: usize,
}

impl TournamentSelection {
    /// Create a new tournament selection with the given size
    pub fn new(contestants: usize) -> Self {
        Self { contestants }
    }

    /// Create binary tournament selection (size = 2)
    pub fn binary() -> Self {
        Self::new(2)
    }
}

impl Selector for TournamentSelection {
    fn validate(&self) -> EvoResult<()> {
        if self.contestants == 0 {
            return Err(EvolutionError::Configuration(
                "tournament needs at least 1 contestant".to_string(),
            ));
        }
        Ok(())
    }

    fn select<G: Genome, R: Rng + ?Sized>(
        &self,
        individuals: &[Individual<G>],
        rng: &mut R,
    ) -> EvoResult<usize> {
        ensure_non_empty(individuals)?;

        let size = self.contestants.clamp(1, individuals.len());
        index::sample(rng, individuals.len(), size)
            .into_iter()
            .min_by(|&a, &b| individuals[a].cmp_fitness(&individuals[b]))
            .ok_or_else(|| EvolutionError::Selection("empty tournament".to_string()))
    }
}

/// Elite selection
///
/// Deterministically picks the best individuals.
#[derive(Clone, Debug, Default)]
pub struct EliteSelection;

impl EliteSelection {
    /// Create a new elite selection
    pub fn new() -> Self {
        Self
    }
}

impl Selector for EliteSelection {
    fn validate(&self) -> EvoResult<()> {
        Ok(())
    }

    fn select<G: Genome, R: Rng + ?Sized>(
        &self,
        individuals: &[Individual<G>],
        _rng: &mut R,
    ) -> EvoResult<usize> {
        ensure_non_empty(individuals)?;
        Ok((0..individuals.len())
            .min_by(|&a, &b| individuals[a].cmp_fitness(&individuals[b]))
            .unwrap_or(0))
    }

    /// Returns the `n` best, wrapping around when `n` exceeds the size
    fn select_many<G: Genome, R: Rng + ?Sized>(
        &self,
        n: usize,
        individuals: &[Individual<G>],
        _rng: &mut R,
    ) -> EvoResult<Vec<usize>> {
        ensure_non_empty(individuals)?;
        let mut ranked: Vec<usize> = (0..individuals.len()).collect();
        ranked.sort_by(|&a, &b| individuals[a].cmp_fitness(&individuals[b]));
        Ok(ranked.iter().copied().cycle().take(n).collect())
    }
}

/// Roulette wheel selection (fitness proportionate)
///
/// Weights are `worst - fitness + 1` so the best individual gets the
/// largest slice. Individuals with non-finite fitness get no slice.
#[derive(Clone, Debug, Default)]
pub struct RouletteSelection;

impl RouletteSelection {
    /// Create a new roulette selection
    pub fn new() -> Self {
        Self
    }
}

impl Selector for RouletteSelection {
    fn validate(&self) -> EvoResult<()> {
        Ok(())
    }

    fn select<G: Genome, R: Rng + ?Sized>(
        &self,
        individuals: &[Individual<G>],
        rng: &mut R,
    ) -> EvoResult<usize> {
        ensure_non_empty(individuals)?;

        let worst = individuals
            .iter()
            .map(|i| i.fitness)
            .filter(|f| f.is_finite())
            .fold(f64::NEG_INFINITY, f64::max);

        let weights: Vec<f64> = individuals
            .iter()
            .map(|i| {
                if i.fitness.is_finite() {
                    worst - i.fitness + 1.0
                } else {
                    0.0
                }
            })
            .collect();

        // Handle case where no weight is usable
        match WeightedIndex::new(&weights) {
            Ok(dist) => Ok(dist.sample(rng)),
            Err(_) => Ok(rng.gen_range(0..individuals.len())),
        }
    }
}
