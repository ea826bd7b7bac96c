//! Ring swap migration

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::error::{EvoResult, EvolutionError};
use crate::genome::traits::Genome;
use crate::migration::Migrator;
use crate::population::population::Population;

/// Swap individuals between neighbouring populations
///
/// For every neighbour pair `(i, i + 1)`, `n_migrants` times, a random
/// position is drawn and the individuals at that position are exchanged.
/// All populations must share the same size.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RingSwapMigrator {
    /// Number of swaps per neighbour pair
    pub n_migrants: usize,
}

impl RingSwapMigrator {
    /// Create a new ring swap migrator
    pub fn new(n_migrants: usize) -> Self {
        Self { n_migrants }
    }
}

impl<G: Genome> Migrator<G> for RingSwapMigrator {
    fn validate(&self, n_pops: usize, pop_size: usize) -> EvoResult<()> {
        if n_pops < 2 {
            return Err(EvolutionError::Configuration(format!(
                "ring swap requires at least 2 populations, got {n_pops}"
            )));
        }
        if self.n_migrants == 0 || self.n_migrants > pop_size {
            return Err(EvolutionError::Configuration(format!(
                "n_migrants should be in [1, {pop_size}], got {}",
                self.n_migrants
            )));
        }
        Ok(())
    }

    fn apply(&self, pops: &mut [Population<G>], rng: &mut dyn RngCore) -> EvoResult<()> {
        // Check every pair before swapping anything
        if let Some(pair) = pops.windows(2).find(|pair| pair[0].len() != pair[1].len()) {
            return Err(EvolutionError::Migration(format!(
                "populations {} and {} differ in size",
                pair[0].id(),
                pair[1].id()
            )));
        }

        for pair in 1..pops.len() {
            let (left, right) = pops.split_at_mut(pair);
            let (a, b) = (&mut left[pair - 1], &mut right[0]);
            if a.is_empty() {
                continue;
            }
            for _ in 0..self.n_migrants {
                let k = rng.gen_range(0..a.len());
                std::mem::swap(&mut a[k], &mut b[k]);
            }
        }
        Ok(())
    }
}
