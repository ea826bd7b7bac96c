//! Evolution models
//!
//! A model evolves one population by one generation. It owns selection,
//! crossover, mutation and replacement internally.

pub mod generational;
pub mod simulated_annealing;
pub mod steady_state;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rand::{Rng, RngCore};

use crate::error::{EvoResult, EvolutionError};
use crate::genome::traits::Genome;
use crate::population::individual::Individual;
use crate::population::population::Population;

/// Pluggable evolution strategy
pub trait Model<G: Genome>: Send + Sync {
    /// Check the model configuration, called once at construction
    fn validate(&self) -> EvoResult<()>;

    /// Evolve `pop` by one generation in place
    ///
    /// Must leave the population size unchanged.
    fn evolve(&self, pop: &mut Population<G>, rng: &mut dyn RngCore) -> EvoResult<()>;

    /// Adopt the orchestrator's run state, called once at construction
    fn bind_run_state(&mut self, _state: &RunState) {}
}

/// Live run state shared between the orchestrator and the models that
/// depend on it.
///
/// Cloning yields another handle to the same state. The orchestrator hands
/// its handle to the model through [`Model::bind_run_state`] when it is
/// built.
#[derive(Clone, Debug, Default)]
pub struct RunState {
    inner: Arc<RunStateInner>,
}

#[derive(Debug, Default)]
struct RunStateInner {
    generation: AtomicUsize,
    n_generations: AtomicUsize,
}

impl RunState {
    /// Create a fresh run state at generation 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of generations completed by the orchestrator
    pub fn generation(&self) -> usize {
        self.inner.generation.load(Ordering::Acquire)
    }

    /// Configured number of generations for the run
    pub fn n_generations(&self) -> usize {
        self.inner.n_generations.load(Ordering::Acquire)
    }

    pub(crate) fn set_generation(&self, generation: usize) {
        self.inner.generation.store(generation, Ordering::Release);
    }

    pub(crate) fn set_n_generations(&self, n: usize) {
        self.inner.n_generations.store(n, Ordering::Release);
    }
}

pub(crate) fn check_rate(name: &str, rate: f64) -> EvoResult<()> {
    if !(0.0..=1.0).contains(&rate) {
        return Err(EvolutionError::Configuration(format!(
            "{name} should be between 0 and 1, got {rate}"
        )));
    }
    Ok(())
}

/// Mutate each individual with probability `rate`
pub(crate) fn mutate_with_rate<G: Genome>(
    individuals: &mut [Individual<G>],
    rate: f64,
    rng: &mut dyn RngCore,
) {
    for individual in individuals {
        if rng.gen::<f64>() < rate {
            individual.mutate(rng);
        }
    }
}

pub mod prelude {
    pub use super::generational::*;
    pub use super::simulated_annealing::*;
    pub use super::steady_state::*;
    pub use super::{Model, RunState};
}
