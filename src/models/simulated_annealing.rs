//! Simulated annealing model
//!
//! Each individual runs an independent annealing chain. The temperature
//! follows a geometric schedule keyed to the orchestrator's generation,
//! which the model reads through an injected [`RunState`] handle.

use rand::{Rng, RngCore};

use crate::error::{EvoResult, EvolutionError};
use crate::genome::traits::Genome;
use crate::models::{Model, RunState};
use crate::population::population::Population;

/// Simulated annealing
#[derive(Clone, Debug)]
pub struct SimulatedAnnealing {
    /// Starting temperature
    pub t0: f64,
    /// Temperature below which the model stops moving
    pub t_min: f64,
    /// Cooling factor applied once per generation
    pub alpha: f64,
    state: RunState,
}

impl SimulatedAnnealing {
    /// Create a new annealing model reading the given run state
    ///
    /// An orchestrator built with this model replaces the handle with its
    /// own, so `state` only matters when the model is driven directly.
    pub fn new(state: RunState, t0: f64, t_min: f64, alpha: f64) -> Self {
        Self {
            t0,
            t_min,
            alpha,
            state,
        }
    }

    /// Temperature at the current generation
    pub fn temperature(&self) -> f64 {
        let generation = i32::try_from(self.state.generation()).unwrap_or(i32::MAX);
        self.t0 * self.alpha.powi(generation)
    }
}

impl<G: Genome> Model<G> for SimulatedAnnealing {
    fn validate(&self) -> EvoResult<()> {
        if !(self.t0 > 0.0) {
            return Err(EvolutionError::Configuration(
                "t0 should be strictly higher than 0".to_string(),
            ));
        }
        if !(0.0..self.t0).contains(&self.t_min) {
            return Err(EvolutionError::Configuration(
                "t_min should be in [0, t0)".to_string(),
            ));
        }
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(EvolutionError::Configuration(
                "alpha should be in (0, 1)".to_string(),
            ));
        }
        Ok(())
    }

    fn bind_run_state(&mut self, state: &RunState) {
        self.state = state.clone();
    }

    fn evolve(&self, pop: &mut Population<G>, rng: &mut dyn RngCore) -> EvoResult<()> {
        let t = self.temperature();
        if t <= self.t_min {
            return Ok(());
        }

        for individual in pop.individuals_mut() {
            individual.evaluate()?;
            let mut neighbour = individual.clone();
            neighbour.mutate(rng);
            neighbour.evaluate()?;

            let accept = neighbour.fitness < individual.fitness
                || rng.gen::<f64>() < ((individual.fitness - neighbour.fitness) / t).exp();
            if accept {
                *individual = neighbour;
            }
        }
        Ok(())
    }
}
