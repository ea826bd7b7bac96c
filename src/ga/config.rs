//! Orchestrator configuration and builder

use std::io::Write;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::{EvoResult, EvolutionError};
use crate::ga::{Callback, EarlyStop, GA};
use crate::genome::traits::Genome;
use crate::hall_of_fame::HallOfFame;
use crate::migration::Migrator;
use crate::models::generational::Generational;
use crate::models::{Model, RunState};
use crate::population::population::Populations;
use crate::speciation::Speciator;

/// Scalar options of a run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaConfig {
    /// Number of populations
    pub n_pops: usize,
    /// Number of individuals per population
    pub pop_size: usize,
    /// Number of generations per run
    pub n_generations: usize,
    /// Capacity of the hall of fame
    pub hof_size: usize,
    /// Initialize populations in parallel
    pub parallel_init: bool,
    /// Evaluate and evolve populations in parallel
    pub parallel_eval: bool,
    /// Generations between migrations, required when a migrator is set
    pub mig_frequency: usize,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            n_pops: 1,
            pop_size: 30,
            n_generations: 50,
            hof_size: 1,
            parallel_init: false,
            parallel_eval: false,
            mig_frequency: 0,
        }
    }
}

impl GaConfig {
    /// Check the scalar options
    pub fn validate(&self) -> EvoResult<()> {
        let required = [
            ("n_pops", self.n_pops),
            ("pop_size", self.pop_size),
            ("n_generations", self.n_generations),
            ("hof_size", self.hof_size),
        ];
        for (name, value) in required {
            if value == 0 {
                return Err(EvolutionError::Configuration(format!(
                    "{name} has to be strictly higher than 0"
                )));
            }
        }
        Ok(())
    }
}

/// Builder for [`GA`]
///
/// Collects the configuration and the pluggable collaborators, then
/// validates everything at once in [`GaBuilder::build`]. Nothing is
/// constructed when validation fails.
pub struct GaBuilder<G: Genome> {
    config: GaConfig,
    model: Option<Box<dyn Model<G>>>,
    migrator: Option<Box<dyn Migrator<G>>>,
    speciator: Option<Box<dyn Speciator<G>>>,
    callback: Option<Callback<G>>,
    early_stop: Option<EarlyStop<G>>,
    rng: Option<StdRng>,
    log_sink: Option<Box<dyn Write + Send>>,
    run_state: RunState,
}

impl<G: Genome> GaBuilder<G> {
    /// Create a builder with the default scalar options and no model
    pub fn new() -> Self {
        Self::from_config(GaConfig::default())
    }

    /// Create a builder from existing scalar options
    pub fn from_config(config: GaConfig) -> Self {
        Self {
            config,
            model: None,
            migrator: None,
            speciator: None,
            callback: None,
            early_stop: None,
            rng: None,
            log_sink: None,
            run_state: RunState::new(),
        }
    }

    /// Create a builder with the default options and a generational model
    /// (tournament of 3, mutation rate 0.5, crossover rate 0.7)
    pub fn with_defaults() -> Self {
        Self::new().model(Generational::default())
    }

    /// Set the number of populations
    pub fn n_pops(mut self, n: usize) -> Self {
        self.config.n_pops = n;
        self
    }

    /// Set the population size
    pub fn pop_size(mut self, size: usize) -> Self {
        self.config.pop_size = size;
        self
    }

    /// Set the number of generations
    pub fn n_generations(mut self, n: usize) -> Self {
        self.config.n_generations = n;
        self
    }

    /// Set the hall of fame capacity
    pub fn hof_size(mut self, size: usize) -> Self {
        self.config.hof_size = size;
        self
    }

    /// Enable or disable parallel initialization
    pub fn parallel_init(mut self, enabled: bool) -> Self {
        self.config.parallel_init = enabled;
        self
    }

    /// Enable or disable parallel evaluation and evolution
    pub fn parallel_eval(mut self, enabled: bool) -> Self {
        self.config.parallel_eval = enabled;
        self
    }

    /// Set the evolution model
    pub fn model<M: Model<G> + 'static>(mut self, model: M) -> Self {
        self.model = Some(Box::new(model));
        self
    }

    /// Set the migrator and its frequency in generations
    pub fn migrator<M: Migrator<G> + 'static>(mut self, migrator: M, frequency: usize) -> Self {
        self.migrator = Some(Box::new(migrator));
        self.config.mig_frequency = frequency;
        self
    }

    /// Set the speciator
    pub fn speciator<S: Speciator<G> + 'static>(mut self, speciator: S) -> Self {
        self.speciator = Some(Box::new(speciator));
        self
    }

    /// Set a callback invoked after every generation
    pub fn callback<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&mut GA<G>) + Send + 'static,
    {
        self.callback = Some(Box::new(callback));
        self
    }

    /// Set a predicate checked after every generation; the run stops when
    /// it returns true
    pub fn early_stop<F>(mut self, early_stop: F) -> Self
    where
        F: FnMut(&GA<G>) -> bool + Send + 'static,
    {
        self.early_stop = Some(Box::new(early_stop));
        self
    }

    /// Set the master random source
    pub fn rng(mut self, rng: StdRng) -> Self {
        self.rng = Some(rng);
        self
    }

    /// Seed the master random source
    pub fn seed(self, seed: u64) -> Self {
        self.rng(StdRng::seed_from_u64(seed))
    }

    /// Write per-population statistics lines to `sink`
    pub fn log_sink<W: Write + Send + 'static>(mut self, sink: W) -> Self {
        self.log_sink = Some(Box::new(sink));
        self
    }

    /// Use `state` as the run state handle
    ///
    /// The model is bound to this handle at build time, so the caller can
    /// watch the run through it.
    pub fn run_state(mut self, state: RunState) -> Self {
        self.run_state = state;
        self
    }

    /// Validate everything and build the orchestrator
    pub fn build(self) -> EvoResult<GA<G>> {
        let config = self.config;
        config.validate()?;

        let mut model = self.model.ok_or_else(|| {
            EvolutionError::Configuration("a model has to be specified".to_string())
        })?;
        model.validate()?;

        if let Some(migrator) = &self.migrator {
            if config.mig_frequency == 0 {
                return Err(EvolutionError::Configuration(
                    "mig_frequency has to be strictly higher than 0 when a migrator is set"
                        .to_string(),
                ));
            }
            migrator.validate(config.n_pops, config.pop_size)?;
        }
        if let Some(speciator) = &self.speciator {
            speciator.validate(config.pop_size)?;
        }

        model.bind_run_state(&self.run_state);
        self.run_state.set_generation(0);
        self.run_state.set_n_generations(config.n_generations);

        Ok(GA {
            hall_of_fame: HallOfFame::new(config.hof_size),
            populations: Populations::default(),
            generations: 0,
            model,
            migrator: self.migrator,
            speciator: self.speciator,
            callback: self.callback,
            early_stop: self.early_stop,
            rng: self.rng.unwrap_or_else(StdRng::from_entropy),
            log_sink: self.log_sink,
            run_state: self.run_state,
            config,
        })
    }
}

impl<G: Genome> Default for GaBuilder<G> {
    fn default() -> Self {
        Self::new()
    }
}
