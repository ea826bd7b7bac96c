//! Multi-population orchestrator
//!
//! [`GA`] drives the generational loop over a fixed set of populations:
//! evaluate, fold into the hall of fame, log, speciate and evolve, migrate,
//! then hand control to the callback and the early-stop predicate.
//!
//! The orchestrator owns the master random source. Every per-population
//! task runs on its own stream derived from the master, so a seeded run is
//! reproducible whether or not the parallel flags are set.

pub mod config;

use std::io::Write;

use rand::rngs::StdRng;
use tracing::{debug, info};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub use config::{GaBuilder, GaConfig};

use crate::error::{EvoResult, EvolutionError};
use crate::genome::traits::Genome;
use crate::hall_of_fame::HallOfFame;
use crate::migration::Migrator;
use crate::models::{Model, RunState};
use crate::population::individual::Individual;
use crate::population::population::{Population, Populations};
use crate::random::derive_streams;
use crate::speciation::Speciator;

/// Callback invoked after every generation with full access to the run
///
/// The orchestrator does not guard its invariants against changes made
/// here.
pub type Callback<G> = Box<dyn FnMut(&mut GA<G>) + Send>;

/// Predicate checked after every generation; `true` ends the run
pub type EarlyStop<G> = Box<dyn FnMut(&GA<G>) -> bool + Send>;

/// Multi-population genetic algorithm
#[allow(clippy::upper_case_acronyms)]
pub struct GA<G: Genome> {
    config: GaConfig,
    model: Box<dyn Model<G>>,
    migrator: Option<Box<dyn Migrator<G>>>,
    speciator: Option<Box<dyn Speciator<G>>>,
    callback: Option<Callback<G>>,
    early_stop: Option<EarlyStop<G>>,
    rng: StdRng,
    log_sink: Option<Box<dyn Write + Send>>,
    run_state: RunState,
    populations: Populations<G>,
    hall_of_fame: HallOfFame<G>,
    generations: usize,
}

impl<G: Genome> GA<G> {
    /// Create a builder with the default options and a generational model
    pub fn builder() -> GaBuilder<G> {
        GaBuilder::with_defaults()
    }

    /// Initialize fresh populations with `factory` and run the configured
    /// number of generations
    ///
    /// Clears the hall of fame and the generation count first.
    pub fn minimize<F>(&mut self, factory: F) -> EvoResult<()>
    where
        F: Fn(&mut StdRng) -> G + Sync,
    {
        let pop_size = self.config.pop_size;
        let streams = derive_streams(&mut self.rng, self.config.n_pops);
        let populations = fork_join(self.config.parallel_init, streams, |mut rng| {
            Population::random(pop_size, false, &factory, &mut rng)
        });

        self.populations = Populations::new(populations);
        self.hall_of_fame.clear();
        self.generations = 0;
        self.run_state.set_generation(0);
        self.run()
    }

    /// Run the configured number of generations on the current populations
    ///
    /// Used after a restore or a previous run; the hall of fame and the
    /// generation count carry over.
    pub fn resume(&mut self) -> EvoResult<()> {
        if self.populations.is_empty() {
            return Err(EvolutionError::Configuration(
                "there are no populations to resume, run minimize or restore first".to_string(),
            ));
        }
        self.run()
    }

    fn run(&mut self) -> EvoResult<()> {
        info!(
            n_pops = self.config.n_pops,
            pop_size = self.config.pop_size,
            n_generations = self.config.n_generations,
            start = self.generations,
            "starting evolution"
        );
        for _ in 0..self.config.n_generations {
            if self.step()? {
                info!(generation = self.generations, "early stop requested");
                break;
            }
        }
        info!(
            generations = self.generations,
            best = ?self.best().map(|i| i.fitness),
            "evolution finished"
        );
        Ok(())
    }

    /// Run a single generation
    ///
    /// Returns `true` when the early-stop predicate asked to end the run.
    pub fn step(&mut self) -> EvoResult<bool> {
        if self.populations.is_empty() {
            return Err(EvolutionError::Configuration(
                "there are no populations to evolve".to_string(),
            ));
        }
        let g = self.generations;

        self.evaluate()?;

        for pop in self.populations.iter() {
            self.hall_of_fame.extend(pop.iter());
        }

        self.log_statistics(g)?;

        self.evolve()?;

        let frequency = self.config.mig_frequency;
        let migration_due = frequency > 0 && g > 0 && g % frequency == 0;
        if migration_due && self.migrator.is_some() {
            // Migrants carry a fitness, offspring may not have one yet
            self.evaluate()?;
            if let Some(migrator) = &self.migrator {
                migrator.apply(&mut self.populations, &mut self.rng)?;
            }
            debug!(generation = g, "migrated");
        }

        for pop in self.populations.iter_mut() {
            pop.increment_generation();
        }
        self.generations += 1;
        self.run_state.set_generation(self.generations);

        if let Some(mut callback) = self.callback.take() {
            callback(self);
            self.callback = Some(callback);
        }

        if let Some(mut early_stop) = self.early_stop.take() {
            let halt = early_stop(&*self);
            self.early_stop = Some(early_stop);
            return Ok(halt);
        }
        Ok(false)
    }

    /// Evaluate every population, one task per population
    ///
    /// All tasks are joined before returning; the first error in population
    /// order is reported.
    fn evaluate(&mut self) -> EvoResult<()> {
        let parallel = self.config.parallel_eval;
        let pops: Vec<&mut Population<G>> = self.populations.iter_mut().collect();
        fork_join(parallel, pops, |pop| pop.evaluate(parallel))
            .into_iter()
            .collect()
    }

    fn evolve(&mut self) -> EvoResult<()> {
        let streams = derive_streams(&mut self.rng, self.populations.len());
        let model = &*self.model;
        let speciator = self.speciator.as_deref();

        let tasks: Vec<_> = self.populations.iter_mut().zip(streams).collect();
        fork_join(self.config.parallel_eval, tasks, |(pop, mut rng)| {
            evolve_population(pop, model, speciator, &mut rng)
        })
        .into_iter()
        .collect()
    }

    fn log_statistics(&mut self, generation: usize) -> EvoResult<()> {
        for pop in self.populations.iter() {
            if let Some(stats) = pop.stats() {
                debug!(
                    pop_id = pop.id(),
                    generation,
                    min = stats.min,
                    max = stats.max,
                    avg = stats.mean,
                    std = stats.std,
                    "population statistics"
                );
            }
            if let Some(sink) = self.log_sink.as_mut() {
                pop.log(sink)?;
            }
        }
        Ok(())
    }

    /// Replace the populations, hall of fame entries and generation count
    pub(crate) fn install(
        &mut self,
        populations: Vec<Population<G>>,
        hall_of_fame: Vec<Individual<G>>,
        generations: usize,
    ) {
        self.populations = Populations::new(populations);
        self.hall_of_fame.reset_with(hall_of_fame);
        self.generations = generations;
        self.run_state.set_generation(generations);
    }

    /// Current populations
    pub fn populations(&self) -> &Populations<G> {
        &self.populations
    }

    /// Mutable access to the populations; their number cannot change
    pub fn populations_mut(&mut self) -> &mut Populations<G> {
        &mut self.populations
    }

    /// The hall of fame
    pub fn hall_of_fame(&self) -> &HallOfFame<G> {
        &self.hall_of_fame
    }

    /// Best individual seen so far
    pub fn best(&self) -> Option<&Individual<G>> {
        self.hall_of_fame.best()
    }

    /// Number of completed generations
    pub fn generations(&self) -> usize {
        self.generations
    }

    /// Scalar options of the run
    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// Shared run state handle
    pub fn run_state(&self) -> &RunState {
        &self.run_state
    }
}

/// Evolve one population, per species when a speciator is set
///
/// Species are evolved on a copy so the population is left intact if the
/// speciator or the model fails.
fn evolve_population<G: Genome>(
    pop: &mut Population<G>,
    model: &dyn Model<G>,
    speciator: Option<&dyn Speciator<G>>,
    rng: &mut StdRng,
) -> EvoResult<()> {
    let Some(speciator) = speciator else {
        return model.evolve(pop, rng);
    };

    let size = pop.len();
    let species = speciator.apply(pop.individuals().to_vec(), rng)?;
    let total: usize = species.iter().map(Vec::len).sum();
    if total != size {
        return Err(EvolutionError::Speciation(format!(
            "species of population {} hold {total} individuals, expected {size}",
            pop.id()
        )));
    }

    let mut merged = Vec::with_capacity(size);
    for members in species {
        if members.is_empty() {
            continue;
        }
        let mut niche = Population::from_parts(pop.id().to_string(), pop.generation(), members);
        model.evolve(&mut niche, rng)?;
        merged.extend(niche.into_individuals());
    }
    pop.replace_individuals(merged)
}

#[cfg(feature = "parallel")]
fn fork_join<T, U, F>(parallel: bool, tasks: Vec<T>, f: F) -> Vec<U>
where
    T: Send,
    U: Send,
    F: Fn(T) -> U + Sync + Send,
{
    if parallel {
        tasks.into_par_iter().map(f).collect()
    } else {
        tasks.into_iter().map(f).collect()
    }
}

/// Sequential fallback (when the `parallel` feature is disabled)
#[cfg(not(feature = "parallel"))]
fn fork_join<T, U, F>(_parallel: bool, tasks: Vec<T>, f: F) -> Vec<U>
where
    T: Send,
    U: Send,
    F: Fn(T) -> U + Sync + Send,
{
    tasks.into_iter().map(f).collect()
}
