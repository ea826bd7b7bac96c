//! Steady-state model
//!
//! Offspring replace their own parents in place, one pair at a time,
//! rather than the whole population at once.

use rand::{Rng, RngCore};

use crate::error::EvoResult;
use crate::genome::traits::Genome;
use crate::models::{check_rate, mutate_with_rate, Model};
use crate::operators::traits::Selector;
use crate::population::population::Population;

/// Steady-state replacement
///
/// For every pair of slots, two parents are selected and cloned, the
/// clones are recombined and mutated, and the results are written back
/// over the parents. With `keep_best` the offspring are evaluated first and
/// the two best of parents plus offspring survive, which makes the model
/// elitist.
#[derive(Clone, Debug)]
pub struct SteadyState<S> {
    /// Parent selector
    pub selector: S,
    /// Keep the two best of parents and offspring
    pub keep_best: bool,
    /// Probability of mutating an offspring
    pub mut_rate: f64,
    /// Probability of recombining a pair of parents
    pub cross_rate: f64,
}

impl<S: Selector> SteadyState<S> {
    /// Create a new steady-state model
    pub fn new(selector: S, keep_best: bool, mut_rate: f64, cross_rate: f64) -> Self {
        Self {
            selector,
            keep_best,
            mut_rate,
            cross_rate,
        }
    }
}

impl<G: Genome, S: Selector> Model<G> for SteadyState<S> {
    fn validate(&self) -> EvoResult<()> {
        self.selector.validate()?;
        check_rate("mut_rate", self.mut_rate)?;
        check_rate("cross_rate", self.cross_rate)
    }

    fn evolve(&self, pop: &mut Population<G>, rng: &mut dyn RngCore) -> EvoResult<()> {
        for _ in (0..pop.len()).step_by(2) {
            let picked = self.selector.select_many(2, pop.individuals(), rng)?;
            let parents = [pop[picked[0]].clone(), pop[picked[1]].clone()];

            let mut offspring = parents.clone();
            if rng.gen::<f64>() < self.cross_rate {
                let (first, rest) = offspring.split_at_mut(1);
                first[0].crossover(&mut rest[0], rng);
            }
            if self.mut_rate > 0.0 {
                mutate_with_rate(&mut offspring, self.mut_rate, rng);
            }

            if self.keep_best {
                for child in &mut offspring {
                    child.evaluate()?;
                }
                let mut pool: Vec<_> = parents.into_iter().chain(offspring).collect();
                pool.sort_by(|a, b| a.cmp_fitness(b));
                let mut survivors = pool.into_iter();
                for slot in distinct_slots(&picked) {
                    if let Some(survivor) = survivors.next() {
                        pop[slot] = survivor;
                    }
                }
            } else {
                for (slot, child) in distinct_slots(&picked).into_iter().zip(offspring) {
                    pop[slot] = child;
                }
            }
        }
        Ok(())
    }
}

/// The same parent may be picked twice; it then owns a single slot
fn distinct_slots(picked: &[usize]) -> Vec<usize> {
    let mut slots = picked.to_vec();
    slots.dedup();
    slots
}
