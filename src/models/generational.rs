//! Generational model
//!
//! Every generation the whole population is replaced by offspring.

use rand::{Rng, RngCore};

use crate::error::EvoResult;
use crate::genome::traits::Genome;
use crate::models::{check_rate, mutate_with_rate, Model};
use crate::operators::selection::TournamentSelection;
use crate::operators::traits::Selector;
use crate::population::individual::Individual;
use crate::population::population::Population;

/// Generational replacement
///
/// Parents are picked in pairs by the selector, recombined with
/// probability `cross_rate`, and each offspring is mutated with probability
/// `mut_rate`. The offspring replace the population wholesale; nothing is
/// kept unconditionally.
#[derive(Clone, Debug)]
pub struct Generational<S> {
    /// Parent selector
    pub selector: S,
    /// Probability of mutating an offspring
    pub mut_rate: f64,
    /// Probability of recombining a pair of parents
    pub cross_rate: f64,
}

impl<S: Selector> Generational<S> {
    /// Create a new generational model
    pub fn new(selector: S, mut_rate: f64, cross_rate: f64) -> Self {
        Self {
            selector,
            mut_rate,
            cross_rate,
        }
    }
}

impl Default for Generational<TournamentSelection> {
    fn default() -> Self {
        Self::new(TournamentSelection::new(3), 0.5, 0.7)
    }
}

/// Breed `n` offspring from `parents`
pub(crate) fn generate_offspring<G, S>(
    n: usize,
    parents: &[Individual<G>],
    selector: &S,
    cross_rate: f64,
    rng: &mut dyn RngCore,
) -> EvoResult<Vec<Individual<G>>>
where
    G: Genome,
    S: Selector,
{
    let mut offspring = Vec::with_capacity(n);
    while offspring.len() < n {
        let picked = selector.select_many(2, parents, rng)?;
        let mut first = parents[picked[0]].clone();
        let mut second = parents[picked[1]].clone();
        if rng.gen::<f64>() < cross_rate {
            first.crossover(&mut second, rng);
        }
        offspring.push(first);
        if offspring.len() < n {
            offspring.push(second);
        }
    }
    Ok(offspring)
}

impl<G: Genome, S: Selector> Model<G> for Generational<S> {
    fn validate(&self) -> EvoResult<()> {
        self.selector.validate()?;
        check_rate("mut_rate", self.mut_rate)?;
        check_rate("cross_rate", self.cross_rate)
    }

    fn evolve(&self, pop: &mut Population<G>, rng: &mut dyn RngCore) -> EvoResult<()> {
        let mut offspring = generate_offspring(
            pop.len(),
            pop.individuals(),
            &self.selector,
            self.cross_rate,
            rng,
        )?;
        if self.mut_rate > 0.0 {
            mutate_with_rate(&mut offspring, self.mut_rate, rng);
        }
        pop.replace_individuals(offspring)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::real_vector::RealVector;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn evaluated_population(size: usize, seed: u64) -> Population<RealVector> {
        let mut rng = StdRng::seed_from_u64(seed);
        let factory = |rng: &mut StdRng| RealVector::random(3, -5.0, 5.0, rng);
        let mut pop = Population::random(size, false, &factory, &mut rng);
        pop.evaluate(false).unwrap();
        pop
    }

    #[test]
    fn test_generational_validate() {
        let ok = Generational::default();
        assert!(Model::<RealVector>::validate(&ok).is_ok());

        let bad_mut = Generational::new(TournamentSelection::new(2), 1.5, 0.5);
        assert!(Model::<RealVector>::validate(&bad_mut).is_err());

        let bad_cross = Generational::new(TournamentSelection::new(2), 0.5, -0.1);
        assert!(Model::<RealVector>::validate(&bad_cross).is_err());

        let bad_selector = Generational::new(TournamentSelection::new(0), 0.5, 0.5);
        assert!(Model::<RealVector>::validate(&bad_selector).is_err());
    }

    #[test]
    fn test_generational_preserves_size() {
        let mut rng = StdRng::seed_from_u64(9);
        for size in [1, 2, 7, 30] {
            let mut pop = evaluated_population(size, size as u64);
            Generational::default().evolve(&mut pop, &mut rng).unwrap();
            assert_eq!(pop.len(), size);
        }
    }

    #[test]
    fn test_generational_without_variation_copies_parents() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut pop = evaluated_population(10, 1);
        let parents: Vec<RealVector> = pop.iter().map(|i| i.genome.clone()).collect();

        Generational::new(TournamentSelection::new(2), 0.0, 0.0)
            .evolve(&mut pop, &mut rng)
            .unwrap();

        assert!(pop.all_evaluated());
        assert!(pop.iter().all(|i| parents.contains(&i.genome)));
    }

    #[test]
    fn test_generational_mutation_invalidates() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut pop = evaluated_population(10, 2);
        Generational::new(TournamentSelection::new(2), 1.0, 0.0)
            .evolve(&mut pop, &mut rng)
            .unwrap();
        assert!(pop.iter().all(|i| !i.is_evaluated()));
    }
}
