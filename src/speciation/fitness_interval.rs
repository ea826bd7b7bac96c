//! Fitness interval speciation

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::{EvoResult, EvolutionError};
use crate::genome::traits::Genome;
use crate::population::individual::Individual;
use crate::speciation::Speciator;

/// Split individuals into `k` contiguous fitness bands
///
/// Individuals are sorted by ascending fitness and cut into `k` intervals
/// whose sizes differ by at most one; the first intervals take the extra
/// individuals.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FitnessIntervalSpeciator {
    /// Number of species
    pub k: usize,
}

impl FitnessIntervalSpeciator {
    /// Create a new speciator
    pub fn new(k: usize) -> Self {
        Self { k }
    }
}

impl<G: Genome> Speciator<G> for FitnessIntervalSpeciator {
    fn validate(&self, pop_size: usize) -> EvoResult<()> {
        if self.k < 2 {
            return Err(EvolutionError::Configuration(format!(
                "k should be at least 2, got {}",
                self.k
            )));
        }
        if pop_size < self.k {
            return Err(EvolutionError::Configuration(format!(
                "cannot split populations of {pop_size} into {} species",
                self.k
            )));
        }
        Ok(())
    }

    fn apply(
        &self,
        mut individuals: Vec<Individual<G>>,
        _rng: &mut dyn RngCore,
    ) -> EvoResult<Vec<Vec<Individual<G>>>> {
        let n = individuals.len();
        if n < self.k {
            return Err(EvolutionError::Speciation(format!(
                "cannot split {n} individuals into {} species",
                self.k
            )));
        }

        individuals.sort_by(|a, b| a.cmp_fitness(b));
        let (base, extra) = (n / self.k, n % self.k);

        let mut rest = individuals.into_iter();
        let species = (0..self.k)
            .map(|s| {
                let size = base + usize::from(s < extra);
                rest.by_ref().take(size).collect()
            })
            .collect();
        Ok(species)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::real_vector::RealVector;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn individuals(fitnesses: &[f64]) -> Vec<Individual<RealVector>> {
        fitnesses
            .iter()
            .map(|&f| Individual::with_fitness(RealVector::new(vec![f]), f))
            .collect()
    }

    #[test]
    fn test_validate() {
        assert!(Speciator::<RealVector>::validate(&FitnessIntervalSpeciator::new(1), 10).is_err());
        assert!(Speciator::<RealVector>::validate(&FitnessIntervalSpeciator::new(2), 10).is_ok());
        assert!(Speciator::<RealVector>::validate(&FitnessIntervalSpeciator::new(4), 4).is_ok());
        assert!(Speciator::<RealVector>::validate(&FitnessIntervalSpeciator::new(4), 3).is_err());
    }

    #[test]
    fn test_intervals_are_sorted_and_balanced() {
        let mut rng = StdRng::seed_from_u64(0);
        let input = individuals(&[7.0, 1.0, 4.0, 3.0, 6.0, 2.0, 5.0]);
        let species = FitnessIntervalSpeciator::new(3).apply(input, &mut rng).unwrap();

        let bands: Vec<Vec<f64>> = species
            .iter()
            .map(|s| s.iter().map(|i| i.fitness).collect())
            .collect();
        assert_eq!(
            bands,
            vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0], vec![6.0, 7.0]]
        );
    }

    #[test]
    fn test_too_few_individuals() {
        let mut rng = StdRng::seed_from_u64(0);
        let input = individuals(&[1.0, 2.0]);
        assert!(FitnessIntervalSpeciator::new(3).apply(input, &mut rng).is_err());
    }
}
