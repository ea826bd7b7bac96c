//! K-medoids speciation
//!
//! Clusters individuals around `k` medoids using [`Genome::distance`].
//! After clustering, undersized clusters are topped up from the largest
//! cluster so every species holds at least `min_per_cluster` members.

use rand::seq::index;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::{EvoResult, EvolutionError};
use crate::genome::traits::Genome;
use crate::population::individual::Individual;
use crate::speciation::Speciator;

/// K-medoids clustering over genome distance
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KMedoidsSpeciator {
    /// Number of species
    pub k: usize,
    /// Minimum number of members per species
    pub min_per_cluster: usize,
    /// Maximum number of assign/update rounds
    pub max_iterations: usize,
}

impl KMedoidsSpeciator {
    /// Create a new speciator
    pub fn new(k: usize, min_per_cluster: usize, max_iterations: usize) -> Self {
        Self {
            k,
            min_per_cluster,
            max_iterations,
        }
    }
}

impl Default for KMedoidsSpeciator {
    fn default() -> Self {
        Self::new(2, 1, 10)
    }
}

/// Index of the medoid closest to `i`; a medoid always belongs to itself
fn nearest<G: Genome>(i: usize, individuals: &[Individual<G>], medoids: &[usize]) -> usize {
    if let Some(own) = medoids.iter().position(|&m| m == i) {
        return own;
    }
    let genome = individuals[i].genome();
    let mut best = (0, f64::INFINITY);
    for (c, &m) in medoids.iter().enumerate() {
        let d = genome.distance(individuals[m].genome());
        if d < best.1 {
            best = (c, d);
        }
    }
    best.0
}

/// Member of `members` with the lowest total distance to the others
fn medoid_of<G: Genome>(members: &[usize], individuals: &[Individual<G>]) -> Option<usize> {
    members
        .iter()
        .map(|&i| {
            let cost: f64 = members
                .iter()
                .map(|&j| individuals[i].genome().distance(individuals[j].genome()))
                .sum();
            (i, cost)
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

impl KMedoidsSpeciator {
    fn cluster<G: Genome>(
        &self,
        individuals: &[Individual<G>],
        rng: &mut dyn RngCore,
    ) -> Vec<usize> {
        let n = individuals.len();
        let mut medoids = index::sample(rng, n, self.k).into_vec();
        let mut assignment = vec![0; n];

        for _ in 0..self.max_iterations {
            for (i, slot) in assignment.iter_mut().enumerate() {
                *slot = nearest(i, individuals, &medoids);
            }

            let mut changed = false;
            for (c, medoid) in medoids.iter_mut().enumerate() {
                let members: Vec<usize> = (0..n).filter(|&i| assignment[i] == c).collect();
                if let Some(m) = medoid_of(&members, individuals) {
                    changed |= m != *medoid;
                    *medoid = m;
                }
            }
            if !changed {
                break;
            }
        }

        // Medoids may have moved in the last round
        for (i, slot) in assignment.iter_mut().enumerate() {
            *slot = nearest(i, individuals, &medoids);
        }
        self.rebalance(individuals, &medoids, &mut assignment);
        assignment
    }

    fn rebalance<G: Genome>(
        &self,
        individuals: &[Individual<G>],
        medoids: &[usize],
        assignment: &mut [usize],
    ) {
        loop {
            let mut sizes = vec![0usize; self.k];
            for &c in assignment.iter() {
                sizes[c] += 1;
            }
            let Some(small) = (0..self.k).find(|&c| sizes[c] < self.min_per_cluster) else {
                return;
            };
            let Some(large) = (0..self.k).max_by_key(|&c| sizes[c]) else {
                return;
            };
            if sizes[large] <= self.min_per_cluster {
                return;
            }

            let target = individuals[medoids[small]].genome();
            let donor = (0..assignment.len())
                .filter(|&i| assignment[i] == large && i != medoids[large])
                .min_by(|&a, &b| {
                    let da = target.distance(individuals[a].genome());
                    let db = target.distance(individuals[b].genome());
                    da.total_cmp(&db)
                });
            match donor {
                Some(i) => assignment[i] = small,
                None => return,
            }
        }
    }
}

impl<G: Genome> Speciator<G> for KMedoidsSpeciator {
    fn validate(&self, pop_size: usize) -> EvoResult<()> {
        if self.k < 2 {
            return Err(EvolutionError::Configuration(format!(
                "k should be at least 2, got {}",
                self.k
            )));
        }
        if self.min_per_cluster == 0 {
            return Err(EvolutionError::Configuration(
                "min_per_cluster should be at least 1".to_string(),
            ));
        }
        if self.max_iterations == 0 {
            return Err(EvolutionError::Configuration(
                "max_iterations should be at least 1".to_string(),
            ));
        }
        let required = self.k * self.min_per_cluster;
        if pop_size < required {
            return Err(EvolutionError::Configuration(format!(
                "{} species of at least {} need {required} individuals, populations hold {pop_size}",
                self.k, self.min_per_cluster
            )));
        }
        Ok(())
    }

    fn apply(
        &self,
        individuals: Vec<Individual<G>>,
        rng: &mut dyn RngCore,
    ) -> EvoResult<Vec<Vec<Individual<G>>>> {
        let required = self.k * self.min_per_cluster;
        if individuals.len() < required {
            return Err(EvolutionError::Speciation(format!(
                "{} individuals cannot fill {} species of at least {}",
                individuals.len(),
                self.k,
                self.min_per_cluster
            )));
        }

        let assignment = self.cluster(&individuals, rng);
        let mut species: Vec<Vec<Individual<G>>> = (0..self.k).map(|_| Vec::new()).collect();
        for (individual, c) in individuals.into_iter().zip(assignment) {
            species[c].push(individual);
        }
        Ok(species)
    }
}
