//! Real-valued vector genome
//!
//! A reference genome for continuous problems. Its fitness is the sphere
//! function, so the optimum is the origin.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::error::{EvoResult, EvolutionError};
use crate::genome::traits::Genome;

/// Real-valued vector genome
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RealVector {
    /// The genes (values) of this genome
    genes: Vec<f64>,
    /// Standard deviation of the Gaussian mutation
    sigma: f64,
    /// Per-gene mutation probability
    mutation_probability: f64,
}

impl RealVector {
    /// Create a new real vector with the given genes
    pub fn new(genes: Vec<f64>) -> Self {
        Self {
            genes,
            sigma: 1.0,
            mutation_probability: 0.8,
        }
    }

    /// Create a vector with genes drawn uniformly from `[low, high)`
    pub fn random<R: Rng + ?Sized>(dimension: usize, low: f64, high: f64, rng: &mut R) -> Self {
        Self::new((0..dimension).map(|_| rng.gen_range(low..high)).collect())
    }

    /// Set the mutation parameters
    pub fn with_mutation(mut self, sigma: f64, probability: f64) -> Self {
        self.sigma = sigma;
        self.mutation_probability = probability;
        self
    }

    /// Get a reference to the genes
    pub fn genes(&self) -> &[f64] {
        &self.genes
    }

    /// Get the dimension
    pub fn dimension(&self) -> usize {
        self.genes.len()
    }

    /// Decode a genome from its JSON encoding
    ///
    /// Suitable as the decoder passed to the checkpoint functions.
    pub fn decode(bytes: &[u8]) -> EvoResult<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| EvolutionError::InvalidGenome(format!("RealVector: {e}")))
    }
}

impl Genome for RealVector {
    fn evaluate(&self) -> EvoResult<f64> {
        Ok(self.genes.iter().map(|x| x * x).sum())
    }

    fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let normal = match Normal::new(0.0, self.sigma) {
            Ok(normal) => normal,
            Err(_) => return,
        };
        for gene in &mut self.genes {
            if rng.gen::<f64>() < self.mutation_probability {
                *gene += normal.sample(rng);
            }
        }
    }

    fn crossover<R: Rng + ?Sized>(&mut self, other: &mut Self, rng: &mut R) {
        for (a, b) in self.genes.iter_mut().zip(other.genes.iter_mut()) {
            if rng.gen_bool(0.5) {
                std::mem::swap(a, b);
            }
        }
    }

    fn distance(&self, other: &Self) -> f64 {
        self.genes
            .iter()
            .zip(&other.genes)
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>()
            .sqrt()
    }
}
