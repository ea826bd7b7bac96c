//! Topology-driven migration
//!
//! Each population donates emigrants to the populations its topology points
//! at. Emigrants are copied from every population before any replacement
//! happens, so the order in which populations are visited does not matter.

use rand::seq::index;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::error::{EvoResult, EvolutionError};
use crate::genome::traits::Genome;
use crate::migration::Migrator;
use crate::population::individual::Individual;
use crate::population::population::Population;

/// Migration topology determines which populations exchange individuals
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MigrationTopology {
    /// Each population sends to the next one
    #[default]
    Ring,
    /// Every population sends to every other one
    FullyConnected,
    /// Each population sends to one randomly chosen other population
    Random,
    /// Every population sends to the hub, the hub sends to all
    Star {
        /// Index of the hub population
        hub: usize,
    },
}

impl MigrationTopology {
    /// Candidate targets for emigrants of `source`
    pub fn targets(&self, source: usize, n_pops: usize) -> Vec<usize> {
        match self {
            Self::Ring => vec![(source + 1) % n_pops],
            Self::FullyConnected | Self::Random => (0..n_pops).filter(|&i| i != source).collect(),
            Self::Star { hub } => {
                if source == *hub {
                    (0..n_pops).filter(|&i| i != source).collect()
                } else {
                    vec![*hub]
                }
            }
        }
    }

    /// Upper bound on the number of sources a single population can receive
    /// from in one migration
    pub fn max_in_degree(&self, n_pops: usize) -> usize {
        match self {
            Self::Ring => 1,
            _ => n_pops.saturating_sub(1),
        }
    }
}

/// Migration policy determines which and how many individuals migrate
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MigrationPolicy {
    /// Best k individuals migrate and replace random individuals
    Best(usize),
    /// Random k individuals migrate and replace random individuals
    Random(usize),
    /// Best k individuals migrate and replace the worst individuals
    BestReplaceWorst(usize),
}

impl Default for MigrationPolicy {
    fn default() -> Self {
        Self::Best(1)
    }
}

impl MigrationPolicy {
    /// Number of emigrants per source
    pub fn count(&self) -> usize {
        match self {
            Self::Best(k) | Self::Random(k) | Self::BestReplaceWorst(k) => *k,
        }
    }

    fn emigrants<G: Genome>(
        &self,
        pop: &Population<G>,
        rng: &mut dyn RngCore,
    ) -> Vec<Individual<G>> {
        let k = self.count().min(pop.len());
        match self {
            Self::Best(_) | Self::BestReplaceWorst(_) => ranked(pop)
                .into_iter()
                .take(k)
                .map(|i| pop[i].clone())
                .collect(),
            Self::Random(_) => index::sample(rng, pop.len(), k)
                .into_iter()
                .map(|i| pop[i].clone())
                .collect(),
        }
    }

    fn accept<G: Genome>(
        &self,
        pop: &mut Population<G>,
        immigrants: Vec<Individual<G>>,
        rng: &mut dyn RngCore,
    ) {
        let slots: Vec<usize> = match self {
            Self::Best(_) | Self::Random(_) => {
                index::sample(rng, pop.len(), immigrants.len()).into_vec()
            }
            Self::BestReplaceWorst(_) => ranked(pop).into_iter().rev().collect(),
        };
        for (slot, immigrant) in slots.into_iter().zip(immigrants) {
            pop[slot] = immigrant;
        }
    }
}

/// Indices of `pop` ordered from best to worst
fn ranked<G: Genome>(pop: &Population<G>) -> Vec<usize> {
    let mut order: Vec<usize> = (0..pop.len()).collect();
    order.sort_by(|&a, &b| pop[a].cmp_fitness(&pop[b]));
    order
}

/// Migration along a fixed topology
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TopologyMigrator {
    /// Which populations exchange individuals
    pub topology: MigrationTopology,
    /// Which individuals move and whom they replace
    pub policy: MigrationPolicy,
}

impl TopologyMigrator {
    /// Create a new migrator
    pub fn new(topology: MigrationTopology, policy: MigrationPolicy) -> Self {
        Self { topology, policy }
    }

    /// Ring topology moving the best `k` individuals
    pub fn ring(k: usize) -> Self {
        Self::new(MigrationTopology::Ring, MigrationPolicy::Best(k))
    }
}

impl<G: Genome> Migrator<G> for TopologyMigrator {
    fn validate(&self, n_pops: usize, pop_size: usize) -> EvoResult<()> {
        if n_pops < 2 {
            return Err(EvolutionError::Configuration(format!(
                "{:?} migration requires at least 2 populations, got {n_pops}",
                self.topology
            )));
        }
        let k = self.policy.count();
        if k == 0 {
            return Err(EvolutionError::Configuration(
                "number of migrants should be at least 1".to_string(),
            ));
        }
        if let MigrationTopology::Star { hub } = self.topology {
            if hub >= n_pops {
                return Err(EvolutionError::Configuration(format!(
                    "star hub {hub} is out of range for {n_pops} populations"
                )));
            }
        }
        let inbound = k * self.topology.max_in_degree(n_pops);
        if inbound > pop_size {
            return Err(EvolutionError::Configuration(format!(
                "a population may receive {inbound} migrants but only holds {pop_size}"
            )));
        }
        Ok(())
    }

    fn apply(&self, pops: &mut [Population<G>], rng: &mut dyn RngCore) -> EvoResult<()> {
        let n_pops = pops.len();
        if n_pops < 2 {
            return Err(EvolutionError::Migration(format!(
                "cannot migrate between {n_pops} populations"
            )));
        }

        let emigrants: Vec<Vec<Individual<G>>> = pops
            .iter()
            .map(|pop| self.policy.emigrants(pop, rng))
            .collect();

        let mut inbound: Vec<Vec<Individual<G>>> = vec![Vec::new(); n_pops];
        for (source, outgoing) in emigrants.into_iter().enumerate() {
            let targets = self.topology.targets(source, n_pops);
            match self.topology {
                MigrationTopology::Random => {
                    let target = targets[rng.gen_range(0..targets.len())];
                    inbound[target].extend(outgoing);
                }
                _ => {
                    for target in targets {
                        inbound[target].extend(outgoing.iter().cloned());
                    }
                }
            }
        }

        // Check every target before touching any population
        for (pop, immigrants) in pops.iter().zip(&inbound) {
            if immigrants.len() > pop.len() {
                return Err(EvolutionError::Migration(format!(
                    "population {} received {} migrants but only holds {}",
                    pop.id(),
                    immigrants.len(),
                    pop.len()
                )));
            }
        }

        let mut moved = 0;
        for (pop, immigrants) in pops.iter_mut().zip(inbound) {
            moved += immigrants.len();
            self.policy.accept(pop, immigrants, rng);
        }
        tracing::debug!(moved, topology = ?self.topology, "migration applied");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::real_vector::RealVector;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Population whose fitness values are `offset + 0..size`
    fn population(id: &str, size: usize, offset: f64) -> Population<RealVector> {
        let individuals = (0..size)
            .map(|i| {
                let f = offset + i as f64;
                Individual::with_fitness(RealVector::new(vec![f]), f)
            })
            .collect();
        Population::from_parts(id.to_string(), 0, individuals)
    }

    fn fitnesses(pop: &Population<RealVector>) -> Vec<f64> {
        pop.iter().map(|i| i.fitness).collect()
    }

    #[test]
    fn test_migration_topology_ring() {
        let topology = MigrationTopology::Ring;
        assert_eq!(topology.targets(0, 4), vec![1]);
        assert_eq!(topology.targets(3, 4), vec![0]);
    }

    #[test]
    fn test_migration_topology_star() {
        let topology = MigrationTopology::Star { hub: 0 };
        assert_eq!(topology.targets(2, 4), vec![0]);
        assert_eq!(topology.targets(0, 4), vec![1, 2, 3]);
        assert_eq!(topology.max_in_degree(4), 3);
    }

    #[test]
    fn test_validate_rejects_incompatible_shapes() {
        let ring = TopologyMigrator::ring(2);
        assert!(Migrator::<RealVector>::validate(&ring, 1, 10).is_err());
        assert!(Migrator::<RealVector>::validate(&ring, 2, 1).is_err());
        assert!(Migrator::<RealVector>::validate(&ring, 3, 10).is_ok());

        let none = TopologyMigrator::ring(0);
        assert!(Migrator::<RealVector>::validate(&none, 3, 10).is_err());

        let star = TopologyMigrator::new(MigrationTopology::Star { hub: 4 }, MigrationPolicy::Best(1));
        assert!(Migrator::<RealVector>::validate(&star, 4, 10).is_err());

        let full = TopologyMigrator::new(MigrationTopology::FullyConnected, MigrationPolicy::Best(2));
        assert!(Migrator::<RealVector>::validate(&full, 5, 7).is_err());
        assert!(Migrator::<RealVector>::validate(&full, 5, 8).is_ok());
    }

    #[test]
    fn test_ring_best_moves_best_to_successor() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut pops = vec![population("aaa", 5, 0.0), population("bbb", 5, 100.0)];
        TopologyMigrator::ring(1).apply(pops.as_mut_slice(), &mut rng).unwrap();

        assert!(fitnesses(&pops[1]).contains(&0.0));
        assert!(fitnesses(&pops[0]).contains(&100.0));
        assert_eq!(pops[0].len(), 5);
        assert_eq!(pops[1].len(), 5);
    }

    #[test]
    fn test_best_replace_worst() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut pops = vec![population("aaa", 4, 0.0), population("bbb", 4, 10.0)];
        let migrator = TopologyMigrator::new(MigrationTopology::Ring, MigrationPolicy::BestReplaceWorst(2));
        migrator.apply(pops.as_mut_slice(), &mut rng).unwrap();

        // Order of the untouched slots is kept
        assert_eq!(fitnesses(&pops[0]), vec![0.0, 1.0, 11.0, 10.0]);
        assert_eq!(fitnesses(&pops[1]), vec![10.0, 11.0, 1.0, 0.0]);
    }

    #[test]
    fn test_sizes_preserved_for_every_topology() {
        let topologies = [
            MigrationTopology::Ring,
            MigrationTopology::FullyConnected,
            MigrationTopology::Random,
            MigrationTopology::Star { hub: 1 },
        ];
        let policies = [
            MigrationPolicy::Best(2),
            MigrationPolicy::Random(2),
            MigrationPolicy::BestReplaceWorst(2),
        ];
        let mut rng = StdRng::seed_from_u64(7);
        for topology in &topologies {
            for policy in &policies {
                let migrator = TopologyMigrator::new(topology.clone(), policy.clone());
                let mut pops: Vec<_> = (0..4)
                    .map(|i| population("pop", 6, 10.0 * i as f64))
                    .collect();
                Migrator::<RealVector>::validate(&migrator, 4, 6).unwrap();
                migrator.apply(pops.as_mut_slice(), &mut rng).unwrap();
                assert!(pops.iter().all(|p| p.len() == 6));
            }
        }
    }

    #[test]
    fn test_apply_fails_closed_on_overflow() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut pops = vec![
            population("aaa", 2, 0.0),
            population("bbb", 2, 10.0),
            population("ccc", 2, 20.0),
        ];
        let before: Vec<_> = pops.iter().map(fitnesses).collect();
        let migrator = TopologyMigrator::new(MigrationTopology::FullyConnected, MigrationPolicy::Best(2));
        assert!(migrator.apply(pops.as_mut_slice(), &mut rng).is_err());

        let after: Vec<_> = pops.iter().map(fitnesses).collect();
        assert_eq!(before, after);
    }
}
