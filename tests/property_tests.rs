//! Property-based tests for evo-archipelago
//!
//! Uses proptest to verify invariants and properties of the library.

use evo_archipelago::prelude::*;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn factory(rng: &mut StdRng) -> RealVector {
    RealVector::random(3, -10.0, 10.0, rng)
}

fn evaluated_populations(n_pops: usize, pop_size: usize, seed: u64) -> Vec<Population<RealVector>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n_pops)
        .map(|_| {
            let mut pop = Population::random(pop_size, false, &factory, &mut rng);
            pop.evaluate(false).unwrap();
            pop
        })
        .collect()
}

/// Genes of every individual, sorted, as a multiset fingerprint
fn fingerprint(individuals: &[Individual<RealVector>]) -> Vec<Vec<u64>> {
    let mut genes: Vec<Vec<u64>> = individuals
        .iter()
        .map(|i| i.genome.genes().iter().map(|g| g.to_bits()).collect())
        .collect();
    genes.sort();
    genes
}

fn migration_topology() -> impl Strategy<Value = MigrationTopology> {
    prop_oneof![
        Just(MigrationTopology::Ring),
        Just(MigrationTopology::FullyConnected),
        Just(MigrationTopology::Random),
        Just(MigrationTopology::Star { hub: 0 }),
    ]
}

fn migration_policy(k: usize) -> impl Strategy<Value = MigrationPolicy> {
    prop_oneof![
        Just(MigrationPolicy::Best(k)),
        Just(MigrationPolicy::Random(k)),
        Just(MigrationPolicy::BestReplaceWorst(k)),
    ]
}

proptest! {
    // ==================== Population Properties ====================

    #[test]
    fn population_has_requested_size(size in 1usize..60, seed in any::<u64>(), parallel in any::<bool>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let pop = Population::random(size, parallel, &factory, &mut rng);
        prop_assert_eq!(pop.len(), size);
        prop_assert!(pop.iter().all(|i| !i.is_evaluated()));
    }

    #[test]
    fn population_id_is_pure_function_of_seed_and_size(size in 1usize..40, seed in any::<u64>()) {
        let a = Population::random(size, false, &factory, &mut StdRng::seed_from_u64(seed));
        let b = Population::random(size, false, &factory, &mut StdRng::seed_from_u64(seed));
        prop_assert_eq!(a.id(), b.id());
        prop_assert_eq!(a.id().len(), POPULATION_ID_LEN);
    }

    #[test]
    fn population_encoding_round_trips(size in 1usize..20, seed in any::<u64>()) {
        let pop = &evaluated_populations(1, size, seed)[0];
        let encoded = encode_population(pop).unwrap();
        let decoded = decode_population(&encoded, RealVector::decode).unwrap();
        prop_assert_eq!(encode_population(&decoded).unwrap(), encoded);
    }

    // ==================== Hall of Fame Properties ====================

    #[test]
    fn hall_of_fame_bounded_and_sorted(
        capacity in 1usize..10,
        fitnesses in prop::collection::vec(-100.0..100.0f64, 0..50)
    ) {
        let mut hof = HallOfFame::new(capacity);
        for f in &fitnesses {
            hof.add(&Individual::with_fitness(RealVector::new(vec![*f]), *f));
            prop_assert!(hof.len() <= capacity);
            prop_assert!(hof.entries().windows(2).all(|w| w[0].fitness <= w[1].fitness));
        }

        let mut expected = fitnesses.clone();
        expected.sort_by(f64::total_cmp);
        expected.truncate(capacity);
        let kept: Vec<f64> = hof.entries().iter().map(|i| i.fitness).collect();
        prop_assert_eq!(kept, expected);
    }

    // ==================== Migration Properties ====================

    #[test]
    fn migration_preserves_sizes(
        n_pops in 2usize..6,
        (k, policy) in (1usize..3).prop_flat_map(|k| (Just(k), migration_policy(k))),
        topology in migration_topology(),
        seed in any::<u64>()
    ) {
        let pop_size = k * (n_pops - 1) + 1;
        let migrator = TopologyMigrator::new(topology, policy);
        Migrator::<RealVector>::validate(&migrator, n_pops, pop_size).unwrap();

        let mut pops = evaluated_populations(n_pops, pop_size, seed);
        let mut rng = StdRng::seed_from_u64(seed);
        migrator.apply(pops.as_mut_slice(), &mut rng).unwrap();

        prop_assert_eq!(pops.len(), n_pops);
        prop_assert!(pops.iter().all(|p| p.len() == pop_size));
    }

    #[test]
    fn ring_swap_conserves_individuals(
        n_pops in 2usize..5,
        pop_size in 1usize..10,
        n_migrants in 1usize..5,
        seed in any::<u64>()
    ) {
        let mut pops = evaluated_populations(n_pops, pop_size, seed);
        let before: Vec<_> = pops.iter().flat_map(|p| p.iter().cloned()).collect();

        let mut rng = StdRng::seed_from_u64(seed);
        RingSwapMigrator::new(n_migrants).apply(pops.as_mut_slice(), &mut rng).unwrap();

        let after: Vec<_> = pops.iter().flat_map(|p| p.iter().cloned()).collect();
        prop_assert!(pops.iter().all(|p| p.len() == pop_size));
        prop_assert_eq!(fingerprint(&before), fingerprint(&after));
    }

    // ==================== Speciation Properties ====================

    #[test]
    fn fitness_intervals_partition_exactly(k in 2usize..6, extra in 0usize..20, seed in any::<u64>()) {
        let individuals = evaluated_populations(1, k + extra, seed).remove(0).into_individuals();
        let expected = fingerprint(&individuals);

        let mut rng = StdRng::seed_from_u64(seed);
        let species = FitnessIntervalSpeciator::new(k).apply(individuals, &mut rng).unwrap();

        prop_assert_eq!(species.len(), k);
        let sizes: Vec<usize> = species.iter().map(Vec::len).collect();
        let (min, max) = (sizes.iter().min().unwrap(), sizes.iter().max().unwrap());
        prop_assert!(max - min <= 1);
        let merged: Vec<_> = species.into_iter().flatten().collect();
        prop_assert_eq!(fingerprint(&merged), expected);
    }

    #[test]
    fn kmedoids_partition_exactly(
        k in 2usize..4,
        min_per_cluster in 1usize..3,
        extra in 0usize..15,
        seed in any::<u64>()
    ) {
        let size = k * min_per_cluster + extra;
        let individuals = evaluated_populations(1, size, seed).remove(0).into_individuals();
        let expected = fingerprint(&individuals);

        let mut rng = StdRng::seed_from_u64(seed);
        let species = KMedoidsSpeciator::new(k, min_per_cluster, 10)
            .apply(individuals, &mut rng)
            .unwrap();

        prop_assert_eq!(species.len(), k);
        prop_assert!(species.iter().all(|s| s.len() >= min_per_cluster));
        let merged: Vec<_> = species.into_iter().flatten().collect();
        prop_assert!(merged.iter().all(|i| i.is_evaluated()));
        prop_assert_eq!(fingerprint(&merged), expected);
    }

    // ==================== Model Properties ====================

    #[test]
    fn models_preserve_population_size(size in 1usize..30, seed in any::<u64>()) {
        let mut pop = evaluated_populations(1, size, seed).remove(0);
        let mut rng = StdRng::seed_from_u64(seed);

        Generational::default().evolve(&mut pop, &mut rng).unwrap();
        prop_assert_eq!(pop.len(), size);

        let steady = SteadyState::new(TournamentSelection::new(2), true, 0.5, 0.7);
        steady.evolve(&mut pop, &mut rng).unwrap();
        prop_assert_eq!(pop.len(), size);
    }
}
