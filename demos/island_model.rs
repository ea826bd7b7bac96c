//! Island Model with Speciation
//!
//! Four populations evolve on the sphere function. Every population is
//! split into fitness bands that evolve independently, and every ten
//! generations the two best individuals of each island move to the next
//! island on the ring.
//!
//! Run with `RUST_LOG=debug` to see per-population diagnostics; the plain
//! statistics lines go to stderr.

use evo_archipelago::prelude::*;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;

const DIM: usize = 10;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    println!("=== Island Model with Speciation ===\n");
    println!("Problem: {}-D sphere", DIM);
    println!("Configuration:");
    println!("  Islands: 4");
    println!("  Population per island: 40");
    println!("  Migration: ring, Best(2) every 10 generations");
    println!("  Speciation: 4 fitness bands\n");

    let mut ga: GA<RealVector> = GaBuilder::new()
        .model(Generational::new(TournamentSelection::new(3), 0.3, 0.8))
        .migrator(TopologyMigrator::ring(2), 10)
        .speciator(FitnessIntervalSpeciator::new(4))
        .n_pops(4)
        .pop_size(40)
        .n_generations(100)
        .hof_size(5)
        .parallel_init(true)
        .parallel_eval(true)
        .log_sink(std::io::stderr())
        .seed(42)
        .build()?;

    ga.minimize(|rng: &mut StdRng| {
        RealVector::random(DIM, -5.12, 5.12, rng).with_mutation(0.3, 0.2)
    })?;

    println!("\nResults after {} generations:", ga.generations());
    for (rank, champion) in ga.hall_of_fame().entries().iter().enumerate() {
        println!("  #{}: {:.6}", rank + 1, champion.fitness);
    }

    for pop in ga.populations().iter() {
        if let Some(stats) = pop.stats() {
            println!(
                "  island {}: best {:.6}, mean {:.6}",
                pop.id(),
                stats.min,
                stats.mean
            );
        }
    }

    Ok(())
}
