//! Run snapshots and checkpoint files
//!
//! A snapshot captures everything needed to resume a run: the populations,
//! the hall of fame and the generation count. Collaborators (model,
//! migrator, speciator) and the random source are not part of it; they
//! come from the orchestrator the snapshot is restored into.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use super::codec::{IndividualRecord, PopulationRecord};
use crate::error::{CheckpointError, EvoResult, EvolutionError};
use crate::ga::GA;
use crate::genome::traits::Genome;

/// Current snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serializable state of a run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GaSnapshot {
    /// Format version for forward compatibility
    pub version: u32,
    /// Completed generations
    pub generations: usize,
    /// Populations in order
    pub populations: Vec<PopulationRecord>,
    /// Hall of fame entries, best first
    pub hall_of_fame: Vec<IndividualRecord>,
}

impl GaSnapshot {
    /// Check if the snapshot can be read by this version
    pub fn is_compatible(&self) -> bool {
        self.version <= SNAPSHOT_VERSION
    }
}

impl<G: Genome + Serialize> GA<G> {
    /// Capture the current state of the run
    pub fn snapshot(&self) -> EvoResult<GaSnapshot> {
        let populations = self
            .populations()
            .iter()
            .map(PopulationRecord::from_population)
            .collect::<Result<_, _>>()?;
        let hall_of_fame = self
            .hall_of_fame()
            .entries()
            .iter()
            .map(IndividualRecord::from_individual)
            .collect::<Result<_, _>>()?;
        Ok(GaSnapshot {
            version: SNAPSHOT_VERSION,
            generations: self.generations(),
            populations,
            hall_of_fame,
        })
    }
}

impl<G: Genome> GA<G> {
    /// Replace the run state with a decoded snapshot
    ///
    /// The snapshot must match the configured number of populations and
    /// population size. Everything is decoded before anything is replaced,
    /// so a failed restore leaves the orchestrator untouched.
    pub fn restore<D>(&mut self, bytes: &[u8], decoder: D) -> EvoResult<()>
    where
        D: Fn(&[u8]) -> EvoResult<G>,
    {
        let snapshot: GaSnapshot = serde_json::from_slice(bytes)
            .map_err(|e| CheckpointError::Deserialization(e.to_string()))?;
        self.restore_snapshot(&snapshot, decoder)
    }

    /// Replace the run state with an already parsed snapshot
    pub fn restore_snapshot<D>(&mut self, snapshot: &GaSnapshot, decoder: D) -> EvoResult<()>
    where
        D: Fn(&[u8]) -> EvoResult<G>,
    {
        if !snapshot.is_compatible() {
            return Err(CheckpointError::VersionTooNew(snapshot.version).into());
        }

        let config = self.config();
        if snapshot.populations.len() != config.n_pops {
            return Err(EvolutionError::Configuration(format!(
                "snapshot holds {} populations, the run is configured for {}",
                snapshot.populations.len(),
                config.n_pops
            )));
        }
        if let Some(record) = snapshot
            .populations
            .iter()
            .find(|record| record.individuals.len() != config.pop_size)
        {
            return Err(EvolutionError::Configuration(format!(
                "population {} holds {} individuals, the run is configured for {}",
                record.id,
                record.individuals.len(),
                config.pop_size
            )));
        }

        let populations = snapshot
            .populations
            .iter()
            .map(|record| record.to_population(&decoder))
            .collect::<EvoResult<Vec<_>>>()?;
        let hall_of_fame = snapshot
            .hall_of_fame
            .iter()
            .enumerate()
            .map(|(index, record)| record.to_individual(index, &decoder))
            .collect::<EvoResult<Vec<_>>>()?;

        self.install(populations, hall_of_fame, snapshot.generations);
        tracing::info!(generations = snapshot.generations, "run restored");
        Ok(())
    }
}

/// Save a snapshot of `ga` to a JSON file
pub fn save_checkpoint<G>(ga: &GA<G>, path: impl AsRef<Path>) -> EvoResult<()>
where
    G: Genome + Serialize,
{
    let snapshot = ga.snapshot()?;
    let file = File::create(path.as_ref()).map_err(CheckpointError::from)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &snapshot)
        .map_err(|e| CheckpointError::Serialization(e.to_string()))?;
    writer.flush().map_err(CheckpointError::from)?;
    Ok(())
}

/// Restore `ga` from a JSON checkpoint file
pub fn load_checkpoint<G, D>(ga: &mut GA<G>, path: impl AsRef<Path>, decoder: D) -> EvoResult<()>
where
    G: Genome,
    D: Fn(&[u8]) -> EvoResult<G>,
{
    let path = path.as_ref();
    if !path.exists() {
        return Err(CheckpointError::NotFound(path.display().to_string()).into());
    }

    let file = File::open(path).map_err(CheckpointError::from)?;
    let mut bytes = Vec::new();
    BufReader::new(file)
        .read_to_end(&mut bytes)
        .map_err(CheckpointError::from)?;
    ga.restore(&bytes, decoder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::GaBuilder;
    use crate::genome::real_vector::RealVector;
    use rand::rngs::StdRng;
    use tempfile::tempdir;

    fn factory(rng: &mut StdRng) -> RealVector {
        RealVector::random(2, -3.0, 3.0, rng)
    }

    fn trained(seed: u64) -> GA<RealVector> {
        let mut ga = GaBuilder::with_defaults()
            .n_pops(2)
            .pop_size(6)
            .n_generations(3)
            .hof_size(4)
            .seed(seed)
            .build()
            .unwrap();
        ga.minimize(factory).unwrap();
        ga
    }

    #[test]
    fn test_snapshot_restore_round_trip() {
        let source = trained(1);
        let bytes = serde_json::to_vec(&source.snapshot().unwrap()).unwrap();

        let mut target = trained(2);
        target.restore(&bytes, RealVector::decode).unwrap();

        assert_eq!(target.generations(), 3);
        assert_eq!(target.hall_of_fame().len(), source.hall_of_fame().len());
        assert_eq!(target.best().unwrap().fitness, source.best().unwrap().fitness);
        for (a, b) in target.populations().iter().zip(source.populations().iter()) {
            assert_eq!(a.id(), b.id());
        }
        let again = serde_json::to_vec(&target.snapshot().unwrap()).unwrap();
        assert_eq!(again, bytes);
    }

    #[test]
    fn test_restore_rejects_shape_mismatch() {
        let source = trained(1);
        let bytes = serde_json::to_vec(&source.snapshot().unwrap()).unwrap();

        let mut other: GA<RealVector> = GaBuilder::with_defaults()
            .n_pops(3)
            .pop_size(6)
            .build()
            .unwrap();
        let result = other.restore(&bytes, RealVector::decode);
        assert!(matches!(result, Err(EvolutionError::Configuration(_))));
        assert!(other.populations().is_empty());
    }

    #[test]
    fn test_restore_rejects_newer_version() {
        let mut snapshot = trained(1).snapshot().unwrap();
        snapshot.version = SNAPSHOT_VERSION + 1;

        let mut target = trained(2);
        let result = target.restore_snapshot(&snapshot, RealVector::decode);
        assert!(matches!(
            result,
            Err(EvolutionError::Checkpoint(CheckpointError::VersionTooNew(_)))
        ));
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.json");
        let source = trained(7);
        save_checkpoint(&source, &path).unwrap();

        let mut target = trained(8);
        load_checkpoint(&mut target, &path, RealVector::decode).unwrap();
        assert_eq!(target.best().unwrap().fitness, source.best().unwrap().fitness);

        target.resume().unwrap();
        assert_eq!(target.generations(), 6);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let mut target = trained(1);
        let result = load_checkpoint(&mut target, dir.path().join("absent.json"), RealVector::decode);
        assert!(matches!(
            result,
            Err(EvolutionError::Checkpoint(CheckpointError::NotFound(_)))
        ));
    }
}
