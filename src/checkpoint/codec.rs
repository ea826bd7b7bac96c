//! Population encoding
//!
//! Populations are stored as JSON records with a fixed field order. The
//! genome of each individual is kept as an opaque JSON value: the engine
//! does not know the concrete genome type, so decoding goes through a
//! caller-supplied decoder that receives the raw genome bytes.
//!
//! Encoding is canonical: encoding a decoded population reproduces the
//! original bytes exactly.

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::error::{CheckpointError, EvoResult};
use crate::genome::traits::Genome;
use crate::population::individual::Individual;
use crate::population::population::Population;

/// Stored form of an individual
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IndividualRecord {
    /// Genome as encoded by its `Serialize` impl
    pub genome: Box<RawValue>,
    /// Fitness, `null` when not finite
    pub fitness: Option<f64>,
    /// Whether the fitness is meaningful
    pub evaluated: bool,
}

/// Stored form of a population
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PopulationRecord {
    /// Population identifier
    pub id: String,
    /// Completed evolution steps
    pub generation: usize,
    /// Individuals in population order
    pub individuals: Vec<IndividualRecord>,
}

impl IndividualRecord {
    /// Capture an individual
    pub fn from_individual<G>(individual: &Individual<G>) -> Result<Self, CheckpointError>
    where
        G: Genome + Serialize,
    {
        let genome = serde_json::value::to_raw_value(&individual.genome)
            .map_err(|e| CheckpointError::Serialization(e.to_string()))?;
        Ok(Self {
            genome,
            fitness: individual
                .fitness
                .is_finite()
                .then_some(individual.fitness),
            evaluated: individual.evaluated,
        })
    }

    /// Rebuild the individual, decoding the genome with `decoder`
    ///
    /// `index` is only used to report decoder failures.
    pub fn to_individual<G, D>(&self, index: usize, decoder: &D) -> EvoResult<Individual<G>>
    where
        G: Genome,
        D: Fn(&[u8]) -> EvoResult<G>,
    {
        let genome = decoder(self.genome.get().as_bytes()).map_err(|e| CheckpointError::Genome {
            index,
            message: e.to_string(),
        })?;
        Ok(Individual {
            genome,
            fitness: self.fitness.unwrap_or(f64::INFINITY),
            evaluated: self.evaluated,
        })
    }
}

impl PopulationRecord {
    /// Capture a population
    pub fn from_population<G>(pop: &Population<G>) -> Result<Self, CheckpointError>
    where
        G: Genome + Serialize,
    {
        Ok(Self {
            id: pop.id().to_string(),
            generation: pop.generation(),
            individuals: pop
                .iter()
                .map(IndividualRecord::from_individual)
                .collect::<Result<_, _>>()?,
        })
    }

    /// Rebuild the population; any failing genome aborts the whole decode
    pub fn to_population<G, D>(&self, decoder: &D) -> EvoResult<Population<G>>
    where
        G: Genome,
        D: Fn(&[u8]) -> EvoResult<G>,
    {
        let individuals = self
            .individuals
            .iter()
            .enumerate()
            .map(|(index, record)| record.to_individual(index, decoder))
            .collect::<EvoResult<Vec<_>>>()?;
        Ok(Population::from_parts(
            self.id.clone(),
            self.generation,
            individuals,
        ))
    }
}

/// Encode a population to JSON bytes
pub fn encode_population<G>(pop: &Population<G>) -> EvoResult<Vec<u8>>
where
    G: Genome + Serialize,
{
    let record = PopulationRecord::from_population(pop)?;
    serde_json::to_vec(&record)
        .map_err(|e| CheckpointError::Serialization(e.to_string()).into())
}

/// Decode a population from JSON bytes
pub fn decode_population<G, D>(bytes: &[u8], decoder: D) -> EvoResult<Population<G>>
where
    G: Genome,
    D: Fn(&[u8]) -> EvoResult<G>,
{
    let record: PopulationRecord = serde_json::from_slice(bytes)
        .map_err(|e| CheckpointError::Deserialization(e.to_string()))?;
    record.to_population(&decoder)
}

/// Encode a set of populations to a JSON array
pub fn encode_populations<G>(pops: &[Population<G>]) -> EvoResult<Vec<u8>>
where
    G: Genome + Serialize,
{
    let records = pops
        .iter()
        .map(PopulationRecord::from_population)
        .collect::<Result<Vec<_>, _>>()?;
    serde_json::to_vec(&records)
        .map_err(|e| CheckpointError::Serialization(e.to_string()).into())
}

/// Decode exactly `n_pops` populations from a JSON array
pub fn decode_populations<G, D>(
    n_pops: usize,
    bytes: &[u8],
    decoder: D,
) -> EvoResult<Vec<Population<G>>>
where
    G: Genome,
    D: Fn(&[u8]) -> EvoResult<G>,
{
    let records: Vec<PopulationRecord> = serde_json::from_slice(bytes)
        .map_err(|e| CheckpointError::Deserialization(e.to_string()))?;
    if records.len() != n_pops {
        return Err(CheckpointError::Corrupted(format!(
            "expected {n_pops} populations, found {}",
            records.len()
        ))
        .into());
    }
    records
        .iter()
        .map(|record| record.to_population(&decoder))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvolutionError;
    use crate::genome::real_vector::RealVector;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn population(seed: u64) -> Population<RealVector> {
        let mut rng = StdRng::seed_from_u64(seed);
        let factory = |rng: &mut StdRng| RealVector::random(3, -1.0, 1.0, rng);
        let mut pop = Population::random(6, false, &factory, &mut rng);
        pop.evaluate(false).unwrap();
        pop[5].mutate(&mut rng);
        pop
    }

    #[test]
    fn test_population_round_trip_is_byte_identical() {
        let pop = population(1);
        let encoded = encode_population(&pop).unwrap();
        let decoded = decode_population(&encoded, RealVector::decode).unwrap();

        assert_eq!(decoded.id(), pop.id());
        assert_eq!(decoded.len(), pop.len());
        assert!(!decoded[5].is_evaluated());
        assert_eq!(decoded[5].fitness, f64::INFINITY);
        assert_eq!(encode_population(&decoded).unwrap(), encoded);
    }

    #[test]
    fn test_unevaluated_fitness_is_null() {
        let pop = population(2);
        let text = String::from_utf8(encode_population(&pop).unwrap()).unwrap();
        assert!(text.starts_with(r#"{"id":""#));
        assert!(text.contains(r#""fitness":null,"evaluated":false"#));
    }

    #[test]
    fn test_populations_round_trip() {
        let pops = vec![population(3), population(4)];
        let encoded = encode_populations(&pops).unwrap();
        let decoded = decode_populations(2, &encoded, RealVector::decode).unwrap();
        assert_eq!(encode_populations(&decoded).unwrap(), encoded);
    }

    #[test]
    fn test_populations_count_mismatch() {
        let encoded = encode_populations(&[population(5)]).unwrap();
        let result = decode_populations(2, &encoded, RealVector::decode);
        assert!(matches!(
            result,
            Err(EvolutionError::Checkpoint(CheckpointError::Corrupted(_)))
        ));
    }

    #[test]
    fn test_decoder_failure_aborts() {
        let encoded = encode_population(&population(6)).unwrap();
        let failing = |_: &[u8]| -> EvoResult<RealVector> {
            Err(EvolutionError::InvalidGenome("unsupported".to_string()))
        };
        let result = decode_population(&encoded, failing);
        assert!(matches!(
            result,
            Err(EvolutionError::Checkpoint(CheckpointError::Genome { index: 0, .. }))
        ));
    }

    #[test]
    fn test_malformed_input() {
        let result = decode_population(b"{not json", RealVector::decode);
        assert!(matches!(
            result,
            Err(EvolutionError::Checkpoint(CheckpointError::Deserialization(_)))
        ));
    }
}
