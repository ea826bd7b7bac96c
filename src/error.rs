//! Error types for evo-archipelago
//!
//! This module defines all error types used throughout the library.

use thiserror::Error;

/// Error type for checkpoint and persistence operations
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// IO error while reading or writing a checkpoint file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// The caller-supplied genome decoder rejected an encoded genome
    #[error("Genome decoding failed at individual {index}: {message}")]
    Genome { index: usize, message: String },

    /// Checkpoint version is too new
    #[error("Checkpoint version {0} is newer than supported")]
    VersionTooNew(u32),

    /// Checkpoint file not found
    #[error("Checkpoint not found: {0}")]
    NotFound(String),

    /// Structurally valid data that does not describe a usable state
    #[error("Corrupted checkpoint: {0}")]
    Corrupted(String),
}

/// Top-level error type for evolution operations
#[derive(Debug, Error)]
pub enum EvolutionError {
    /// Invalid configuration, detected before any generation runs
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// A genome could not be built or decoded
    #[error("Invalid genome: {0}")]
    InvalidGenome(String),

    /// Fitness evaluation failed
    #[error("Fitness evaluation failed: {0}")]
    FitnessEvaluation(String),

    /// Selection could not pick parents
    #[error("Selection failed: {0}")]
    Selection(String),

    /// Migration policy failed mid-run
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Speciation policy failed mid-run
    #[error("Speciation failed: {0}")]
    Speciation(String),

    /// A policy changed the size of a population
    #[error("Population size changed: expected {expected}, got {actual}")]
    PopulationSize { expected: usize, actual: usize },

    /// Checkpoint error
    #[error("Checkpoint error: {0}")]
    Checkpoint(#[from] CheckpointError),

    /// Writing to the statistics sink failed
    #[error("Log sink error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for evolution operations
pub type EvoResult<T> = Result<T, EvolutionError>;
