//! Error types for particle-evo
//!
//! This module defines all error types used throughout the library.

use thiserror::Error;

/// Error type for operator failures
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OperatorError {
    /// Crossover operation failed
    #[error("Crossover failed: {0}")]
    CrossoverFailed(String),

    /// Selection operation failed
    #[error("Selection failed: {0}")]
    SelectionFailed(String),
}

/// Error type for packing and unpacking candidates
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WireError {
    /// Buffer does not start with the expected magic bytes
    #[error("Bad magic bytes: {0:?}")]
    BadMagic([u8; 4]),

    /// Schema version this build cannot read
    #[error("Unsupported wire version {found} (expected {expected})")]
    UnsupportedVersion { expected: u16, found: u16 },

    /// Buffer ended before the declared payload
    #[error("Truncated buffer: need {needed} bytes, got {actual}")]
    Truncated { needed: usize, actual: usize },

    /// Bytes left over after the declared payload
    #[error("Trailing bytes: expected {expected} bytes, got {actual}")]
    TrailingBytes { expected: usize, actual: usize },

    /// Candidate count does not match the destination run
    #[error("Count mismatch: expected {expected} candidates, got {actual}")]
    CountMismatch { expected: usize, actual: usize },

    /// Particle count does not match the run's chromosome length
    #[error("Particle count mismatch: expected {expected}, got {actual}")]
    ParticleMismatch { expected: usize, actual: usize },

    /// Count does not fit in the header field
    #[error("Too many items to pack: {0}")]
    Overflow(usize),
}

/// Error type for inter-island message passing
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Every peer that could answer has hung up
    #[error("Island {rank} lost its peers while waiting for a message")]
    Disconnected { rank: usize },

    /// Rank outside the cohort, or a message addressed to self
    #[error("Invalid rank {rank} for a cohort of {size}")]
    InvalidRank { rank: usize, size: usize },

    /// Received message does not have the size the protocol requires
    #[error("Unexpected message size from island {source_rank}: expected {expected}, got {actual}")]
    UnexpectedSize {
        source_rank: usize,
        expected: usize,
        actual: usize,
    },

    /// Collective payload could not be encoded or decoded
    #[error("Collective payload error: {0}")]
    Collective(String),
}

/// Top-level error type for evolution operations
#[derive(Debug, Error)]
pub enum EvolutionError {
    /// Operator error
    #[error("Operator error: {0}")]
    Operator(#[from] OperatorError),

    /// Wire format error
    #[error("Wire error: {0}")]
    Wire(#[from] WireError),

    /// Transport error
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Output file error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Empty population
    #[error("Empty population")]
    EmptyPopulation,

    /// A worker thread for an island died
    #[error("Island {rank} panicked")]
    IslandPanicked { rank: usize },

    /// An island finished without reporting the results it owns
    #[error("Island {rank} finished without reporting results")]
    MissingResults { rank: usize },
}

/// Result type alias for evolution operations
pub type EvoResult<T> = Result<T, EvolutionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_error_display() {
        let err = OperatorError::CrossoverFailed("chromosome too short".to_string());
        assert_eq!(err.to_string(), "Crossover failed: chromosome too short");
    }

    #[test]
    fn test_wire_error_display() {
        let err = WireError::UnsupportedVersion {
            expected: 1,
            found: 7,
        };
        assert_eq!(err.to_string(), "Unsupported wire version 7 (expected 1)");

        let err = WireError::CountMismatch {
            expected: 3,
            actual: 2,
        };
        assert_eq!(err.to_string(), "Count mismatch: expected 3 candidates, got 2");
    }

    #[test]
    fn test_transport_error_display() {
        let err = TransportError::UnexpectedSize {
            source_rank: 2,
            expected: 40,
            actual: 12,
        };
        assert_eq!(
            err.to_string(),
            "Unexpected message size from island 2: expected 40, got 12"
        );
    }

    #[test]
    fn test_evolution_error_from_wire_error() {
        let wire_err = WireError::BadMagic(*b"NOPE");
        let evo_err: EvolutionError = wire_err.into();
        assert!(matches!(evo_err, EvolutionError::Wire(_)));
    }

    #[test]
    fn test_evolution_error_from_transport_error() {
        let err: EvolutionError = TransportError::Disconnected { rank: 1 }.into();
        assert!(matches!(err, EvolutionError::Transport(_)));
        assert_eq!(
            err.to_string(),
            "Transport error: Island 1 lost its peers while waiting for a message"
        );
    }

    #[test]
    fn test_missing_results_display() {
        let err = EvolutionError::MissingResults { rank: 0 };
        assert_eq!(err.to_string(), "Island 0 finished without reporting results");
    }
}
