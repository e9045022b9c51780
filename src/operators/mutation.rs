//! Mutation operators
//!
//! This module provides the single-particle relocation mutation.

use rand::Rng;

use crate::genome::bounds::BoxBounds;
use crate::population::candidate::Candidate;

/// Default per-child mutation probability
pub const MUTATION_RATE: f64 = 0.1;

/// Relocation mutation
///
/// With probability `rate`, moves exactly one randomly chosen particle to a
/// uniformly random position in the box and re-scores the candidate.
#[derive(Clone, Debug)]
pub struct RelocationMutation {
    /// Probability that a child is mutated at all
    pub rate: f64,
}

impl RelocationMutation {
    /// Create a new relocation mutation
    pub fn new(rate: f64) -> Self {
        assert!((0.0..=1.0).contains(&rate), "Rate must be in [0, 1]");
        Self { rate }
    }

    /// Possibly mutate a candidate; returns whether it changed
    pub fn mutate<R: Rng>(&self, candidate: &mut Candidate, bounds: &BoxBounds, rng: &mut R) -> bool {
        if candidate.is_empty() || rng.gen::<f64>() > self.rate {
            return false;
        }
        let index = rng.gen_range(0..candidate.len());
        candidate.relocate(index, bounds.random_position(rng));
        true
    }
}

impl Default for RelocationMutation {
    fn default() -> Self {
        Self::new(MUTATION_RATE)
    }
}
