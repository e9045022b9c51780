//! Candidate arrangement type
//!
//! This module provides the Candidate type that pairs a particle arrangement
//! with its cached fitness.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::fitness::lennard_jones::calc_fitness;
use crate::genome::bounds::BoxBounds;
use crate::genome::position::Position;

/// A particle arrangement in the population
///
/// The cached fitness always equals [`calc_fitness`] of the current positions:
/// every way of changing positions goes through a method that re-scores.
/// Cloning is a deep copy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    positions: Vec<Position>,
    fitness: f64,
}

impl Candidate {
    /// Create a candidate and score it
    pub fn new(positions: Vec<Position>) -> Self {
        let fitness = calc_fitness(&positions);
        Self { positions, fitness }
    }

    /// Create a candidate with uniformly random positions inside the box
    pub fn random<R: Rng>(num_particles: usize, bounds: &BoxBounds, rng: &mut R) -> Self {
        let positions = (0..num_particles)
            .map(|_| bounds.random_position(rng))
            .collect();
        Self::new(positions)
    }

    /// Rebuild a candidate whose fitness was computed elsewhere
    ///
    /// Only for data that crossed the wire from a conforming peer.
    pub(crate) fn from_raw_parts(positions: Vec<Position>, fitness: f64) -> Self {
        Self { positions, fitness }
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    /// Number of particles
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Move one particle and re-score
    pub fn relocate(&mut self, index: usize, position: Position) {
        self.positions[index] = position;
        self.fitness = calc_fitness(&self.positions);
    }

    /// Deep copy `other` into this candidate, reusing the allocation
    pub fn copy_from(&mut self, other: &Candidate) {
        self.positions.clone_from(&other.positions);
        self.fitness = other.fitness;
    }

    /// Check if this candidate is strictly fitter than another
    pub fn is_better_than(&self, other: &Self) -> bool {
        self.fitness > other.fitness
    }
}

/// `x,y<TAB>x,y<TAB>…<TAB>:fitness F`
impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for position in &self.positions {
            write!(f, "{}\t", position)?;
        }
        write!(f, ":fitness {:.6}", self.fitness)
    }
}
