//! Bounds for particle positions
//!
//! This module provides the simulation box that constrains every particle.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::genome::position::Position;

/// The simulation box `[0, x_max] × [0, y_max]`, both ends inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxBounds {
    /// Largest x coordinate (inclusive)
    pub x_max: i32,
    /// Largest y coordinate (inclusive)
    pub y_max: i32,
}

impl BoxBounds {
    /// Create new bounds
    ///
    /// # Panics
    /// Panics if either dimension is negative
    pub fn new(x_max: i32, y_max: i32) -> Self {
        assert!(
            x_max >= 0 && y_max >= 0,
            "Invalid box: dimensions ({}, {}) must be non-negative",
            x_max,
            y_max
        );
        Self { x_max, y_max }
    }

    /// Draw a position uniformly from the box
    pub fn random_position<R: Rng>(&self, rng: &mut R) -> Position {
        Position::new(rng.gen_range(0..=self.x_max), rng.gen_range(0..=self.y_max))
    }

    /// Check if a position lies inside the box
    pub fn contains(&self, position: Position) -> bool {
        (0..=self.x_max).contains(&position.x) && (0..=self.y_max).contains(&position.y)
    }
}
