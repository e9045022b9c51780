//! Particle arrangement genome
//!
//! This module provides the position gene and the simulation box bounds.

pub mod bounds;
pub mod position;

pub mod prelude {
    pub use super::bounds::*;
    pub use super::position::*;
}
