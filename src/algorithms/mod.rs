//! Evolutionary algorithms
//!
//! This module provides the generational breeding step and the island run
//! orchestration built on it.

pub mod breeder;
pub mod runner;

pub mod prelude {
    pub use super::breeder::*;
    pub use super::runner::*;
}
