//! Island coordination
//!
//! This module provides migration, the distributed stagnation check and the
//! global best selection that tie a cohort of islands together.

pub mod convergence;
pub mod global_best;
pub mod migration;

pub mod prelude {
    pub use super::convergence::*;
    pub use super::global_best::*;
    pub use super::migration::*;
}
