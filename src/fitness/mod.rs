//! Fitness evaluation
//!
//! This module provides the Lennard-Jones energy used to score arrangements.

pub mod lennard_jones;

pub mod prelude {
    pub use super::lennard_jones::*;
}
