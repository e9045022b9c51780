//! Selection operators
//!
//! This module provides binary tournament ("joust") parent selection.

use rand::Rng;

use crate::error::OperatorError;
use crate::population::candidate::Candidate;

/// Binary tournament selection
///
/// Each tournament draws two distinct indices and keeps the strictly fitter
/// one; on equal fitness the second draw wins.
#[derive(Clone, Debug, Default)]
pub struct JoustSelection;

impl JoustSelection {
    /// Create a new joust selection
    pub fn new() -> Self {
        Self
    }

    /// Run one tournament and return the winner's index
    ///
    /// # Panics
    /// Panics if fewer than two candidates are given
    pub fn joust<R: Rng>(&self, candidates: &[Candidate], rng: &mut R) -> usize {
        let n = candidates.len();
        assert!(n >= 2, "A joust needs at least two candidates");

        let one = rng.gen_range(0..n);
        let two = loop {
            let two = rng.gen_range(0..n);
            if two != one {
                break two;
            }
        };

        if candidates[one].fitness() > candidates[two].fitness() {
            one
        } else {
            two
        }
    }

    /// Pick a breeding pair with two tournaments
    ///
    /// If both tournaments produce the same winner, all four draws are redone.
    /// With exactly two candidates the only distinct pairing is `{0, 1}`, so
    /// it is returned directly in random order.
    pub fn select_parents<R: Rng>(
        &self,
        candidates: &[Candidate],
        rng: &mut R,
    ) -> Result<(usize, usize), OperatorError> {
        match candidates.len() {
            0 | 1 => Err(OperatorError::SelectionFailed(format!(
                "need at least two candidates, got {}",
                candidates.len()
            ))),
            2 => Ok(if rng.gen_bool(0.5) { (0, 1) } else { (1, 0) }),
            _ => loop {
                let parent_one = self.joust(candidates, rng);
                let parent_two = self.joust(candidates, rng);
                if parent_one != parent_two {
                    return Ok((parent_one, parent_two));
                }
            },
        }
    }
}
