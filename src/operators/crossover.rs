//! Crossover operators
//!
//! This module provides single-point crossover over particle chromosomes.

use rand::Rng;

use crate::error::OperatorError;
use crate::population::candidate::Candidate;

/// Single-point crossover with boundary-gene mixing
///
/// The split point is strictly interior. After copying the head from the
/// first parent, a coin flip may overwrite the y coordinate of the last head
/// gene with the second parent's y at that index, mixing inside a particle.
#[derive(Clone, Debug)]
pub struct SinglePointCrossover {
    /// Probability of the boundary-gene y overwrite
    pub boundary_mix_probability: f64,
}

impl SinglePointCrossover {
    /// Create a new single-point crossover with a fair boundary coin
    pub fn new() -> Self {
        Self {
            boundary_mix_probability: 0.5,
        }
    }

    /// Draw a split point in `1..len - 1`
    pub fn split_point<R: Rng>(&self, len: usize, rng: &mut R) -> Result<usize, OperatorError> {
        if len < 3 {
            return Err(OperatorError::CrossoverFailed(format!(
                "chromosome of {} genes has no interior split point",
                len
            )));
        }
        loop {
            let split = rng.gen_range(0..len);
            if split != 0 && split != len - 1 {
                return Ok(split);
            }
        }
    }

    /// Build one child: genes `[0, split)` from `head`, `[split, n)` from `tail`
    ///
    /// # Panics
    /// Panics if `split` is zero or past the end of the chromosome
    pub fn child<R: Rng>(
        &self,
        head: &Candidate,
        tail: &Candidate,
        split: usize,
        rng: &mut R,
    ) -> Candidate {
        let n = head.len();
        assert!(split >= 1 && split <= n, "Split point out of range");

        let mut positions = Vec::with_capacity(n);
        positions.extend_from_slice(&head.positions()[..split]);

        let boundary = split - 1;
        if rng.gen_bool(self.boundary_mix_probability) {
            positions[boundary].y = tail.positions()[boundary].y;
        }

        positions.extend_from_slice(&tail.positions()[split..]);
        Candidate::new(positions)
    }

    /// Cross two parents at a random interior split, producing mirrored children
    pub fn crossover<R: Rng>(
        &self,
        parent_one: &Candidate,
        parent_two: &Candidate,
        rng: &mut R,
    ) -> Result<(Candidate, Candidate), OperatorError> {
        if parent_one.len() != parent_two.len() {
            return Err(OperatorError::CrossoverFailed(
                "Parent dimensions do not match".to_string(),
            ));
        }

        let split = self.split_point(parent_one.len(), rng)?;
        let first = self.child(parent_one, parent_two, split, rng);
        let second = self.child(parent_two, parent_one, split, rng);
        Ok((first, second))
    }
}

impl Default for SinglePointCrossover {
    fn default() -> Self {
        Self::new()
    }
}
