//! Subpopulation type
//!
//! This module provides the fixed-capacity container one island evolves.

use std::ops::{Index, IndexMut};

use rand::Rng;

use crate::genome::bounds::BoxBounds;
use crate::population::candidate::Candidate;

/// The candidates owned by one island
///
/// Capacity is fixed once the subpopulation is initialised; generations are
/// replaced in place.
#[derive(Clone, Debug)]
pub struct Subpopulation {
    candidates: Vec<Candidate>,
    num_particles: usize,
    bounds: BoxBounds,
}

impl Subpopulation {
    /// Create a random subpopulation of `size` candidates
    pub fn random<R: Rng>(
        size: usize,
        num_particles: usize,
        bounds: BoxBounds,
        rng: &mut R,
    ) -> Self {
        let candidates = (0..size)
            .map(|_| Candidate::random(num_particles, &bounds, rng))
            .collect();
        Self {
            candidates,
            num_particles,
            bounds,
        }
    }

    /// Create a subpopulation from existing candidates
    ///
    /// # Panics
    /// Panics if the candidates do not all have `num_particles` positions
    pub fn from_candidates(candidates: Vec<Candidate>, bounds: BoxBounds) -> Self {
        let num_particles = candidates.first().map_or(0, Candidate::len);
        assert!(
            candidates.iter().all(|c| c.len() == num_particles),
            "All candidates must have the same number of particles"
        );
        Self {
            candidates,
            num_particles,
            bounds,
        }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn num_particles(&self) -> usize {
        self.num_particles
    }

    pub fn bounds(&self) -> &BoxBounds {
        &self.bounds
    }

    pub fn get(&self, index: usize) -> Option<&Candidate> {
        self.candidates.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter()
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Deep copy `source` into slot `index`
    pub fn copy_into(&mut self, index: usize, source: &Candidate) {
        self.candidates[index].copy_from(source);
    }

    /// The first `count` candidates, used as the migration exchange set
    pub fn front(&self, count: usize) -> &[Candidate] {
        &self.candidates[..count]
    }

    pub fn front_mut(&mut self, count: usize) -> &mut [Candidate] {
        &mut self.candidates[..count]
    }

    /// Index of the fittest candidate; the first one wins ties
    pub fn best_index(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, c) in self.candidates.iter().enumerate() {
            match best {
                Some(b) if !c.is_better_than(&self.candidates[b]) => {}
                _ => best = Some(i),
            }
        }
        best
    }

    /// Index of the weakest candidate; the first one wins ties
    pub fn worst_index(&self) -> Option<usize> {
        let mut worst: Option<usize> = None;
        for (i, c) in self.candidates.iter().enumerate() {
            match worst {
                Some(w) if c.fitness() >= self.candidates[w].fitness() => {}
                _ => worst = Some(i),
            }
        }
        worst
    }

    pub fn best(&self) -> Option<&Candidate> {
        self.best_index().map(|i| &self.candidates[i])
    }

    /// Swap in a whole new generation
    ///
    /// # Panics
    /// Panics if the generation size differs from the current capacity
    pub(crate) fn replace(&mut self, next: Vec<Candidate>) {
        assert_eq!(
            next.len(),
            self.candidates.len(),
            "Generation size must not change"
        );
        self.candidates = next;
    }
}

impl Index<usize> for Subpopulation {
    type Output = Candidate;

    fn index(&self, index: usize) -> &Self::Output {
        &self.candidates[index]
    }
}

impl IndexMut<usize> for Subpopulation {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.candidates[index]
    }
}
