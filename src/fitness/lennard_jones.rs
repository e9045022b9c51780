//! Reduced Lennard-Jones energy
//!
//! Scores an arrangement by summing `(2/r)^12 - (2/r)^6` over every unordered
//! pair of particles. Higher is fitter.

use crate::genome::position::Position;

/// Length scale of the reduced potential
pub const LENGTH_SCALE: f64 = 2.0;

/// Pair term for two particles `r` apart
///
/// `r` must be non-zero.
#[inline]
pub fn pair_term(r: f64) -> f64 {
    let t = LENGTH_SCALE / r;
    t.powi(12) - t.powi(6)
}

/// Fitness of an arrangement
///
/// Any pair of coincident particles forces the whole fitness to exactly `0.0`
/// and stops the evaluation. Cost is quadratic in the particle count.
pub fn calc_fitness(positions: &[Position]) -> f64 {
    let mut fitness = 0.0;
    for (i, a) in positions.iter().enumerate() {
        for b in &positions[i + 1..] {
            let r = a.distance(b);
            if r == 0.0 {
                return 0.0;
            }
            fitness += pair_term(r);
        }
    }
    fitness
}
