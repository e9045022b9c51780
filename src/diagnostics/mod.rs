//! Diagnostics and statistics
//!
//! This module provides the per-iteration records and run-wide averages the
//! coordinator reports at the end of a run.

use serde::{Deserialize, Serialize};

use crate::config::RunConfig;
use crate::population::candidate::Candidate;

/// Statistics for one iteration, recorded by the coordinator
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IterationStats {
    /// Iteration number, starting at 0
    pub iteration: usize,
    /// Generations executed before the loop ended
    pub generations: usize,
    /// Whether the stagnation check ended the loop early
    pub converged: bool,
    /// Wall time from loop start to global best selection (seconds)
    pub elapsed_secs: f64,
    /// Rank of the island holding the global best
    pub best_island: usize,
    /// The global best candidate
    pub best: Candidate,
}

impl IterationStats {
    pub fn best_fitness(&self) -> f64 {
        self.best.fitness()
    }
}

/// Everything the coordinator learned during a run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub config: RunConfig,
    /// Base seed the island generators were derived from
    pub seed: u64,
    pub iterations: Vec<IterationStats>,
}

impl RunSummary {
    pub fn new(config: RunConfig, seed: u64) -> Self {
        Self {
            config,
            seed,
            iterations: Vec::new(),
        }
    }

    pub fn record(&mut self, stats: IterationStats) {
        self.iterations.push(stats);
    }

    /// Mean global best fitness over iterations
    pub fn average_fitness(&self) -> f64 {
        self.mean(IterationStats::best_fitness)
    }

    /// Mean generation count over iterations
    pub fn average_generations(&self) -> f64 {
        self.mean(|s| s.generations as f64)
    }

    /// Mean wall time per iteration in seconds
    pub fn average_time(&self) -> f64 {
        self.mean(|s| s.elapsed_secs)
    }

    /// Iteration with the highest global best fitness
    pub fn best_iteration(&self) -> Option<&IterationStats> {
        self.iterations.iter().fold(None, |best, s| match best {
            Some(b) if b.best_fitness() >= s.best_fitness() => Some(b),
            _ => Some(s),
        })
    }

    fn mean(&self, f: impl Fn(&IterationStats) -> f64) -> f64 {
        if self.iterations.is_empty() {
            return 0.0;
        }
        self.iterations.iter().map(f).sum::<f64>() / self.iterations.len() as f64
    }
}

pub mod prelude {
    pub use super::{IterationStats, RunSummary};
}
