//! Cohort-wide stagnation check
//!
//! Each island counts generations without an improvement signal; at fixed
//! intervals the counts are summed across islands and every island applies
//! the same threshold to the same total, so all stop together.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::DerivedParams;
use crate::error::EvoResult;
use crate::transport::traits::Communicator;

/// Outcome of one distributed stagnation check
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceVerdict {
    /// Sum of every island's tolerance counter
    pub total_tolerance: u64,
    /// `total_tolerance / island_count`
    pub average_tolerance: f64,
    /// Whether the cohort stops this iteration
    pub stop: bool,
}

/// Per-island stagnation tracker
#[derive(Clone, Debug)]
pub struct ConvergenceMonitor {
    check_freq: usize,
    max_tolerance: usize,
    current_tolerance: u64,
    high_water: usize,
}

impl ConvergenceMonitor {
    pub fn new(check_freq: usize, max_tolerance: usize) -> Self {
        assert!(check_freq > 0, "Check frequency must be positive");
        Self {
            check_freq,
            max_tolerance,
            current_tolerance: 0,
            high_water: 0,
        }
    }

    pub fn from_params(params: &DerivedParams) -> Self {
        Self::new(params.tolerance_check_freq, params.max_tolerance)
    }

    /// Record the best index reported by the breeder
    ///
    /// Only an index above the running high-water mark counts as improvement.
    pub fn record(&mut self, best_index: usize) {
        if best_index > self.high_water {
            self.high_water = best_index;
            self.current_tolerance = 0;
        } else {
            self.current_tolerance += 1;
        }
    }

    /// Whether the cohort checks stagnation after breeding `generation`
    pub fn is_check_due(&self, generation: usize) -> bool {
        generation != 0 && generation % self.check_freq == 0
    }

    pub fn current_tolerance(&self) -> u64 {
        self.current_tolerance
    }

    pub fn high_water(&self) -> usize {
        self.high_water
    }

    pub fn max_tolerance(&self) -> usize {
        self.max_tolerance
    }

    pub fn reset(&mut self) {
        self.current_tolerance = 0;
        self.high_water = 0;
    }

    /// Sum the tolerance counters across the cohort and decide whether to stop
    ///
    /// Collective: every island must call this at the same generation.
    pub fn check<C: Communicator>(&self, comm: &mut C) -> EvoResult<ConvergenceVerdict> {
        let total_tolerance = comm.all_reduce_sum(self.current_tolerance)?;
        let average_tolerance = total_tolerance as f64 / comm.size() as f64;
        let stop = average_tolerance > self.max_tolerance as f64;

        debug!(
            rank = comm.rank(),
            local = self.current_tolerance,
            total_tolerance,
            average_tolerance,
            stop,
            "tolerance check"
        );

        Ok(ConvergenceVerdict {
            total_tolerance,
            average_tolerance,
            stop,
        })
    }
}
