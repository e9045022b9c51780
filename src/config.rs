//! Run configuration
//!
//! Parameters supplied by the caller plus the constants derived from them.
//! Invalid combinations are rejected before any island starts.

use serde::{Deserialize, Serialize};

use crate::error::{EvoResult, EvolutionError};
use crate::genome::bounds::BoxBounds;

/// Default maximum number of generations per iteration
pub const MAX_GEN: usize = 1000;

/// Parameters for a whole run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Total population, split evenly across islands
    pub population_size: usize,
    /// Largest x coordinate of the box
    pub width: i32,
    /// Largest y coordinate of the box
    pub height: i32,
    /// Particles per candidate
    pub num_particles: usize,
    /// Independent restarts
    pub iterations: usize,
    /// Number of islands
    pub islands: usize,
    /// Generation cap per iteration
    pub max_generations: usize,
    /// Base seed; drawn from entropy when absent
    pub seed: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            population_size: 300,
            width: 20,
            height: 20,
            num_particles: 30,
            iterations: 10,
            islands: 4,
            max_generations: MAX_GEN,
            seed: None,
        }
    }
}

impl RunConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    pub fn with_box(mut self, width: i32, height: i32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_particles(mut self, n: usize) -> Self {
        self.num_particles = n;
        self
    }

    pub fn with_iterations(mut self, n: usize) -> Self {
        self.iterations = n;
        self
    }

    pub fn with_islands(mut self, n: usize) -> Self {
        self.islands = n;
        self
    }

    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn bounds(&self) -> BoxBounds {
        BoxBounds::new(self.width, self.height)
    }

    /// Check every parameter the derived constants and operators depend on
    pub fn validate(&self) -> EvoResult<()> {
        let fail = |msg: String| Err(EvolutionError::Configuration(msg));

        if self.islands == 0 {
            return fail("island count must be at least 1".to_string());
        }
        if self.population_size == 0 {
            return fail("population size must be at least 1".to_string());
        }
        if self.iterations == 0 {
            return fail("iteration count must be at least 1".to_string());
        }
        if self.num_particles < 3 {
            return fail(format!(
                "need at least 3 particles for an interior crossover point, got {}",
                self.num_particles
            ));
        }
        if self.width < 0 || self.height < 0 {
            return fail(format!(
                "box dimensions must be non-negative, got {}x{}",
                self.width, self.height
            ));
        }
        let subpopulation = self.population_size / self.islands;
        if subpopulation < 2 {
            return fail(format!(
                "population {} over {} islands leaves {} per island, need at least 2",
                self.population_size, self.islands, subpopulation
            ));
        }
        if self.max_generations < 100 {
            return fail(format!(
                "max generations must be at least 100 for a non-zero exchange frequency, got {}",
                self.max_generations
            ));
        }
        Ok(())
    }

    /// Validate and compute the derived constants
    pub fn derive(&self) -> EvoResult<DerivedParams> {
        self.validate()?;
        Ok(DerivedParams::from_config(self))
    }

    /// Label identifying this run in the results log
    pub fn run_label(&self, program: &str) -> String {
        format!(
            "{}_{}_{}_{}_{}_{}",
            program, self.population_size, self.width, self.height, self.num_particles, self.iterations
        )
    }
}

/// Constants derived from a validated [`RunConfig`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedParams {
    /// Candidates per island
    pub subpopulation_size: usize,
    /// Candidates swapped per migration event
    pub exchange_amount: usize,
    /// Generations between migrations
    pub exchange_freq: usize,
    /// Generations between stagnation checks
    pub tolerance_check_freq: usize,
    /// Average stagnation above which every island stops
    pub max_tolerance: usize,
    /// Generation cap per iteration
    pub max_generations: usize,
}

impl DerivedParams {
    fn from_config(config: &RunConfig) -> Self {
        let subpopulation_size = config.population_size / config.islands;
        let exchange_freq = config.max_generations / 100;
        Self {
            subpopulation_size,
            exchange_amount: subpopulation_size / 10,
            exchange_freq,
            tolerance_check_freq: 5 * exchange_freq,
            max_tolerance: 3 * config.max_generations / 10,
            max_generations: config.max_generations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_derived_params() {
        let derived = RunConfig::default().derive().unwrap();
        assert_eq!(derived.subpopulation_size, 75);
        assert_eq!(derived.exchange_amount, 7);
        assert_eq!(derived.exchange_freq, 10);
        assert_eq!(derived.tolerance_check_freq, 50);
        assert_eq!(derived.max_tolerance, 300);
        assert_eq!(derived.max_generations, 1000);
    }

    #[test]
    fn test_remainder_is_dropped() {
        let derived = RunConfig::default()
            .with_population_size(103)
            .with_islands(5)
            .derive()
            .unwrap();
        assert_eq!(derived.subpopulation_size, 20);
        assert_eq!(derived.exchange_amount, 2);
    }

    #[test]
    fn test_small_subpopulation_has_no_exchange() {
        let derived = RunConfig::default()
            .with_population_size(16)
            .with_islands(2)
            .derive()
            .unwrap();
        assert_eq!(derived.exchange_amount, 0);
    }

    #[test]
    fn test_zero_islands_rejected() {
        let err = RunConfig::default().with_islands(0).validate().unwrap_err();
        assert!(matches!(err, EvolutionError::Configuration(_)));
    }

    #[test]
    fn test_invalid_configs_rejected() {
        let bad = [
            RunConfig::default().with_population_size(0),
            RunConfig::default().with_particles(0),
            RunConfig::default().with_particles(2),
            RunConfig::default().with_iterations(0),
            RunConfig::default().with_box(-1, 5),
            RunConfig::default().with_population_size(7).with_islands(4),
            RunConfig::default().with_max_generations(99),
        ];
        for config in bad {
            assert!(config.derive().is_err(), "{:?} should be rejected", config);
        }
    }

    #[test]
    fn test_run_label() {
        let config = RunConfig::default();
        assert_eq!(config.run_label("particle-evo"), "particle-evo_300_20_20_30_10");
    }
}
