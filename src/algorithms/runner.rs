//! Island run orchestration
//!
//! [`IslandRunner`] drives one island through every iteration of a run:
//! fresh population, generation loop with periodic migration and stagnation
//! checks, then the cohort-wide global best selection. [`run_local`] starts a
//! whole cohort in-process, one thread per island.

use std::thread;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, instrument};

use crate::algorithms::breeder::{Breeder, EliteTracker};
use crate::config::{DerivedParams, RunConfig};
use crate::diagnostics::{IterationStats, RunSummary};
use crate::error::{EvoResult, EvolutionError};
use crate::island::convergence::ConvergenceMonitor;
use crate::island::global_best::{select_global_best, GlobalBest};
use crate::island::migration::MigrationCoordinator;
use crate::population::candidate::Candidate;
use crate::population::population::Subpopulation;
use crate::transport::local::LocalCluster;
use crate::transport::traits::{Communicator, COORDINATOR};

/// What one island knows at the end of an iteration
#[derive(Clone, Debug)]
pub struct IterationOutcome {
    /// Generations executed; the generation that triggered a stop is not counted
    pub generations: usize,
    /// Whether the stagnation check ended the loop
    pub converged: bool,
    /// Fittest member of this island's final subpopulation
    pub run_best: Candidate,
    /// Present on the coordinator only
    pub global_best: Option<GlobalBest>,
    /// Present on the coordinator only
    pub elapsed: Option<Duration>,
}

/// One island's view of a run
pub struct IslandRunner<C, R> {
    comm: C,
    rng: R,
    config: RunConfig,
    params: DerivedParams,
    breeder: Breeder,
    migration: MigrationCoordinator,
    convergence: ConvergenceMonitor,
    elite: EliteTracker,
}

impl<C: Communicator, R: Rng> IslandRunner<C, R> {
    /// Create a runner for the island behind `comm`
    ///
    /// Fails if the configuration is invalid or names a different island
    /// count than the communicator's cohort.
    pub fn new(comm: C, rng: R, config: &RunConfig) -> EvoResult<Self> {
        let params = config.derive()?;
        if config.islands != comm.size() {
            return Err(EvolutionError::Configuration(format!(
                "configured for {} islands but the cohort has {}",
                config.islands,
                comm.size()
            )));
        }

        Ok(Self {
            comm,
            rng,
            config: config.clone(),
            params,
            breeder: Breeder::new(),
            migration: MigrationCoordinator::from_params(&params),
            convergence: ConvergenceMonitor::from_params(&params),
            elite: EliteTracker::new(),
        })
    }

    /// Run every configured iteration
    ///
    /// Returns the per-iteration statistics on the coordinator and `None`
    /// elsewhere.
    pub fn run(mut self) -> EvoResult<Option<Vec<IterationStats>>> {
        if self.comm.is_coordinator() {
            info!(
                population_size = self.config.population_size,
                subpopulation_size = self.params.subpopulation_size,
                islands = self.comm.size(),
                "population split across islands"
            );
        }

        let mut history = Vec::with_capacity(self.config.iterations);
        for iteration in 0..self.config.iterations {
            let outcome = self.run_iteration(iteration)?;
            if let (Some(global), Some(elapsed)) = (outcome.global_best, outcome.elapsed) {
                history.push(IterationStats {
                    iteration,
                    generations: outcome.generations,
                    converged: outcome.converged,
                    elapsed_secs: elapsed.as_secs_f64(),
                    best_island: global.island,
                    best: global.candidate,
                });
            }
        }

        Ok(self.comm.is_coordinator().then_some(history))
    }

    /// Evolve a fresh subpopulation until the generation cap or a cohort-wide
    /// stagnation stop, then select the global best
    ///
    /// Collective: every island must run the same iteration together.
    #[instrument(skip(self), fields(rank = self.comm.rank()))]
    pub fn run_iteration(&mut self, iteration: usize) -> EvoResult<IterationOutcome> {
        let coordinator = self.comm.is_coordinator();
        if coordinator {
            info!("========={}", iteration);
        }
        info!("initializing population");

        let mut population = Subpopulation::random(
            self.params.subpopulation_size,
            self.config.num_particles,
            self.config.bounds(),
            &mut self.rng,
        );
        self.elite.reset();
        self.migration.reset();
        self.convergence.reset();

        let started = Instant::now();
        let mut generation = 0;
        let mut converged = false;

        while generation < self.params.max_generations {
            if self.migration.is_due(generation) {
                self.migration.migrate(&mut self.comm, &mut population)?;
            }

            let outcome = self
                .breeder
                .breed(&mut population, &mut self.elite, &mut self.rng)?;
            self.convergence.record(outcome.best_index);

            if self.convergence.is_check_due(generation) {
                let verdict = self.convergence.check(&mut self.comm)?;
                if verdict.stop {
                    if coordinator {
                        info!(
                            "STOPPING: Average tolerance ({:.6}) is larger than max ({})",
                            verdict.average_tolerance, self.params.max_tolerance
                        );
                    }
                    converged = true;
                    break;
                }
            }

            generation += 1;
        }

        let run_best = population
            .best()
            .cloned()
            .ok_or(EvolutionError::EmptyPopulation)?;
        self.report_in_rank_order(generation, &run_best)?;

        let global_best = select_global_best(&mut self.comm, &run_best)?;
        let elapsed = coordinator.then(|| started.elapsed());

        if let (Some(best), Some(elapsed)) = (&global_best, elapsed) {
            info!(
                island = best.island,
                generations = generation,
                fitness = best.candidate.fitness(),
                "best fitness found on island {}",
                best.island
            );
            info!("solution: {}", best.candidate);
            info!("time taken: {:.6}", elapsed.as_secs_f64());
        }

        Ok(IterationOutcome {
            generations: generation,
            converged,
            run_best,
            global_best,
            elapsed,
        })
    }

    /// Log each island's result, one island at a time in rank order
    fn report_in_rank_order(&mut self, generations: usize, run_best: &Candidate) -> EvoResult<()> {
        self.comm.barrier()?;
        for current in 0..self.comm.size() {
            if current == self.comm.rank() {
                info!(generations, fitness = run_best.fitness(), "best solution: {}", run_best);
            }
            self.comm.barrier()?;
        }
        Ok(())
    }
}

/// Run a whole cohort in this process, one thread per island
///
/// A master generator seeded from the configured base seed, or from entropy
/// when none is set, draws one generator seed per island.
pub fn run_local(config: &RunConfig) -> EvoResult<RunSummary> {
    config.validate()?;
    let seed = config.seed.unwrap_or_else(rand::random);

    info!(
        particles = config.num_particles,
        population = config.population_size,
        width = config.width,
        height = config.height,
        iterations = config.iterations,
        islands = config.islands,
        seed,
        "starting optimization"
    );

    let mut master = StdRng::seed_from_u64(seed);
    let island_seeds: Vec<[u8; 32]> = (0..config.islands).map(|_| master.gen()).collect();

    let results = LocalCluster::run(config.islands, |comm| {
        let rng = StdRng::from_seed(island_seeds[comm.rank()]);
        IslandRunner::new(comm, rng, config)?.run()
    });

    let mut summary = RunSummary::new(config.clone(), seed);
    for stats in coordinator_history(results)? {
        summary.record(stats);
    }
    Ok(summary)
}

/// Pull the coordinator's statistics out of the per-island results
///
/// The first panicked or failed island, in rank order, fails the run.
fn coordinator_history(
    results: Vec<thread::Result<EvoResult<Option<Vec<IterationStats>>>>>,
) -> EvoResult<Vec<IterationStats>> {
    let mut history = None;
    for (rank, result) in results.into_iter().enumerate() {
        let result = result.map_err(|_| EvolutionError::IslandPanicked { rank })?;
        if let Some(stats) = result? {
            history = Some(stats);
        }
    }
    history.ok_or(EvolutionError::MissingResults { rank: COORDINATOR })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> RunConfig {
        RunConfig::default()
            .with_population_size(12)
            .with_islands(2)
            .with_particles(4)
            .with_box(6, 6)
            .with_iterations(2)
            .with_max_generations(100)
            .with_seed(11)
    }

    #[test]
    fn test_single_island_runner() {
        let config = small_config().with_islands(1).with_iterations(1);
        let comm = LocalCluster::communicators(1).remove(0);
        let rng = StdRng::seed_from_u64(5);

        let history = IslandRunner::new(comm, rng, &config)
            .unwrap()
            .run()
            .unwrap()
            .unwrap();

        assert_eq!(history.len(), 1);
        let stats = &history[0];
        assert_eq!(stats.best_island, 0);
        assert!(stats.generations <= 100);
        assert_eq!(stats.best.len(), 4);
        assert!(stats.best.positions().iter().all(|p| config.bounds().contains(*p)));
    }

    #[test]
    fn test_island_count_must_match_cohort() {
        let config = small_config().with_islands(3);
        let comm = LocalCluster::communicators(2).remove(0);
        let result = IslandRunner::new(comm, StdRng::seed_from_u64(0), &config);
        assert!(matches!(result, Err(EvolutionError::Configuration(_))));
    }

    #[test]
    fn test_run_local_reports_every_iteration() {
        let summary = run_local(&small_config()).unwrap();
        assert_eq!(summary.seed, 11);
        assert_eq!(summary.iterations.len(), 2);
        for (i, stats) in summary.iterations.iter().enumerate() {
            assert_eq!(stats.iteration, i);
            assert!(stats.best_island < 2);
            assert!(stats.generations <= 100);
        }
    }

    #[test]
    fn test_run_local_is_reproducible_with_seed() {
        let first = run_local(&small_config()).unwrap();
        let second = run_local(&small_config()).unwrap();
        let bests = |s: &RunSummary| -> Vec<Candidate> {
            s.iterations.iter().map(|i| i.best.clone()).collect()
        };
        assert_eq!(bests(&first), bests(&second));
    }

    #[test]
    fn test_missing_coordinator_history_is_not_a_panic() {
        let results: Vec<thread::Result<EvoResult<Option<Vec<IterationStats>>>>> =
            vec![Ok(Ok(None)), Ok(Ok(None))];
        assert!(matches!(
            coordinator_history(results),
            Err(EvolutionError::MissingResults { rank: 0 })
        ));
    }

    #[test]
    fn test_panicked_island_is_reported_by_rank() {
        let panic: Box<dyn std::any::Any + Send> = Box::new("boom");
        let results: Vec<thread::Result<EvoResult<Option<Vec<IterationStats>>>>> =
            vec![Ok(Ok(Some(Vec::new()))), Err(panic)];
        assert!(matches!(
            coordinator_history(results),
            Err(EvolutionError::IslandPanicked { rank: 1 })
        ));
    }

    #[test]
    fn test_coordinator_history_is_returned() {
        let results: Vec<thread::Result<EvoResult<Option<Vec<IterationStats>>>>> =
            vec![Ok(Ok(Some(Vec::new()))), Ok(Ok(None))];
        assert!(coordinator_history(results).unwrap().is_empty());
    }

    #[test]
    fn test_run_local_rejects_invalid_config() {
        let result = run_local(&small_config().with_particles(2));
        assert!(matches!(result, Err(EvolutionError::Configuration(_))));
    }
}
