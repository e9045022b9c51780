//! particle-evo CLI: runs the island GA and writes the solution and results files
//!
//! Positional arguments follow the order `population width height particles
//! iterations`; each may be omitted from the right.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use particle_evo::algorithms::runner::run_local;
use particle_evo::config::{RunConfig, MAX_GEN};
use particle_evo::error::EvoResult;
use particle_evo::output::{solution_file_name, ResultsLog, SolutionWriter, RESULTS_FILE};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Island-model GA for low-energy 2D Lennard-Jones particle arrangements"
)]
struct Args {
    /// Total population, split evenly across islands
    #[arg(default_value_t = 300)]
    population: usize,

    /// Largest x coordinate of the box
    #[arg(default_value_t = 20)]
    width: i32,

    /// Largest y coordinate of the box
    #[arg(default_value_t = 20)]
    height: i32,

    /// Particles per arrangement
    #[arg(default_value_t = 30)]
    particles: usize,

    /// Independent restarts
    #[arg(default_value_t = 10)]
    iterations: usize,

    /// Number of islands (one thread each)
    #[arg(short, long, default_value_t = 4)]
    islands: usize,

    /// Generation cap per iteration
    #[arg(long, default_value_t = MAX_GEN)]
    max_generations: usize,

    /// Base seed for the island generators (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Directory for the solution and results files
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Print the run summary as JSON on stdout
    #[arg(long, default_value_t = false)]
    json: bool,
}

impl Args {
    fn config(&self) -> RunConfig {
        let config = RunConfig::default()
            .with_population_size(self.population)
            .with_box(self.width, self.height)
            .with_particles(self.particles)
            .with_iterations(self.iterations)
            .with_islands(self.islands)
            .with_max_generations(self.max_generations);
        match self.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        }
    }
}

fn run(args: &Args) -> EvoResult<()> {
    let config = args.config();
    config.validate()?;

    let solution_path = args.output_dir.join(solution_file_name(&config));
    let results_path = args.output_dir.join(RESULTS_FILE);
    // Open both files before evolving so an unwritable directory fails fast
    let mut solution = SolutionWriter::create(&solution_path, &config.bounds())?;
    let mut results = ResultsLog::append(&results_path)?;
    info!(path = %solution_path.display(), "writing dimensions to file");

    let summary = run_local(&config)?;

    solution.write_summary(&summary)?;
    solution.flush()?;
    results.write_run(&config.run_label(env!("CARGO_BIN_NAME")), &summary)?;

    info!(
        average_fitness = summary.average_fitness(),
        average_generations = summary.average_generations(),
        average_time = summary.average_time(),
        "run complete"
    );
    if let Some(best) = summary.best_iteration() {
        info!(
            iteration = best.iteration,
            island = best.best_island,
            fitness = best.best_fitness(),
            "best arrangement of the run: {}",
            best.best
        );
    }

    if args.json {
        let json = serde_json::to_string_pretty(&summary)
            .map_err(std::io::Error::from)?;
        println!("{}", json);
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "run failed");
            ExitCode::FAILURE
        }
    }
}
