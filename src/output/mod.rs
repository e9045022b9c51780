//! Run output files
//!
//! This module provides the text writers for the solution record and the
//! appended results log, and the file names the coordinator uses for them.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::config::RunConfig;
use crate::diagnostics::RunSummary;
use crate::error::EvoResult;
use crate::genome::bounds::BoxBounds;
use crate::population::candidate::Candidate;

/// Results log shared by every run, appended to
pub const RESULTS_FILE: &str = "results_ompi.txt";

/// Solution file name for a run with `config`
pub fn solution_file_name(config: &RunConfig) -> String {
    format!(
        "solution_ompi_{}_{}_{}_{}_{}.txt",
        config.population_size, config.width, config.height, config.num_particles, config.iterations
    )
}

/// Writes the box dimensions followed by one arrangement per line
///
/// ```text
/// 20,20
/// 3,4	0,17	12,9
/// ```
pub struct SolutionWriter<W: Write> {
    out: W,
}

impl SolutionWriter<BufWriter<File>> {
    /// Create (truncating) the solution file at `path`
    pub fn create(path: impl AsRef<Path>, bounds: &BoxBounds) -> EvoResult<Self> {
        let file = File::create(path)?;
        Self::new(BufWriter::new(file), bounds)
    }
}

impl<W: Write> SolutionWriter<W> {
    /// Wrap `out` and write the `width,height` header line
    pub fn new(mut out: W, bounds: &BoxBounds) -> EvoResult<Self> {
        writeln!(out, "{},{}", bounds.x_max, bounds.y_max)?;
        Ok(Self { out })
    }

    /// Write one arrangement as tab-separated `x,y` pairs
    pub fn write_candidate(&mut self, candidate: &Candidate) -> EvoResult<()> {
        let mut positions = candidate.positions().iter();
        if let Some(first) = positions.next() {
            write!(self.out, "{}", first)?;
            for position in positions {
                write!(self.out, "\t{}", position)?;
            }
        }
        writeln!(self.out)?;
        Ok(())
    }

    /// Write the global best of every iteration in order
    pub fn write_summary(&mut self, summary: &RunSummary) -> EvoResult<()> {
        for stats in &summary.iterations {
            self.write_candidate(&stats.best)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> EvoResult<()> {
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Appends a run's label, per-iteration fitness and averages to a log
pub struct ResultsLog<W: Write> {
    out: W,
}

impl ResultsLog<BufWriter<File>> {
    /// Open `path` for appending, creating it if needed
    pub fn append(path: impl AsRef<Path>) -> EvoResult<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> ResultsLog<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn write_label(&mut self, label: &str) -> EvoResult<()> {
        writeln!(self.out, "{}", label)?;
        Ok(())
    }

    pub fn write_fitness(&mut self, fitness: f64) -> EvoResult<()> {
        writeln!(self.out, "{:.6}", fitness)?;
        Ok(())
    }

    pub fn write_averages(&mut self, summary: &RunSummary) -> EvoResult<()> {
        writeln!(self.out, "Average fitness: {:.6}", summary.average_fitness())?;
        writeln!(self.out, "Average generations: {:.6}", summary.average_generations())?;
        writeln!(
            self.out,
            "Average time spent per iteration: {:.6}",
            summary.average_time()
        )?;
        writeln!(self.out, "---------")?;
        Ok(())
    }

    /// Write a complete run entry: label, one fitness per iteration, averages
    pub fn write_run(&mut self, label: &str, summary: &RunSummary) -> EvoResult<()> {
        self.write_label(label)?;
        for stats in &summary.iterations {
            self.write_fitness(stats.best_fitness())?;
        }
        self.write_averages(summary)?;
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::IterationStats;
    use crate::genome::position::Position;
    use std::io::Read;

    fn summary() -> RunSummary {
        let mut summary = RunSummary::new(RunConfig::default(), 1);
        for (i, spread) in [3, 5].into_iter().enumerate() {
            summary.record(IterationStats {
                iteration: i,
                generations: 100 * (i + 1),
                converged: false,
                elapsed_secs: 0.5,
                best_island: 0,
                best: Candidate::new(vec![
                    Position::new(0, 0),
                    Position::new(spread, 0),
                    Position::new(0, spread),
                ]),
            });
        }
        summary
    }

    #[test]
    fn test_solution_file_name() {
        assert_eq!(
            solution_file_name(&RunConfig::default()),
            "solution_ompi_300_20_20_30_10.txt"
        );
    }

    #[test]
    fn test_solution_format_has_no_trailing_tab() {
        let mut writer = SolutionWriter::new(Vec::new(), &BoxBounds::new(20, 10)).unwrap();
        writer.write_summary(&summary()).unwrap();
        let text = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(text, "20,10\n0,0\t3,0\t0,3\n0,0\t5,0\t0,5\n");
    }

    #[test]
    fn test_results_log_entry() {
        let summary = summary();
        let mut log = ResultsLog::new(Vec::new());
        log.write_run("particle-evo_300_20_20_30_10", &summary).unwrap();
        let text = String::from_utf8(log.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "particle-evo_300_20_20_30_10");
        assert_eq!(lines[1], format!("{:.6}", summary.iterations[0].best_fitness()));
        assert_eq!(lines[4], "Average generations: 150.000000");
        assert_eq!(lines[5], "Average time spent per iteration: 0.500000");
        assert_eq!(lines[6], "---------");
    }

    #[test]
    fn test_results_log_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(RESULTS_FILE);

        for label in ["first", "second"] {
            let mut log = ResultsLog::append(&path).unwrap();
            log.write_run(label, &summary()).unwrap();
        }

        let mut text = String::new();
        File::open(&path).unwrap().read_to_string(&mut text).unwrap();
        assert_eq!(text.matches("---------").count(), 2);
        assert!(text.starts_with("first\n"));
        assert!(text.contains("\nsecond\n"));
    }

    #[test]
    fn test_solution_writer_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(solution_file_name(&RunConfig::default()));

        let mut writer = SolutionWriter::create(&path, &BoxBounds::new(20, 20)).unwrap();
        writer.write_summary(&summary()).unwrap();
        writer.flush().unwrap();
        drop(writer);

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert_eq!(text.lines().next(), Some("20,20"));
    }
}
