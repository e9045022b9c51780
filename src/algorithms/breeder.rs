//! Generational breeding step
//!
//! Produces a complete replacement generation from the current one: joust
//! selection, single-point crossover, relocation mutation and elitist
//! replacement of the weakest child.

use rand::Rng;

use crate::error::OperatorError;
use crate::operators::crossover::SinglePointCrossover;
use crate::operators::mutation::RelocationMutation;
use crate::operators::selection::JoustSelection;
use crate::population::candidate::Candidate;
use crate::population::population::Subpopulation;

/// Best candidate seen by an island during the current iteration
///
/// Threaded through every [`Breeder::breed`] call and reset when the
/// iteration restarts. Its fitness never decreases.
#[derive(Clone, Debug, Default)]
pub struct EliteTracker {
    best: Option<Candidate>,
}

impl EliteTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn best(&self) -> Option<&Candidate> {
        self.best.as_ref()
    }

    pub fn best_fitness(&self) -> Option<f64> {
        self.best.as_ref().map(Candidate::fitness)
    }

    /// Fold a generation of parents into the tracked best
    ///
    /// Only a strictly fitter candidate replaces the current one.
    pub fn observe(&mut self, parents: &[Candidate]) {
        for candidate in parents {
            match &mut self.best {
                None => self.best = Some(candidate.clone()),
                Some(best) if candidate.is_better_than(best) => best.copy_from(candidate),
                _ => {}
            }
        }
    }

    pub fn reset(&mut self) {
        self.best = None;
    }
}

/// Result of one breeding step
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BreedOutcome {
    /// Index of the fittest member of the new generation
    pub best_index: usize,
    /// Fitness of that member
    pub best_fitness: f64,
    /// Whether the elite overwrote the weakest child
    pub elite_restored: bool,
}

/// The generational GA step
#[derive(Clone, Debug, Default)]
pub struct Breeder {
    pub selection: JoustSelection,
    pub crossover: SinglePointCrossover,
    pub mutation: RelocationMutation,
}

impl Breeder {
    /// Create a breeder with the default operators
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace `population` with its next generation
    ///
    /// Offspring are produced in pairs; with an odd size the second child of
    /// the last pair is dropped. If the elite is strictly fitter than every
    /// child, it overwrites the weakest child's slot.
    pub fn breed<R: Rng>(
        &self,
        population: &mut Subpopulation,
        elite: &mut EliteTracker,
        rng: &mut R,
    ) -> Result<BreedOutcome, OperatorError> {
        let size = population.len();
        let bounds = *population.bounds();
        let parents = population.candidates();

        elite.observe(parents);

        let mut next: Vec<Candidate> = Vec::with_capacity(size);
        while next.len() < size {
            let (one, two) = self.selection.select_parents(parents, rng)?;
            let (mut first, mut second) =
                self.crossover
                    .crossover(&parents[one], &parents[two], rng)?;

            self.mutation.mutate(&mut first, &bounds, rng);
            self.mutation.mutate(&mut second, &bounds, rng);

            next.push(first);
            if next.len() < size {
                next.push(second);
            }
        }

        let (mut worst, mut best) = (0, 0);
        for (i, child) in next.iter().enumerate().skip(1) {
            if child.fitness() < next[worst].fitness() {
                worst = i;
            }
            if child.fitness() > next[best].fitness() {
                best = i;
            }
        }

        let mut elite_restored = false;
        if let Some(champion) = elite.best() {
            if champion.fitness() > next[best].fitness() {
                next[worst].copy_from(champion);
                best = worst;
                elite_restored = true;
            }
        }

        let best_fitness = next[best].fitness();
        population.replace(next);

        Ok(BreedOutcome {
            best_index: best,
            best_fitness,
            elite_restored,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitness::lennard_jones::calc_fitness;
    use crate::genome::bounds::BoxBounds;
    use crate::genome::position::Position;
    use rand::SeedableRng;

    fn random_population(size: usize, particles: usize, seed: u64) -> Subpopulation {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        Subpopulation::random(size, particles, BoxBounds::new(20, 20), &mut rng)
    }

    #[test]
    fn test_elite_tracker_keeps_first_max() {
        let a = Candidate::new(vec![Position::new(0, 0), Position::new(1, 0)]);
        let b = Candidate::new(vec![Position::new(5, 5), Position::new(6, 5)]);
        let weak = Candidate::new(vec![Position::new(0, 0), Position::new(4, 0)]);

        let mut elite = EliteTracker::new();
        elite.observe(&[weak.clone(), a.clone(), b.clone()]);
        assert_eq!(elite.best(), Some(&a));

        elite.observe(&[weak]);
        assert_eq!(elite.best(), Some(&a));

        elite.reset();
        assert!(elite.best().is_none());
    }

    #[test]
    fn test_breed_preserves_size() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let breeder = Breeder::new();
        for size in [2usize, 3, 4, 7, 10, 31] {
            let mut pop = random_population(size, 6, size as u64);
            let mut elite = EliteTracker::new();
            for _ in 0..5 {
                let outcome = breeder.breed(&mut pop, &mut elite, &mut rng).unwrap();
                assert_eq!(pop.len(), size);
                assert!(outcome.best_index < size);
            }
        }
    }

    #[test]
    fn test_breed_fitness_cached_correctly() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let mut pop = random_population(20, 8, 1);
        let mut elite = EliteTracker::new();
        let breeder = Breeder {
            mutation: RelocationMutation::new(1.0),
            ..Breeder::new()
        };
        for _ in 0..10 {
            breeder.breed(&mut pop, &mut elite, &mut rng).unwrap();
            for c in pop.iter() {
                assert_eq!(c.fitness(), calc_fitness(c.positions()));
                assert_eq!(c.len(), 8);
            }
        }
    }

    #[test]
    fn test_breed_reports_fittest_index() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let mut pop = random_population(16, 5, 2);
        let mut elite = EliteTracker::new();
        let breeder = Breeder::new();
        for _ in 0..20 {
            let outcome = breeder.breed(&mut pop, &mut elite, &mut rng).unwrap();
            let max = pop.iter().map(Candidate::fitness).fold(f64::MIN, f64::max);
            assert_eq!(outcome.best_fitness, max);
            assert_eq!(pop[outcome.best_index].fitness(), max);
        }
    }

    #[test]
    fn test_elite_never_lost() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let mut pop = random_population(10, 10, 3);
        let mut elite = EliteTracker::new();
        let breeder = Breeder::new();

        let mut previous = f64::MIN;
        for _ in 0..50 {
            let outcome = breeder.breed(&mut pop, &mut elite, &mut rng).unwrap();
            let tracked = elite.best_fitness().unwrap();
            assert!(tracked >= previous);
            assert!(outcome.best_fitness >= tracked);
            previous = tracked;
        }
    }

    #[test]
    fn test_elite_restored_into_weakest_slot() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let bounds = BoxBounds::new(30, 30);
        let mut pop = Subpopulation::random(6, 4, bounds, &mut rng);

        // An elite far better than anything random breeding can make
        let champion = Candidate::new(vec![
            Position::new(0, 0),
            Position::new(1, 0),
            Position::new(0, 1),
            Position::new(1, 1),
        ]);
        let mut elite = EliteTracker::new();
        elite.observe(std::slice::from_ref(&champion));

        let outcome = Breeder::new().breed(&mut pop, &mut elite, &mut rng).unwrap();
        assert!(outcome.elite_restored);
        assert_eq!(pop[outcome.best_index], champion);
    }

    #[test]
    fn test_breed_rejects_single_candidate() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let mut pop = random_population(1, 4, 5);
        let result = Breeder::new().breed(&mut pop, &mut EliteTracker::new(), &mut rng);
        assert!(matches!(result, Err(OperatorError::SelectionFailed(_))));
    }

    #[test]
    fn test_breed_rejects_short_chromosome() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let mut pop = random_population(4, 2, 5);
        let result = Breeder::new().breed(&mut pop, &mut EliteTracker::new(), &mut rng);
        assert!(matches!(result, Err(OperatorError::CrossoverFailed(_))));
    }
}
