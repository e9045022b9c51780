//! Migration between islands
//!
//! Islands pair up along a ring using two alternating matchings, chosen by
//! the parity of the running exchange count, and swap the front slice of
//! their subpopulations.

use std::cmp::Ordering;

use tracing::debug;

use crate::config::DerivedParams;
use crate::error::EvoResult;
use crate::population::population::Subpopulation;
use crate::transport::traits::{Communicator, Tag};
use crate::wire;

/// Partner of `rank` for the migration event numbered `exchange_count`
///
/// Even events pair `(0,1), (2,3), …`; odd events pair `(1,2), (3,4), …` and
/// close the ring with `(size-1, 0)` when `size` is even. An island left
/// without a partner is paired with itself.
pub fn exchange_partner(rank: usize, size: usize, exchange_count: u32) -> usize {
    let even_rank = rank % 2 == 0;
    if exchange_count % 2 == 0 {
        if even_rank {
            if rank == size - 1 {
                rank
            } else {
                rank + 1
            }
        } else {
            rank - 1
        }
    } else if even_rank {
        if rank == 0 && size % 2 != 0 {
            rank
        } else {
            (rank + size - 1) % size
        }
    } else {
        (rank + 1) % size
    }
}

/// What one island did during a migration event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// No partner this round
    SelfPaired,
    /// Swapped `count` candidates with `partner`
    Exchanged {
        partner: usize,
        sent_first: bool,
        count: usize,
    },
}

/// Periodic exchange of candidates with a neighbouring island
#[derive(Clone, Debug)]
pub struct MigrationCoordinator {
    exchange_amount: usize,
    exchange_freq: usize,
    exchange_count: u32,
}

impl MigrationCoordinator {
    /// Create a coordinator swapping `exchange_amount` candidates every
    /// `exchange_freq` generations
    pub fn new(exchange_amount: usize, exchange_freq: usize) -> Self {
        assert!(exchange_freq > 0, "Exchange frequency must be positive");
        Self {
            exchange_amount,
            exchange_freq,
            exchange_count: 0,
        }
    }

    pub fn from_params(params: &DerivedParams) -> Self {
        Self::new(params.exchange_amount, params.exchange_freq)
    }

    /// Whether a migration event happens before breeding `generation`
    pub fn is_due(&self, generation: usize) -> bool {
        generation != 0 && generation % self.exchange_freq == 0
    }

    /// Migration events performed so far in this iteration
    pub fn exchange_count(&self) -> u32 {
        self.exchange_count
    }

    pub fn reset(&mut self) {
        self.exchange_count = 0;
    }

    /// Run one migration event, overwriting the front of `population` with
    /// the partner's candidates
    ///
    /// The higher rank of a pair sends then receives; the lower rank packs its
    /// outgoing candidates first, since the incoming ones land in the same
    /// slots, then receives, then sends.
    pub fn migrate<C: Communicator>(
        &mut self,
        comm: &mut C,
        population: &mut Subpopulation,
    ) -> EvoResult<MigrationOutcome> {
        let rank = comm.rank();
        let partner = exchange_partner(rank, comm.size(), self.exchange_count);
        let tag = Tag::migration(self.exchange_count);
        self.exchange_count += 1;

        let count = self.exchange_amount.min(population.len());
        let num_particles = population.num_particles();
        let expected = wire::packed_len(count, num_particles);

        let outcome = match rank.cmp(&partner) {
            Ordering::Equal => MigrationOutcome::SelfPaired,
            Ordering::Greater => {
                let outgoing = wire::encode(population.front(count), num_particles)?;
                comm.send(partner, tag, outgoing)?;
                let incoming = comm.receive_exact(partner, tag, expected)?;
                wire::decode_into(&incoming, population.front_mut(count))?;
                MigrationOutcome::Exchanged {
                    partner,
                    sent_first: true,
                    count,
                }
            }
            Ordering::Less => {
                let snapshot = wire::encode(population.front(count), num_particles)?;
                let incoming = comm.receive_exact(partner, tag, expected)?;
                wire::decode_into(&incoming, population.front_mut(count))?;
                comm.send(partner, tag, snapshot)?;
                MigrationOutcome::Exchanged {
                    partner,
                    sent_first: false,
                    count,
                }
            }
        };

        debug!(rank, partner, tag = tag.0, ?outcome, "migration");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::bounds::BoxBounds;
    use crate::transport::local::LocalCluster;
    use rand::SeedableRng;

    #[test]
    fn test_partner_even_round() {
        let partners: Vec<usize> = (0..5).map(|r| exchange_partner(r, 5, 0)).collect();
        assert_eq!(partners, vec![1, 0, 3, 2, 4]);
        let partners: Vec<usize> = (0..4).map(|r| exchange_partner(r, 4, 2)).collect();
        assert_eq!(partners, vec![1, 0, 3, 2]);
    }

    #[test]
    fn test_partner_odd_round() {
        let partners: Vec<usize> = (0..5).map(|r| exchange_partner(r, 5, 1)).collect();
        assert_eq!(partners, vec![0, 2, 1, 4, 3]);
        let partners: Vec<usize> = (0..4).map(|r| exchange_partner(r, 4, 3)).collect();
        assert_eq!(partners, vec![3, 2, 1, 0]);
    }

    #[test]
    fn test_single_island_always_self_paired() {
        assert_eq!(exchange_partner(0, 1, 0), 0);
        assert_eq!(exchange_partner(0, 1, 1), 0);
    }

    #[test]
    fn test_is_due() {
        let coordinator = MigrationCoordinator::new(3, 10);
        assert!(!coordinator.is_due(0));
        assert!(!coordinator.is_due(5));
        assert!(coordinator.is_due(10));
        assert!(coordinator.is_due(990));
    }

    #[test]
    fn test_single_island_migration_is_noop() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let mut pop = Subpopulation::random(10, 4, BoxBounds::new(10, 10), &mut rng);
        let before = pop.candidates().to_vec();
        let mut comms = LocalCluster::communicators(1);
        let mut coordinator = MigrationCoordinator::new(2, 10);

        let outcome = coordinator.migrate(&mut comms[0], &mut pop).unwrap();
        assert_eq!(outcome, MigrationOutcome::SelfPaired);
        assert_eq!(pop.candidates(), &before[..]);
        assert_eq!(coordinator.exchange_count(), 1);
    }

    #[test]
    fn test_two_islands_swap_front_slices() {
        let results = LocalCluster::run(2, |mut comm| {
            let mut rng = rand::rngs::StdRng::seed_from_u64(comm.rank() as u64);
            let mut pop = Subpopulation::random(10, 5, BoxBounds::new(30, 30), &mut rng);
            let before = pop.candidates().to_vec();
            let mut coordinator = MigrationCoordinator::new(3, 10);
            let outcome = coordinator.migrate(&mut comm, &mut pop).unwrap();
            (before, pop.candidates().to_vec(), outcome)
        });
        let mut results: Vec<_> = results.into_iter().map(|r| r.unwrap()).collect();
        let (before1, after1, outcome1) = results.pop().unwrap();
        let (before0, after0, outcome0) = results.pop().unwrap();

        assert_eq!(&after0[..3], &before1[..3]);
        assert_eq!(&after1[..3], &before0[..3]);
        assert_eq!(&after0[3..], &before0[3..]);
        assert_eq!(&after1[3..], &before1[3..]);

        assert_eq!(
            outcome0,
            MigrationOutcome::Exchanged {
                partner: 1,
                sent_first: false,
                count: 3
            }
        );
        assert_eq!(
            outcome1,
            MigrationOutcome::Exchanged {
                partner: 0,
                sent_first: true,
                count: 3
            }
        );
    }

    #[test]
    fn test_zero_amount_exchange_completes() {
        let results = LocalCluster::run(2, |mut comm| {
            let mut rng = rand::rngs::StdRng::seed_from_u64(9);
            let mut pop = Subpopulation::random(4, 3, BoxBounds::new(5, 5), &mut rng);
            MigrationCoordinator::new(0, 10).migrate(&mut comm, &mut pop)
        });
        for result in results {
            assert!(result.unwrap().is_ok());
        }
    }
}
