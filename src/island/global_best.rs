//! Global best selection
//!
//! After an iteration every island offers its run-best; an argmax reduction
//! names the winning island, which ships its candidate to the coordinator.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EvoResult, WireError};
use crate::population::candidate::Candidate;
use crate::transport::traits::{Communicator, Tag, COORDINATOR};
use crate::wire;

/// The best candidate across all islands, held by the coordinator
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GlobalBest {
    pub candidate: Candidate,
    /// Rank of the island that found it
    pub island: usize,
}

/// Find the cohort's best candidate and move it to the coordinator
///
/// Collective: every island must call this once per iteration. Returns
/// `Some` on the coordinator only. Equal fitness goes to the lowest rank.
pub fn select_global_best<C: Communicator>(
    comm: &mut C,
    run_best: &Candidate,
) -> EvoResult<Option<GlobalBest>> {
    let winner = comm.all_reduce_argmax(run_best.fitness())?;
    let rank = comm.rank();
    debug!(rank, winner = winner.rank, fitness = winner.value, "global argmax");

    if winner.rank == rank {
        if comm.is_coordinator() {
            return Ok(Some(GlobalBest {
                candidate: run_best.clone(),
                island: rank,
            }));
        }
        let payload = wire::encode(std::slice::from_ref(run_best), run_best.len())?;
        comm.send(COORDINATOR, Tag::GLOBAL_BEST, payload)?;
        return Ok(None);
    }

    if comm.is_coordinator() {
        let expected = wire::packed_len(1, run_best.len());
        let bytes = comm.receive_exact(winner.rank, Tag::GLOBAL_BEST, expected)?;
        let candidate = wire::decode(&bytes)?
            .into_iter()
            .next()
            .ok_or(WireError::CountMismatch {
                expected: 1,
                actual: 0,
            })?;
        return Ok(Some(GlobalBest {
            candidate,
            island: winner.rank,
        }));
    }

    Ok(None)
}
