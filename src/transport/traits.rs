//! Message-passing capability
//!
//! Everything islands share travels through a [`Communicator`]. Point-to-point
//! calls match on `(source, tag)`; collectives must be entered by every island
//! in the same program order or the cohort stalls.

use serde::{Deserialize, Serialize};

use crate::error::TransportError;

/// Rank of the island that aggregates results and emits output
pub const COORDINATOR: usize = 0;

/// Message tag disambiguating concurrent transfers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag(pub u32);

impl Tag {
    /// Transfer of the global best to the coordinator
    pub const GLOBAL_BEST: Tag = Tag(0);

    /// Tag for the migration event numbered `exchange_count` (0-based)
    pub fn migration(exchange_count: u32) -> Tag {
        Tag(exchange_count + 1)
    }
}

/// Result of an argmax reduction: the maximum and the rank that holds it
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArgMax {
    pub value: f64,
    pub rank: usize,
}

impl ArgMax {
    pub fn new(value: f64, rank: usize) -> Self {
        Self { value, rank }
    }

    /// Keep the larger value; equal values go to the lower rank
    pub fn combine(self, other: ArgMax) -> ArgMax {
        if other.value > self.value || (other.value == self.value && other.rank < self.rank) {
            other
        } else {
            self
        }
    }
}

/// Blocking message passing between the islands of one cohort
pub trait Communicator {
    /// This island's rank in `[0, size)`
    fn rank(&self) -> usize;

    /// Number of islands in the cohort
    fn size(&self) -> usize;

    /// Send a tagged payload to `dest`
    fn send(&mut self, dest: usize, tag: Tag, payload: Vec<u8>) -> Result<(), TransportError>;

    /// Block until a message from `source` with `tag` is available and
    /// return its size without consuming it
    fn peek_size(&mut self, source: usize, tag: Tag) -> Result<usize, TransportError>;

    /// Block until a message from `source` with `tag` arrives and take it
    fn receive(&mut self, source: usize, tag: Tag) -> Result<Vec<u8>, TransportError>;

    /// Block until every island has entered the barrier
    fn barrier(&mut self) -> Result<(), TransportError>;

    /// Sum `value` over all islands; every island gets the same total
    fn all_reduce_sum(&mut self, value: u64) -> Result<u64, TransportError>;

    /// Maximum of `value` over all islands with the rank that holds it;
    /// ties go to the lowest rank
    fn all_reduce_argmax(&mut self, value: f64) -> Result<ArgMax, TransportError>;

    fn is_coordinator(&self) -> bool {
        self.rank() == COORDINATOR
    }

    /// Receive a message that must be exactly `expected` bytes long
    fn receive_exact(
        &mut self,
        source: usize,
        tag: Tag,
        expected: usize,
    ) -> Result<Vec<u8>, TransportError> {
        let actual = self.peek_size(source, tag)?;
        if actual != expected {
            return Err(TransportError::UnexpectedSize {
                source_rank: source,
                expected,
                actual,
            });
        }
        self.receive(source, tag)
    }
}
