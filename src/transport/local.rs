//! In-process island cohort
//!
//! Each island runs on its own thread and owns its [`LocalCommunicator`].
//! Islands share nothing but channel endpoints: every transfer is a message.
//! Collectives gather at the coordinator and broadcast the result back.

use std::collections::VecDeque;
use std::thread;

use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::trace;

use crate::error::TransportError;
use crate::transport::traits::{ArgMax, Communicator, Tag, COORDINATOR};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Channel {
    Point(Tag),
    Collective(u64),
}

#[derive(Debug)]
struct Envelope {
    source: usize,
    channel: Channel,
    payload: Vec<u8>,
}

/// Factory for a cohort of in-process islands
pub struct LocalCluster;

impl LocalCluster {
    /// Create one connected communicator per rank
    pub fn communicators(size: usize) -> Vec<LocalCommunicator> {
        let (senders, receivers): (Vec<Sender<Envelope>>, Vec<Receiver<Envelope>>) =
            (0..size).map(|_| unbounded()).unzip();

        receivers
            .into_iter()
            .enumerate()
            .map(|(rank, inbox)| LocalCommunicator {
                rank,
                size,
                peers: senders
                    .iter()
                    .enumerate()
                    .map(|(dest, s)| (dest != rank).then(|| s.clone()))
                    .collect(),
                inbox,
                pending: VecDeque::new(),
                collective_seq: 0,
            })
            .collect()
    }

    /// Run `island` once per rank on its own thread and collect the results
    /// in rank order
    pub fn run<T, F>(size: usize, island: F) -> Vec<thread::Result<T>>
    where
        T: Send,
        F: Fn(LocalCommunicator) -> T + Sync,
    {
        let communicators = Self::communicators(size);
        thread::scope(|scope| {
            let island = &island;
            let handles: Vec<_> = communicators
                .into_iter()
                .map(|comm| scope.spawn(move || island(comm)))
                .collect();
            handles.into_iter().map(|h| h.join()).collect()
        })
    }
}

/// One island's endpoint in a [`LocalCluster`]
pub struct LocalCommunicator {
    rank: usize,
    size: usize,
    /// Sender per destination rank; `None` at our own rank
    peers: Vec<Option<Sender<Envelope>>>,
    inbox: Receiver<Envelope>,
    /// Messages that arrived before anyone asked for them
    pending: VecDeque<Envelope>,
    collective_seq: u64,
}

impl LocalCommunicator {
    fn post(&self, dest: usize, channel: Channel, payload: Vec<u8>) -> Result<(), TransportError> {
        let sender = self
            .peers
            .get(dest)
            .and_then(Option::as_ref)
            .ok_or(TransportError::InvalidRank {
                rank: dest,
                size: self.size,
            })?;
        sender
            .send(Envelope {
                source: self.rank,
                channel,
                payload,
            })
            .map_err(|_| TransportError::Disconnected { rank: self.rank })
    }

    /// Position in `pending` of the first message matching `(source, channel)`,
    /// pulling from the inbox until one shows up
    fn wait_for(&mut self, source: usize, channel: Channel) -> Result<usize, TransportError> {
        if source >= self.size || source == self.rank {
            return Err(TransportError::InvalidRank {
                rank: source,
                size: self.size,
            });
        }
        if let Some(i) = self
            .pending
            .iter()
            .position(|e| e.source == source && e.channel == channel)
        {
            return Ok(i);
        }
        loop {
            let envelope = self
                .inbox
                .recv()
                .map_err(|_| TransportError::Disconnected { rank: self.rank })?;
            let matched = envelope.source == source && envelope.channel == channel;
            self.pending.push_back(envelope);
            if matched {
                return Ok(self.pending.len() - 1);
            }
        }
    }

    fn take(&mut self, source: usize, channel: Channel) -> Result<Vec<u8>, TransportError> {
        let i = self.wait_for(source, channel)?;
        let envelope = self
            .pending
            .remove(i)
            .ok_or(TransportError::Disconnected { rank: self.rank })?;
        Ok(envelope.payload)
    }

    fn all_reduce<T, F>(&mut self, value: T, combine: F) -> Result<T, TransportError>
    where
        T: Serialize + DeserializeOwned,
        F: Fn(T, T) -> T,
    {
        let channel = Channel::Collective(self.collective_seq);
        self.collective_seq += 1;

        if self.rank == COORDINATOR {
            let mut acc = value;
            for source in 1..self.size {
                let bytes = self.take(source, channel)?;
                acc = combine(acc, decode_collective(&bytes)?);
            }
            let result = encode_collective(&acc)?;
            for dest in 1..self.size {
                self.post(dest, channel, result.clone())?;
            }
            Ok(acc)
        } else {
            self.post(COORDINATOR, channel, encode_collective(&value)?)?;
            let bytes = self.take(COORDINATOR, channel)?;
            decode_collective(&bytes)
        }
    }
}

fn encode_collective<T: Serialize>(value: &T) -> Result<Vec<u8>, TransportError> {
    bincode::serialize(value).map_err(|e| TransportError::Collective(e.to_string()))
}

fn decode_collective<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, TransportError> {
    bincode::deserialize(bytes).map_err(|e| TransportError::Collective(e.to_string()))
}

impl Communicator for LocalCommunicator {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn send(&mut self, dest: usize, tag: Tag, payload: Vec<u8>) -> Result<(), TransportError> {
        trace!(rank = self.rank, dest, tag = tag.0, bytes = payload.len(), "send");
        self.post(dest, Channel::Point(tag), payload)
    }

    fn peek_size(&mut self, source: usize, tag: Tag) -> Result<usize, TransportError> {
        let i = self.wait_for(source, Channel::Point(tag))?;
        Ok(self.pending[i].payload.len())
    }

    fn receive(&mut self, source: usize, tag: Tag) -> Result<Vec<u8>, TransportError> {
        let payload = self.take(source, Channel::Point(tag))?;
        trace!(rank = self.rank, source, tag = tag.0, bytes = payload.len(), "receive");
        Ok(payload)
    }

    fn barrier(&mut self) -> Result<(), TransportError> {
        self.all_reduce(0u8, |a, _| a).map(|_| ())
    }

    fn all_reduce_sum(&mut self, value: u64) -> Result<u64, TransportError> {
        self.all_reduce(value, |a, b| a + b)
    }

    fn all_reduce_argmax(&mut self, value: f64) -> Result<ArgMax, TransportError> {
        let rank = self.rank;
        self.all_reduce(ArgMax::new(value, rank), ArgMax::combine)
    }
}
