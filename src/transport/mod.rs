//! Inter-island message passing
//!
//! This module provides the [`Communicator`] capability and the in-process
//! thread-per-island implementation.

pub mod local;
pub mod traits;

pub use local::{LocalCluster, LocalCommunicator};
pub use traits::{ArgMax, Communicator, Tag, COORDINATOR};

pub mod prelude {
    pub use super::local::*;
    pub use super::traits::*;
}
