//! Wire format for candidates
//!
//! This module provides the versioned binary packing used for every
//! inter-island transfer. It is pure: no I/O, no transport.

mod codec;

pub use codec::*;

/// Prelude for wire module
pub mod prelude {
    pub use super::codec::*;
}
