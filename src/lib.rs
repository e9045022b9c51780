//! # particle-evo
//!
//! An island-model genetic algorithm searching for low-energy 2D arrangements
//! of point particles under a Lennard-Jones pair potential.
//!
//! Each island evolves its own subpopulation with joust selection,
//! single-point crossover, relocation mutation and elitism. Islands
//! periodically swap candidates with a neighbour, agree on early stopping
//! through a summed stagnation count, and hand the best arrangement of every
//! iteration to the coordinator (rank 0).
//!
//! ## Core Concepts
//!
//! - **Candidate**: a fixed-length arrangement of integer positions with its
//!   cached fitness
//! - **Communicator**: the message-passing capability islands use to talk to
//!   each other; [`transport::LocalCluster`] runs one thread per island
//! - **Wire format**: a versioned binary packing of candidates used for every
//!   transfer
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use particle_evo::prelude::*;
//!
//! let config = RunConfig::default()
//!     .with_particles(20)
//!     .with_islands(4)
//!     .with_seed(42);
//!
//! let summary = run_local(&config)?;
//! for stats in &summary.iterations {
//!     println!("{}: {}", stats.iteration, stats.best);
//! }
//! # Ok::<(), particle_evo::error::EvolutionError>(())
//! ```

pub mod algorithms;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod fitness;
pub mod genome;
pub mod island;
pub mod operators;
pub mod output;
pub mod population;
pub mod transport;
pub mod wire;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::algorithms::prelude::*;
    pub use crate::config::*;
    pub use crate::diagnostics::prelude::*;
    pub use crate::error::*;
    pub use crate::fitness::prelude::*;
    pub use crate::genome::prelude::*;
    pub use crate::island::prelude::*;
    pub use crate::operators::prelude::*;
    pub use crate::output::*;
    pub use crate::population::prelude::*;
    pub use crate::transport::prelude::*;
    pub use crate::wire::prelude::*;
}
