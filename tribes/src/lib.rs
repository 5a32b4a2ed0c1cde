// lib.rs - Two-tribe Game of Life on a toroidal grid
//
// The generation kernel and its three execution strategies. File formats and
// the command line live in `tribes_cli`; this crate only moves grids in memory.

pub mod cell;
pub mod config;
pub mod error;
pub mod grid;
pub mod neighborhood;
pub mod partition;
pub mod patterns;
pub mod rule;
pub mod simulation;
pub mod updater;

pub use cell::Cell;
pub use config::{DEFAULT_GENERATIONS, DEFAULT_WORKERS, SimulationConfig};
pub use error::{GridError, GridResult};
pub use grid::Grid;
pub use neighborhood::{Window, WrapPolicy};
pub use partition::{Partition, partition_rows};
pub use rule::{Rule, TribalRule, next_state};
pub use simulation::{RunOutcome, Simulation};
pub use updater::{
    ParallelLoopUpdater, PartitionedUpdater, SequentialUpdater, Strategy, Updater, create_updater,
    create_updater_with_rule,
};
