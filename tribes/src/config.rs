// config.rs - Knobs the driver hands to the simulation

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{GridError, GridResult};
use crate::neighborhood::WrapPolicy;
use crate::updater::Strategy;

/// Worker count for the partitioned strategy when none is configured.
pub const DEFAULT_WORKERS: usize = 4;

/// Generations computed when none is configured.
pub const DEFAULT_GENERATIONS: u64 = 5;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of generations to compute
    pub generations: u64,

    /// Update strategy; `None` leaves the choice to the driver
    pub strategy: Option<Strategy>,

    /// Worker tasks for the partitioned strategy
    pub workers: usize,

    /// Dedicated pool size for the parallel loop (`None` = rayon's global pool)
    pub threads: Option<usize>,

    /// Edge handling for neighbor lookup
    pub wrap: WrapPolicy,

    /// Give up on a partitioned generation after this long (`None` = wait forever)
    pub join_timeout_ms: Option<u64>,

    /// Stop early when a generation repeats one of the recent ones
    pub stop_on_cycle: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            generations: DEFAULT_GENERATIONS,
            strategy: None,
            workers: DEFAULT_WORKERS,
            threads: None,
            wrap: WrapPolicy::Toroidal,
            join_timeout_ms: None,
            stop_on_cycle: false,
        }
    }
}

impl SimulationConfig {
    pub fn join_timeout(&self) -> Option<Duration> {
        self.join_timeout_ms.map(Duration::from_millis)
    }

    /// Reject settings no updater can run with. Called before any computation.
    pub fn validate(&self) -> GridResult<()> {
        if self.workers == 0 {
            return Err(GridError::InvalidWorkerCount(self.workers));
        }
        if self.threads == Some(0) {
            return Err(GridError::ThreadPool("thread count must be positive".into()));
        }
        Ok(())
    }
}
