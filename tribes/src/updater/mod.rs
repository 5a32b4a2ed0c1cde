// updater/mod.rs - The three ways of producing the next generation
//
// Every updater reads an immutable source grid and returns a brand new grid of
// the same size. They differ only in how the per-cell work is scheduled, so
// for the same rule and wrap policy they produce identical grids.

mod parallel;
mod partitioned;
mod sequential;

use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::config::SimulationConfig;
use crate::error::{GridError, GridResult};
use crate::grid::Grid;
use crate::neighborhood::{self, WrapPolicy};
use crate::rule::{Rule, TribalRule};

pub use parallel::ParallelLoopUpdater;
pub use partitioned::PartitionedUpdater;
pub use sequential::SequentialUpdater;

/// Produces generation `n + 1` from generation `n`.
pub trait Updater: Send + Sync {
    /// Compute the next generation. The source is shared read-only for the
    /// whole call; on error nothing is returned and the source is untouched.
    fn update(&self, source: &Arc<Grid>) -> GridResult<Grid>;

    /// Name of this updater (for logging)
    fn name(&self) -> &'static str;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    Sequential,
    ParallelLoop,
    PartitionedThread,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [
        Strategy::Sequential,
        Strategy::ParallelLoop,
        Strategy::PartitionedThread,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Sequential => "sequential",
            Strategy::ParallelLoop => "parallel-loop",
            Strategy::PartitionedThread => "partitioned-thread",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = GridError;

    /// Accepts the full names, short aliases and the old menu numbers.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "sequential" | "seq" => Ok(Strategy::Sequential),
            "1" | "parallel-loop" | "parallel" | "loop" => Ok(Strategy::ParallelLoop),
            "2" | "partitioned-thread" | "partitioned" | "threads" => Ok(Strategy::PartitionedThread),
            _ => Err(GridError::UnknownStrategy(s.trim().to_string())),
        }
    }
}

/// Create the updater for `strategy` with the tribal rule.
pub fn create_updater(strategy: Strategy, config: &SimulationConfig) -> GridResult<Box<dyn Updater>> {
    create_updater_with_rule(strategy, config, Arc::new(TribalRule))
}

pub fn create_updater_with_rule(
    strategy: Strategy,
    config: &SimulationConfig,
    rule: Arc<dyn Rule>,
) -> GridResult<Box<dyn Updater>> {
    config.validate()?;
    let rule_name = rule.name();
    let updater: Box<dyn Updater> = match strategy {
        Strategy::Sequential => Box::new(SequentialUpdater::new(rule, config.wrap)),
        Strategy::ParallelLoop => Box::new(ParallelLoopUpdater::new(rule, config.wrap, config.threads)?),
        Strategy::PartitionedThread => Box::new(
            PartitionedUpdater::new(rule, config.wrap, config.workers)?
                .with_join_timeout(config.join_timeout()),
        ),
    };
    tracing::info!(
        updater = updater.name(),
        rule = rule_name,
        wrap = ?config.wrap,
        "Using {} updater",
        strategy
    );
    Ok(updater)
}

/// Fill `out` with the next state of every cell in `rows`, row-major.
/// `out` must hold exactly `rows.len() * source.width()` cells.
pub(crate) fn compute_rows(
    source: &Grid,
    rows: Range<usize>,
    rule: &dyn Rule,
    wrap: WrapPolicy,
    out: &mut [Cell],
) {
    let width = source.width();
    debug_assert_eq!(out.len(), rows.len() * width);
    for (row, line) in rows.zip(out.chunks_exact_mut(width)) {
        for (col, slot) in line.iter_mut().enumerate() {
            let window = neighborhood::window(source, row, col, wrap);
            *slot = rule.next_state(&window);
        }
    }
}
