// parallel.rs - Fork-join loop over every cell with rayon
//
// Rows and columns are collapsed into one flat index space and split across
// the pool. Each iteration writes only its own destination cell and builds its
// window on its own stack, so the loop needs no locks.

use std::sync::Arc;

use rayon::prelude::*;

use crate::error::{GridError, GridResult};
use crate::grid::{self, Grid};
use crate::neighborhood::{self, WrapPolicy};
use crate::rule::Rule;

use super::Updater;

pub struct ParallelLoopUpdater {
    rule: Arc<dyn Rule>,
    wrap: WrapPolicy,
    /// Dedicated pool; `None` runs on rayon's global pool
    pool: Option<rayon::ThreadPool>,
}

impl ParallelLoopUpdater {
    pub fn new(rule: Arc<dyn Rule>, wrap: WrapPolicy, threads: Option<usize>) -> GridResult<Self> {
        let pool = match threads {
            Some(0) => {
                return Err(GridError::ThreadPool("thread count must be positive".into()));
            }
            Some(n) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .thread_name(|i| format!("tribes-loop-{i}"))
                    .build()
                    .map_err(|e| GridError::ThreadPool(e.to_string()))?,
            ),
            None => None,
        };
        Ok(Self { rule, wrap, pool })
    }

    /// Threads the loop will be spread over.
    pub fn threads(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }

    fn run_loop(&self, source: &Grid) -> GridResult<Grid> {
        let width = source.width();
        let rule = self.rule.as_ref();
        let wrap = self.wrap;

        let mut cells = grid::allocate_cells(source.len())?;
        cells.par_iter_mut().enumerate().for_each(|(i, slot)| {
            let window = neighborhood::window(source, i / width, i % width, wrap);
            *slot = rule.next_state(&window);
        });
        Grid::from_cells(width, source.height(), cells)
    }
}

impl Updater for ParallelLoopUpdater {
    fn update(&self, source: &Arc<Grid>) -> GridResult<Grid> {
        match &self.pool {
            Some(pool) => pool.install(|| self.run_loop(source)),
            None => self.run_loop(source),
        }
    }

    fn name(&self) -> &'static str {
        "parallel-loop"
    }
}
