// sequential.rs - Single-threaded row-major scan

use std::sync::Arc;

use crate::error::GridResult;
use crate::grid::{self, Grid};
use crate::neighborhood::WrapPolicy;
use crate::rule::Rule;

use super::{Updater, compute_rows};

pub struct SequentialUpdater {
    rule: Arc<dyn Rule>,
    wrap: WrapPolicy,
}

impl SequentialUpdater {
    pub fn new(rule: Arc<dyn Rule>, wrap: WrapPolicy) -> Self {
        Self { rule, wrap }
    }
}

impl Updater for SequentialUpdater {
    fn update(&self, source: &Arc<Grid>) -> GridResult<Grid> {
        let mut cells = grid::allocate_cells(source.len())?;
        compute_rows(source, 0..source.height(), self.rule.as_ref(), self.wrap, &mut cells);
        Grid::from_cells(source.width(), source.height(), cells)
    }

    fn name(&self) -> &'static str {
        "sequential"
    }
}
