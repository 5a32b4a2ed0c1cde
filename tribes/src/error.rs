// error.rs - Error types for grid construction, updates and configuration

use std::time::Duration;

use thiserror::Error;

/// Everything that can stop a generation from being produced.
///
/// No variant carries a partially computed grid: an update either returns a
/// complete grid or one of these.
#[derive(Error, Debug)]
pub enum GridError {
    #[error("invalid grid dimensions {width}x{height}: both must be positive")]
    InvalidDimensions { width: usize, height: usize },

    #[error("grid buffer holds {actual} cells, expected {expected}")]
    CellCount { expected: usize, actual: usize },

    #[error("cell {index} has value {value}, expected 0, 1 or 2")]
    InvalidCell { index: usize, value: u8 },

    #[error("failed to allocate a grid of {cells} cells")]
    Allocation { cells: usize },

    #[error("worker {worker} did not complete: {reason}")]
    WorkerJoin { worker: usize, reason: String },

    #[error("worker {worker} did not report within {timeout:?}")]
    WorkerTimeout { worker: usize, timeout: Duration },

    #[error("unknown update strategy '{0}' (expected sequential, parallel-loop or partitioned-thread)")]
    UnknownStrategy(String),

    #[error("worker count must be positive, got {0}")]
    InvalidWorkerCount(usize),

    #[error("failed to build thread pool: {0}")]
    ThreadPool(String),

    #[error("failed to start worker runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

pub type GridResult<T> = Result<T, GridError>;

impl GridError {
    pub fn worker_join(worker: usize, reason: impl Into<String>) -> Self {
        Self::WorkerJoin {
            worker,
            reason: reason.into(),
        }
    }

    /// Errors raised while validating configuration, before any update runs.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            GridError::UnknownStrategy(_)
                | GridError::InvalidWorkerCount(_)
                | GridError::ThreadPool(_)
                | GridError::Runtime(_)
        )
    }
}
