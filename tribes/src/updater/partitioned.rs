// partitioned.rs - Fixed worker pool, one contiguous row range per worker
//
// The updater owns a tokio runtime whose blocking pool is capped at exactly
// `workers` threads; those threads do the cell computation. Each generation
// spawns one task per partition; every task holds a clone of the same
// `Arc<Grid>` source and fills a private slice for its rows. The caller blocks
// on the join barrier and stitches the slices together, so nothing is locked
// while cells are computed and the new grid only exists once every worker has
// reported. The single async worker thread only drives the join and its timer.
//
// A worker that misses the join deadline cannot be stopped, so the runtime it
// runs on is shut down in the background and the next generation builds a
// fresh one. Dropping the updater never waits for workers.

use std::sync::{Arc, Barrier, Mutex, PoisonError};
use std::time::Duration;

use tokio::runtime::Runtime;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::cell::Cell;
use crate::error::{GridError, GridResult};
use crate::grid::{self, Grid};
use crate::neighborhood::WrapPolicy;
use crate::partition::{Partition, partition_rows};
use crate::rule::Rule;

use super::{Updater, compute_rows};

/// Idle compute threads are kept this long between generations.
const WORKER_KEEP_ALIVE: Duration = Duration::from_secs(60);

type Worker = (Partition, JoinHandle<GridResult<Vec<Cell>>>);

pub struct PartitionedUpdater {
    /// `None` after a timeout until the next generation rebuilds it
    runtime: Mutex<Option<Runtime>>,
    workers: usize,
    rule: Arc<dyn Rule>,
    wrap: WrapPolicy,
    join_timeout: Option<Duration>,
    /// Test hook: every worker waits here before computing
    rendezvous: Option<Arc<Barrier>>,
}

/// Compute one partition into its own buffer.
fn process_rows(source: &Grid, partition: Partition, rule: &dyn Rule, wrap: WrapPolicy) -> GridResult<Vec<Cell>> {
    let mut rows = grid::allocate_cells(partition.steps * source.width())?;
    compute_rows(source, partition.rows(), rule, wrap, &mut rows);
    Ok(rows)
}

fn build_runtime(workers: usize) -> GridResult<Runtime> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .max_blocking_threads(workers)
        .thread_keep_alive(WORKER_KEEP_ALIVE)
        .thread_name("tribes-worker")
        .enable_time()
        .build()?;
    Ok(runtime)
}

fn abort_from(workers: &[Worker], first: usize) {
    for (_, handle) in workers.iter().skip(first) {
        handle.abort();
    }
}

impl PartitionedUpdater {
    pub fn new(rule: Arc<dyn Rule>, wrap: WrapPolicy, workers: usize) -> GridResult<Self> {
        if workers == 0 {
            return Err(GridError::InvalidWorkerCount(workers));
        }
        let runtime = build_runtime(workers)?;

        Ok(Self {
            runtime: Mutex::new(Some(runtime)),
            workers,
            rule,
            wrap,
            join_timeout: None,
            rendezvous: None,
        })
    }

    /// Fail a generation whose workers have not all reported within `timeout`.
    pub fn with_join_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.join_timeout = timeout;
        self
    }

    #[cfg(test)]
    fn with_rendezvous(mut self) -> Self {
        self.rendezvous = Some(Arc::new(Barrier::new(self.workers)));
        self
    }

    fn spawn_workers(&self, runtime: &Runtime, source: &Arc<Grid>) -> Vec<Worker> {
        partition_rows(source.height(), self.workers)
            .into_iter()
            .map(|partition| {
                let grid = Arc::clone(source);
                let rule = Arc::clone(&self.rule);
                let wrap = self.wrap;
                let rendezvous = self.rendezvous.clone();
                let handle = runtime.spawn_blocking(move || {
                    if let Some(rendezvous) = rendezvous {
                        rendezvous.wait();
                    }
                    process_rows(&grid, partition, rule.as_ref(), wrap)
                });
                (partition, handle)
            })
            .collect()
    }

    /// Join barrier: wait for every worker in partition order and assemble
    /// the destination. Any failure aborts the workers still outstanding.
    async fn join_workers(&self, source: &Grid, mut workers: Vec<Worker>) -> GridResult<Grid> {
        let deadline = self.join_timeout.map(|timeout| (Instant::now() + timeout, timeout));
        let mut cells = Vec::new();
        if cells.try_reserve_exact(source.len()).is_err() {
            abort_from(&workers, 0);
            return Err(GridError::Allocation { cells: source.len() });
        }

        for worker in 0..workers.len() {
            let partition = workers[worker].0;
            let joined = match deadline {
                Some((at, timeout)) => {
                    let waited = tokio::time::timeout_at(at, &mut workers[worker].1).await;
                    match waited {
                        Ok(joined) => joined,
                        Err(_) => {
                            abort_from(&workers, worker);
                            return Err(GridError::WorkerTimeout { worker, timeout });
                        }
                    }
                }
                None => (&mut workers[worker].1).await,
            };

            let rows = match joined {
                Ok(Ok(rows)) => rows,
                Ok(Err(e)) => {
                    abort_from(&workers, worker + 1);
                    return Err(e);
                }
                Err(e) => {
                    abort_from(&workers, worker + 1);
                    return Err(GridError::worker_join(worker, e.to_string()));
                }
            };

            let expected = partition.steps * source.width();
            if rows.len() != expected {
                abort_from(&workers, worker + 1);
                return Err(GridError::worker_join(
                    worker,
                    format!(
                        "returned {} cells for rows {:?}, expected {}",
                        rows.len(),
                        partition.rows(),
                        expected
                    ),
                ));
            }
            cells.extend_from_slice(&rows);
        }

        Grid::from_cells(source.width(), source.height(), cells)
    }
}

impl Updater for PartitionedUpdater {
    fn update(&self, source: &Arc<Grid>) -> GridResult<Grid> {
        let mut slot = self.runtime.lock().unwrap_or_else(PoisonError::into_inner);
        let runtime = match slot.take() {
            Some(runtime) => runtime,
            None => build_runtime(self.workers)?,
        };

        let workers = self.spawn_workers(&runtime, source);
        let result = runtime.block_on(self.join_workers(source, workers));
        match &result {
            Err(e @ GridError::WorkerTimeout { .. }) => {
                tracing::debug!(workers = self.workers, "Abandoning worker runtime: {}", e);
                runtime.shutdown_background();
            }
            Err(e) => {
                tracing::debug!(workers = self.workers, "Partitioned generation failed: {}", e);
                *slot = Some(runtime);
            }
            Ok(_) => *slot = Some(runtime),
        }
        result
    }

    fn name(&self) -> &'static str {
        "partitioned-thread"
    }
}

impl Drop for PartitionedUpdater {
    fn drop(&mut self) {
        let slot = self.runtime.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(runtime) = slot.take() {
            runtime.shutdown_background();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neighborhood::Window;
    use crate::patterns;
    use crate::rule::TribalRule;
    use crate::updater::SequentialUpdater;

    fn updater(workers: usize) -> PartitionedUpdater {
        PartitionedUpdater::new(Arc::new(TribalRule), WrapPolicy::Toroidal, workers).unwrap()
    }

    /// Panics on any window whose center belongs to tribe two.
    struct PanicOnTribeTwo;

    impl Rule for PanicOnTribeTwo {
        fn next_state(&self, window: &Window) -> Cell {
            if window[1][1] == Cell::TribeTwo {
                panic!("worker blew up");
            }
            Cell::Dead
        }
    }

    /// Takes far longer than the join timeout used below.
    struct Stalling;

    impl Rule for Stalling {
        fn next_state(&self, _window: &Window) -> Cell {
            std::thread::sleep(Duration::from_millis(300));
            Cell::Dead
        }
    }

    #[test]
    fn rejects_zero_workers() {
        let result = PartitionedUpdater::new(Arc::new(TribalRule), WrapPolicy::Toroidal, 0);
        assert!(matches!(result, Err(GridError::InvalidWorkerCount(0))));
    }

    #[test]
    fn matches_sequential_for_awkward_heights() {
        let sequential = SequentialUpdater::new(Arc::new(TribalRule), WrapPolicy::Toroidal);
        let partitioned = updater(4);
        for height in [1, 2, 3, 4, 5, 9, 31] {
            let source = Arc::new(patterns::random_grid(11, height, height as u64).unwrap());
            assert_eq!(
                partitioned.update(&source).unwrap(),
                sequential.update(&source).unwrap(),
                "height {height}"
            );
        }
    }

    #[test]
    fn workers_compute_concurrently() {
        // All four workers must be running at once to get past the rendezvous.
        // Serialized workers would never meet and the join would time out.
        let partitioned = updater(4)
            .with_rendezvous()
            .with_join_timeout(Some(Duration::from_secs(10)));
        let source = Arc::new(patterns::random_grid(16, 16, 3).unwrap());
        let expected = SequentialUpdater::new(Arc::new(TribalRule), WrapPolicy::Toroidal)
            .update(&source)
            .unwrap();
        for _ in 0..3 {
            assert_eq!(partitioned.update(&source).unwrap(), expected);
        }
    }

    #[test]
    fn panicking_worker_is_a_join_error() {
        let partitioned = PartitionedUpdater::new(Arc::new(PanicOnTribeTwo), WrapPolicy::Toroidal, 4).unwrap();
        let mut grid = Grid::new(8, 8).unwrap();
        grid.set(5, 3, Cell::TribeTwo); // rows 4..6 belong to worker 2
        let err = partitioned.update(&Arc::new(grid)).unwrap_err();
        assert!(matches!(err, GridError::WorkerJoin { worker: 2, .. }), "{err}");
    }

    /// Never comes back from a tribe-two center within any test's patience.
    struct HangOnTribeTwo;

    impl Rule for HangOnTribeTwo {
        fn next_state(&self, window: &Window) -> Cell {
            if window[1][1] == Cell::TribeTwo {
                std::thread::sleep(Duration::from_secs(30));
            }
            Cell::Dead
        }
    }

    #[test]
    fn hung_worker_is_a_timeout() {
        let partitioned = PartitionedUpdater::new(Arc::new(Stalling), WrapPolicy::Toroidal, 2)
            .unwrap()
            .with_join_timeout(Some(Duration::from_millis(20)));
        let source = Arc::new(Grid::new(2, 2).unwrap());
        let err = partitioned.update(&source).unwrap_err();
        assert!(matches!(err, GridError::WorkerTimeout { worker: 0, .. }), "{err}");

        // Each stalled row takes 600ms; dropping must not wait for it.
        let started = std::time::Instant::now();
        drop(partitioned);
        assert!(started.elapsed() < Duration::from_millis(300), "{:?}", started.elapsed());
    }

    #[test]
    fn timed_out_worker_does_not_hold_up_the_updater() {
        // One worker, so a stuck thread would occupy the whole pool.
        let partitioned = PartitionedUpdater::new(Arc::new(HangOnTribeTwo), WrapPolicy::Toroidal, 1)
            .unwrap()
            .with_join_timeout(Some(Duration::from_millis(50)));
        let started = std::time::Instant::now();

        let stuck = Arc::new(Grid::from_raw(1, 1, &[2]).unwrap());
        let err = partitioned.update(&stuck).unwrap_err();
        assert!(matches!(err, GridError::WorkerTimeout { worker: 0, .. }), "{err}");

        let fine = Arc::new(Grid::from_raw(2, 2, &[1, 0, 0, 0]).unwrap());
        assert_eq!(partitioned.update(&fine).unwrap().population(), 0);

        drop(partitioned);
        assert!(started.elapsed() < Duration::from_secs(5), "{:?}", started.elapsed());
    }

    #[test]
    fn runtime_survives_a_failed_generation() {
        let partitioned = PartitionedUpdater::new(Arc::new(PanicOnTribeTwo), WrapPolicy::Toroidal, 2).unwrap();
        let bad = Arc::new(Grid::from_raw(2, 2, &[2, 0, 0, 0]).unwrap());
        assert!(partitioned.update(&bad).is_err());

        let fine = Arc::new(Grid::from_raw(2, 2, &[1, 0, 0, 0]).unwrap());
        assert_eq!(partitioned.update(&fine).unwrap().population(), 0);
    }
}
