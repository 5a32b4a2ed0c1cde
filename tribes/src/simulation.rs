// simulation.rs - One generation loop for every update strategy

use std::sync::Arc;

use crate::config::SimulationConfig;
use crate::error::{GridError, GridResult};
use crate::grid::Grid;
use crate::updater::{self, Strategy, Updater};

/// How many recent fingerprints are kept for cycle detection.
const HISTORY_LEN: usize = 10;

/// Owns the current generation and advances it with one updater.
///
/// A generation is the unit of progress: `step` either commits a complete new
/// grid or leaves the current one exactly as it was.
pub struct Simulation {
    current: Arc<Grid>,
    updater: Box<dyn Updater>,
    generation: u64,
    stop_on_cycle: bool,

    grid_history: [u64; HISTORY_LEN],
    history_count: usize,
    cyclic: bool,
}

/// Why `run` returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// All requested generations were computed
    Completed,
    /// A generation repeated a recent one and `stop_on_cycle` was set
    CycleDetected { generation: u64 },
}

impl Simulation {
    pub fn new(grid: Grid, updater: Box<dyn Updater>) -> Self {
        let mut simulation = Self {
            current: Arc::new(grid),
            updater,
            generation: 0,
            stop_on_cycle: false,
            grid_history: [0; HISTORY_LEN],
            history_count: 0,
            cyclic: false,
        };
        simulation.remember_current();
        simulation
    }

    /// Build the updater for `strategy` from `config` and wrap `grid`.
    pub fn from_config(grid: Grid, strategy: Strategy, config: &SimulationConfig) -> GridResult<Self> {
        let updater = updater::create_updater(strategy, config)?;
        Ok(Self::new(grid, updater).with_stop_on_cycle(config.stop_on_cycle))
    }

    pub fn with_stop_on_cycle(mut self, stop: bool) -> Self {
        self.stop_on_cycle = stop;
        self
    }

    pub fn grid(&self) -> &Grid {
        &self.current
    }

    pub fn into_grid(self) -> Grid {
        Arc::unwrap_or_clone(self.current)
    }

    /// Generations committed so far; the initial grid is generation 0.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn updater_name(&self) -> &'static str {
        self.updater.name()
    }

    /// Whether the latest generation repeated one of the recent ones.
    pub fn is_cyclic(&self) -> bool {
        self.cyclic
    }

    /// Compute and commit the next generation.
    pub fn step(&mut self) -> GridResult<&Grid> {
        let next = self.updater.update(&self.current)?;
        self.current = Arc::new(next);
        self.generation += 1;
        self.cyclic = self.check_for_cycle();
        tracing::debug!(
            generation = self.generation,
            population = self.current.population(),
            cyclic = self.cyclic,
            "Generation committed"
        );
        Ok(&self.current)
    }

    /// Advance `generations` times, handing every committed generation to
    /// `on_generation`. An error from either side stops the run between
    /// generations.
    pub fn run<F, E>(&mut self, generations: u64, mut on_generation: F) -> Result<RunOutcome, E>
    where
        F: FnMut(u64, &Grid) -> Result<(), E>,
        E: From<GridError>,
    {
        for _ in 0..generations {
            self.step()?;
            on_generation(self.generation, &self.current)?;
            if self.stop_on_cycle && self.cyclic {
                tracing::info!(generation = self.generation, "Pattern repeats, stopping early");
                return Ok(RunOutcome::CycleDetected {
                    generation: self.generation,
                });
            }
        }
        Ok(RunOutcome::Completed)
    }

    fn check_for_cycle(&mut self) -> bool {
        let current_hash = self.current.fingerprint();
        if self.grid_history.iter().take(self.history_count).any(|&h| h == current_hash) {
            return true;
        }
        self.record(current_hash);
        false
    }

    fn remember_current(&mut self) {
        let hash = self.current.fingerprint();
        self.record(hash);
    }

    fn record(&mut self, hash: u64) {
        self.grid_history[self.history_count % HISTORY_LEN] = hash;
        self.history_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;
    use crate::neighborhood::{Window, WrapPolicy};
    use crate::patterns;
    use crate::rule::{Rule, TribalRule};
    use crate::updater::{SequentialUpdater, create_updater_with_rule};

    fn sequential() -> Box<dyn Updater> {
        Box::new(SequentialUpdater::new(Arc::new(TribalRule), WrapPolicy::Toroidal))
    }

    struct AlwaysFails;

    impl Updater for AlwaysFails {
        fn update(&self, _source: &Arc<Grid>) -> GridResult<Grid> {
            Err(GridError::worker_join(0, "simulated crash"))
        }

        fn name(&self) -> &'static str {
            "always-fails"
        }
    }

    #[test]
    fn step_commits_and_counts() {
        let grid = patterns::centered(patterns::find("Glider").unwrap(), 10, 10).unwrap();
        let mut sim = Simulation::new(grid.clone(), sequential());
        assert_eq!(sim.generation(), 0);
        sim.step().unwrap();
        assert_eq!(sim.generation(), 1);
        assert_ne!(*sim.grid(), grid);
        assert_eq!(sim.grid().population(), 5);
    }

    #[test]
    fn failed_step_keeps_current_generation() {
        let grid = patterns::random_grid(8, 8, 1).unwrap();
        let mut sim = Simulation::new(grid.clone(), Box::new(AlwaysFails));
        assert!(matches!(sim.step(), Err(GridError::WorkerJoin { .. })));
        assert_eq!(sim.generation(), 0);
        assert_eq!(*sim.grid(), grid);
    }

    #[test]
    fn run_hands_out_every_generation() {
        let grid = patterns::centered(patterns::find("Blinker").unwrap(), 6, 6).unwrap();
        let mut sim = Simulation::new(grid, sequential());
        let mut seen = Vec::new();
        let outcome = sim
            .run(4, |generation, grid| -> Result<(), GridError> {
                seen.push((generation, grid.population()));
                Ok(())
            })
            .unwrap();
        assert_eq!(outcome, RunOutcome::Completed);
        assert_eq!(seen, vec![(1, 3), (2, 3), (3, 3), (4, 3)]);
        assert_eq!(sim.generation(), 4);
    }

    #[test]
    fn sink_error_stops_between_generations() {
        let grid = patterns::random_grid(8, 8, 9).unwrap();
        let mut sim = Simulation::new(grid, sequential());
        let result = sim.run(10, |generation, _grid| {
            if generation == 3 {
                Err(GridError::worker_join(0, "disk full"))
            } else {
                Ok(())
            }
        });
        assert!(result.is_err());
        assert_eq!(sim.generation(), 3);
    }

    #[test]
    fn still_life_is_cyclic_immediately() {
        let grid = patterns::centered(patterns::find("Block").unwrap(), 6, 6).unwrap();
        let mut sim = Simulation::new(grid.clone(), sequential()).with_stop_on_cycle(true);
        let outcome = sim.run(5, |_, _| Ok::<(), GridError>(())).unwrap();
        assert_eq!(outcome, RunOutcome::CycleDetected { generation: 1 });
        assert!(sim.is_cyclic());
        assert_eq!(sim.into_grid(), grid);
    }

    #[test]
    fn oscillator_is_detected_after_its_period() {
        let grid = patterns::centered(patterns::find("Blinker").unwrap(), 7, 7).unwrap();
        let mut sim = Simulation::new(grid, sequential());
        sim.step().unwrap();
        assert!(!sim.is_cyclic());
        sim.step().unwrap();
        assert!(sim.is_cyclic());
    }

    #[test]
    fn from_config_uses_requested_strategy() {
        let config = SimulationConfig::default();
        let grid = patterns::random_grid(5, 5, 2).unwrap();
        let sim = Simulation::from_config(grid, Strategy::PartitionedThread, &config).unwrap();
        assert_eq!(sim.updater_name(), "partitioned-thread");
    }

    #[test]
    fn custom_rule_flows_through_the_factory() {
        struct Extinction;
        impl Rule for Extinction {
            fn next_state(&self, _window: &Window) -> Cell {
                Cell::Dead
            }
        }
        let config = SimulationConfig::default();
        let updater = create_updater_with_rule(Strategy::ParallelLoop, &config, Arc::new(Extinction)).unwrap();
        let mut sim = Simulation::new(patterns::random_grid(9, 9, 4).unwrap(), updater);
        assert_eq!(sim.step().unwrap().population(), 0);
    }
}
