// main.rs - Load a board, run the generations, write one PGM frame each

mod board;
mod cli;
mod config;
mod error;
mod menu;
mod pgm;

use std::fs;
use std::io;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use tracing::{Level, error, info};

use tribes::{Grid, RunOutcome, Simulation, patterns};

use cli::{Args, Seed};
use config::DriverConfig;
use error::CliError;

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn seed_grid(seed: &Seed) -> Result<Grid, CliError> {
    let grid = match seed {
        Seed::Board(path) => board::load_board(path)?,
        Seed::Pattern { name, width, height } => {
            let pattern = patterns::find(name).ok_or_else(|| CliError::UnknownPattern(name.clone()))?;
            patterns::centered(pattern, *width, *height)?
        }
        Seed::Random { seed, width, height } => patterns::random_grid(*width, *height, *seed)?,
    };
    Ok(grid)
}

fn run(args: &Args) -> Result<(), CliError> {
    let mut config = match &args.config {
        Some(path) => DriverConfig::load(path)?,
        None => DriverConfig::default(),
    };
    args.apply(&mut config);
    config.simulation.validate()?;

    let seed = args.seed();
    let grid = seed_grid(&seed)?;

    let strategy = match config.simulation.strategy {
        Some(strategy) => strategy,
        None => menu::prompt_strategy(&mut io::stdin().lock(), &mut io::stdout())?,
    };

    let output = &config.output;
    fs::create_dir_all(&output.dir).map_err(|e| CliError::io("create output directory", &output.dir, e))?;
    let stem = seed.stem();

    info!(
        iterations = config.simulation.generations,
        %strategy,
        width = grid.width(),
        height = grid.height(),
        "Running the simulation"
    );
    let start = Instant::now();

    let mut simulation = Simulation::from_config(grid, strategy, &config.simulation)?;
    let outcome = simulation.run(config.simulation.generations, |generation, grid| -> Result<(), CliError> {
        let path = pgm::frame_path(&output.dir, &stem, generation);
        pgm::save_pgm(&path, grid, output.format).map_err(|e| CliError::io("write frame", &path, e))?;
        tracing::debug!(generation, path = %path.display(), "Frame written");
        Ok(())
    })?;

    if let RunOutcome::CycleDetected { generation } = outcome {
        info!(generation, "Stopped early on a repeating pattern");
    }
    info!(
        elapsed = ?start.elapsed(),
        generations = simulation.generation(),
        population = simulation.grid().population(),
        "Frames written to {}",
        output.dir.display()
    );
    Ok(())
}
