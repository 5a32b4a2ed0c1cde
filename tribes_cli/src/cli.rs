// cli.rs - Command line arguments and how they override the config file

use std::path::PathBuf;

use clap::Parser;
use tribes::{Strategy, WrapPolicy};

use crate::config::DriverConfig;
use crate::error::CliError;
use crate::pgm::PgmFormat;

pub const DEFAULT_BOARD: &str = "Boards/pulsar.txt";

#[derive(Parser, Debug)]
#[command(name = "tribes")]
#[command(about = "Two-tribe Game of Life on a toroidal grid, one PGM frame per generation", long_about = None)]
pub struct Args {
    /// Generations to compute [default: 5]
    #[arg(value_name = "ITERATIONS")]
    pub iterations: Option<u64>,

    /// Board file to start from
    #[arg(value_name = "BOARD", default_value = DEFAULT_BOARD)]
    pub board: PathBuf,

    /// Update strategy; prompts when neither this nor the config sets one
    #[arg(short, long, value_name = "STRATEGY")]
    pub strategy: Option<Strategy>,

    /// Workers for the partitioned strategy
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Dedicated pool size for the parallel loop
    #[arg(long)]
    pub threads: Option<usize>,

    /// Frame format
    #[arg(long, value_enum)]
    pub format: Option<PgmFormat>,

    /// Directory frames are written to
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Reproduce the old column wrap instead of a true torus
    #[arg(long)]
    pub legacy_wrap: bool,

    /// Fail a partitioned generation after this many milliseconds
    #[arg(long, value_name = "MS")]
    pub join_timeout_ms: Option<u64>,

    /// Stop once a generation repeats a recent one
    #[arg(long)]
    pub stop_on_cycle: bool,

    /// Start from a named pattern instead of a board file
    #[arg(long, value_name = "NAME", conflicts_with = "random")]
    pub pattern: Option<String>,

    /// Start from a random soup with this seed instead of a board file
    #[arg(long, value_name = "SEED")]
    pub random: Option<u64>,

    /// Log every generation and frame
    #[arg(short, long)]
    pub verbose: bool,

    /// Grid size for --pattern and --random
    #[arg(long, value_name = "WxH", default_value = "64x64", value_parser = parse_size)]
    pub size: (usize, usize),
}

/// Where the first generation comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Seed {
    Board(PathBuf),
    Pattern { name: String, width: usize, height: usize },
    Random { seed: u64, width: usize, height: usize },
}

impl Seed {
    /// Base name for output frames.
    pub fn stem(&self) -> String {
        match self {
            Seed::Board(path) => path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| "board".to_string()),
            Seed::Pattern { name, .. } => name.to_ascii_lowercase(),
            Seed::Random { seed, .. } => format!("random_{seed}"),
        }
    }
}

pub fn parse_size(s: &str) -> Result<(usize, usize), CliError> {
    let invalid = || CliError::InvalidSize(s.to_string());
    let (width, height) = s.split_once(['x', 'X']).ok_or_else(invalid)?;
    let width = width.trim().parse().map_err(|_| invalid())?;
    let height = height.trim().parse().map_err(|_| invalid())?;
    Ok((width, height))
}

impl Args {
    /// Flags given on the command line win over the config file.
    pub fn apply(&self, config: &mut DriverConfig) {
        let simulation = &mut config.simulation;
        if let Some(iterations) = self.iterations {
            simulation.generations = iterations;
        }
        if let Some(strategy) = self.strategy {
            simulation.strategy = Some(strategy);
        }
        if let Some(workers) = self.workers {
            simulation.workers = workers;
        }
        if self.threads.is_some() {
            simulation.threads = self.threads;
        }
        if self.legacy_wrap {
            simulation.wrap = WrapPolicy::Legacy;
        }
        if self.join_timeout_ms.is_some() {
            simulation.join_timeout_ms = self.join_timeout_ms;
        }
        if self.stop_on_cycle {
            simulation.stop_on_cycle = true;
        }

        if let Some(dir) = &self.output_dir {
            config.output.dir = dir.clone();
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
    }

    pub fn seed(&self) -> Seed {
        let (width, height) = self.size;
        if let Some(name) = &self.pattern {
            Seed::Pattern {
                name: name.clone(),
                width,
                height,
            }
        } else if let Some(seed) = self.random {
            Seed::Random { seed, width, height }
        } else {
            Seed::Board(self.board.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("tribes").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn bare_invocation_uses_the_classic_defaults() {
        let args = parse(&[]);
        assert_eq!(args.iterations, None);
        assert_eq!(args.seed(), Seed::Board(PathBuf::from("Boards/pulsar.txt")));

        let mut config = DriverConfig::default();
        args.apply(&mut config);
        assert_eq!(config, DriverConfig::default());
        assert_eq!(config.simulation.generations, 5);
    }

    #[test]
    fn positionals_are_iterations_then_board() {
        let args = parse(&["12", "Boards/glider.txt"]);
        assert_eq!(args.iterations, Some(12));
        assert_eq!(args.seed().stem(), "glider");
    }

    #[test]
    fn flags_override_the_config_file() {
        let args = parse(&[
            "3",
            "--strategy",
            "partitioned",
            "--workers",
            "6",
            "--legacy-wrap",
            "--format",
            "plain",
            "--output-dir",
            "frames",
        ]);
        let mut config = DriverConfig::default();
        config.simulation.generations = 40;
        config.simulation.strategy = Some(Strategy::Sequential);
        args.apply(&mut config);

        assert_eq!(config.simulation.generations, 3);
        assert_eq!(config.simulation.strategy, Some(Strategy::PartitionedThread));
        assert_eq!(config.simulation.workers, 6);
        assert_eq!(config.simulation.wrap, WrapPolicy::Legacy);
        assert_eq!(config.output.format, PgmFormat::Plain);
        assert_eq!(config.output.dir, PathBuf::from("frames"));
    }

    #[test]
    fn unset_flags_leave_the_config_file_alone() {
        let mut config = DriverConfig::default();
        config.simulation.join_timeout_ms = Some(100);
        config.simulation.threads = Some(2);
        parse(&[]).apply(&mut config);
        assert_eq!(config.simulation.join_timeout_ms, Some(100));
        assert_eq!(config.simulation.threads, Some(2));
    }

    #[test]
    fn bad_strategy_is_rejected_by_the_parser() {
        let result = Args::try_parse_from(["tribes", "--strategy", "gpu"]);
        assert!(result.is_err());
    }

    #[test]
    fn generated_seeds() {
        let args = parse(&["--random", "7", "--size", "30x20"]);
        assert_eq!(args.seed(), Seed::Random { seed: 7, width: 30, height: 20 });
        assert_eq!(args.seed().stem(), "random_7");

        let args = parse(&["--pattern", "Glider"]);
        assert_eq!(args.seed().stem(), "glider");
        assert!(Args::try_parse_from(["tribes", "--pattern", "Glider", "--random", "1"]).is_err());
    }

    #[test]
    fn size_parsing() {
        assert_eq!(parse_size("10x4").unwrap(), (10, 4));
        assert_eq!(parse_size("8X8").unwrap(), (8, 8));
        assert!(matches!(parse_size("10"), Err(CliError::InvalidSize(_))));
        assert!(parse_size("ax4").is_err());
    }
}
