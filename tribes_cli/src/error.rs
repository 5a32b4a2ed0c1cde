// error.rs - Driver errors: files, boards, config and everything from the core

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tribes::GridError;

use crate::board::BoardError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("failed to {action} '{}': {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("bad board file '{}': {source}", path.display())]
    Board {
        path: PathBuf,
        #[source]
        source: BoardError,
    },

    #[error("bad config file '{}': {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid size '{0}', expected WIDTHxHEIGHT")]
    InvalidSize(String),

    #[error("unknown pattern '{0}'")]
    UnknownPattern(String),

    #[error("no strategy chosen: standard input was closed")]
    NoStrategy,

    #[error(transparent)]
    Grid(#[from] GridError),
}

impl CliError {
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}
