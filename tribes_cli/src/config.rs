// config.rs - Driver configuration file

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tribes::SimulationConfig;

use crate::error::CliError;
use crate::pgm::PgmFormat;

/// Where frames go unless configured otherwise.
pub const DEFAULT_OUTPUT_DIR: &str = "Images";

/// Everything the driver reads from `--config`. Every key is optional.
///
/// ```toml
/// [simulation]
/// generations = 20
/// strategy = "partitioned-thread"
/// workers = 4
/// wrap = "toroidal"
///
/// [output]
/// dir = "Images"
/// format = "plain"
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    pub simulation: SimulationConfig,
    pub output: OutputConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub format: PgmFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            format: PgmFormat::default(),
        }
    }
}

impl DriverConfig {
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let text = fs::read_to_string(path).map_err(|e| CliError::io("read config", path, e))?;
        let config = toml::from_str(&text).map_err(|source| CliError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), ?config, "Config loaded");
        Ok(config)
    }
}
