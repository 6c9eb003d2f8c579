use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "iif-journal.yaml";
const DEFAULT_MAX_INPUT_ROWS: usize = 100_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory with the `"<Property> Mapping.csv"` files
    pub mapping_dir: PathBuf,
    /// Directory the IIF files are written to
    pub output_dir: PathBuf,
    /// Upper bound for the number of rows read from each input file
    pub max_input_rows: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mapping_dir: PathBuf::from("."),
            output_dir: PathBuf::from("."),
            max_input_rows: DEFAULT_MAX_INPUT_ROWS,
        }
    }
}

impl Config {
    /// Load the config file. Without an explicit path, a missing default config file just means
    /// default settings.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path, true),
            None => (Path::new(DEFAULT_CONFIG_PATH), false),
        };
        if !explicit && !path.exists() {
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| anyhow!("Failed to read config file {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| anyhow!("Error in config file {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_input_rows == 0 {
            bail!("max_input_rows must be at least 1");
        }
        Ok(())
    }
}
