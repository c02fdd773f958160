//! Configuration loading from TOML files.
//!
//! Lookup order:
//! 1. `--config <path>`
//! 2. `$GRADVIZ_CONFIG` environment variable
//! 3. `./gradviz.toml`, when present
//! 4. Built-in defaults (everything is optional)

use anyhow::{Context, Result};
use gradviz_render::{
    export::{ExportPlan, OutputFormat},
    style::ChartStyle,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming a configuration file.
pub const CONFIG_ENV: &str = "GRADVIZ_CONFIG";

/// Configuration file looked up in the working directory.
pub const LOCAL_CONFIG: &str = "gradviz.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where figures are written
    pub output: OutputConfig,
    /// Chart appearance
    pub style: ChartStyle,
}

/// Output settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output directory. Default: the working directory.
    pub directory: PathBuf,
    /// Formats to write, e.g. `["svg", "png", "pdf"]`.
    pub formats: Vec<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            formats: OutputFormat::DEFAULT.iter().map(ToString::to_string).collect(),
        }
    }
}

impl OutputConfig {
    /// Export plan for these settings.
    pub fn plan(&self) -> Result<ExportPlan> {
        let formats = self
            .formats
            .iter()
            .map(|f| f.parse::<OutputFormat>())
            .collect::<Result<Vec<_>, _>>()
            .context("parsing [output] formats")?;
        Ok(ExportPlan::new(&self.directory, formats))
    }
}

impl Config {
    /// Parses a configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
    }
}

/// Load config from disk. Returns defaults if no config file exists.
///
/// A file named by the flag or the environment must exist; the local
/// `gradviz.toml` is optional.
pub fn load_config(flag: Option<&Path>) -> Result<Config> {
    let env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
    match config_path(flag, env, Path::new(LOCAL_CONFIG)) {
        Some(path) => Config::from_file(&path),
        None => Ok(Config::default()),
    }
}

/// Resolve the config file path.
pub fn config_path(flag: Option<&Path>, env: Option<PathBuf>, local: &Path) -> Option<PathBuf> {
    if let Some(p) = flag {
        return Some(p.to_path_buf());
    }
    if let Some(p) = env.filter(|p| !p.as_os_str().is_empty()) {
        return Some(p);
    }
    local.is_file().then(|| local.to_path_buf())
}
