//! Configuration loading and parsing

use anyhow::{Context, Result};
use battery_log_decoder::DecoderConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration (loaded from config.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub decoder: DecoderConfig,
    #[serde(default)]
    pub plot: PlotConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PathsConfig {
    /// Where `*.hex` dumps are found and archived
    #[serde(default = "default_dumps_dir")]
    pub dumps_dir: PathBuf,
    /// Where `*.data` plot data is written
    #[serde(default = "default_datas_dir")]
    pub datas_dir: PathBuf,
    /// Where the PNG charts end up
    #[serde(default = "default_plots_dir")]
    pub plots_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            dumps_dir: default_dumps_dir(),
            datas_dir: default_datas_dir(),
            plots_dir: default_plots_dir(),
        }
    }
}

fn default_dumps_dir() -> PathBuf {
    PathBuf::from("dumps")
}

fn default_datas_dir() -> PathBuf {
    PathBuf::from("datas")
}

fn default_plots_dir() -> PathBuf {
    PathBuf::from("plots")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlotConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// gnuplot executable, looked up on PATH
    #[serde(default = "default_gnuplot")]
    pub gnuplot: PathBuf,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            gnuplot: default_gnuplot(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_gnuplot() -> PathBuf {
    PathBuf::from("gnuplot")
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Also write all summaries as JSON to this file
    pub json_summary: Option<PathBuf>,
    /// Stop at the first dump that fails to decode
    #[serde(default)]
    pub fail_fast: bool,
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    config
        .decoder
        .validate()
        .with_context(|| format!("Invalid [decoder] section in {:?}", path))?;

    Ok(config)
}
