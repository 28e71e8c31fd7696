use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::control::AnimationConfig;
use crate::figure::ChartStyle;

pub const DEFAULT_DATASET: &str = "gapminder.parquet";

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Debug, Parser)]
#[command(name = "gapminder-dash", version, about = "Gapminder live dashboard")]
pub struct Args {
    /// Dataset file (.csv, .json, .parquet). Overrides the config file.
    #[arg(short, long, value_name = "PATH")]
    pub data: Option<PathBuf>,

    /// TOML configuration file.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Configuration file
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            width: 1200.0,
            height: 800.0,
        }
    }
}

/// Everything tunable about the dashboard. Missing keys take defaults.
///
/// ```toml
/// dataset = "data/gapminder.csv"
/// default_year = 2007
/// year_step = 5
///
/// [chart]
/// size_max = 60.0
/// margin = { left = 20, right = 20, top = 60, bottom = 20 }
///
/// [animation]
/// interval_ms = 1000
/// looping = false
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub dataset: PathBuf,
    pub default_year: i32,
    pub year_step: i32,
    pub chart: ChartStyle,
    pub animation: AnimationConfig,
    pub window: WindowConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            dataset: PathBuf::from(DEFAULT_DATASET),
            default_year: 2007,
            year_step: 5,
            chart: ChartStyle::default(),
            animation: AnimationConfig::default(),
            window: WindowConfig::default(),
        }
    }
}

impl DashboardConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Defaults, then the config file, then command-line overrides.
    pub fn resolve(args: &Args) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        if let Some(data) = &args.data {
            config.dataset = data.clone();
        }
        Ok(config)
    }
}
