//! Configuration file support for fitlog.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/fitlog/config.toml`.
//! Every section is optional.

use crate::{Error, Result, DEFAULT_DAILY_GOAL};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub goals: GoalConfig,

    #[serde(default)]
    pub chart: ChartConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Goal defaults, used until the user sets a goal of their own
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GoalConfig {
    #[serde(default = "default_daily_goal")]
    pub default_daily_goal: u32,
}

impl Default for GoalConfig {
    fn default() -> Self {
        Self {
            default_daily_goal: default_daily_goal(),
        }
    }
}

/// Text chart rendering
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Width of the longest bar, in characters
    #[serde(default = "default_chart_width")]
    pub width: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: default_chart_width(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| home_dir().join(".local/share"));
    base.join("fitlog")
}

fn default_daily_goal() -> u32 {
    DEFAULT_DAILY_GOAL
}

fn default_chart_width() -> usize {
    40
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| home_dir().join(".config"));
        base.join("fitlog").join("config.toml")
    }

    fn validate(&self) -> Result<()> {
        if self.goals.default_daily_goal == 0 {
            return Err(Error::Config(
                "goals.default_daily_goal must be greater than zero".into(),
            ));
        }
        if self.chart.width == 0 {
            return Err(Error::Config("chart.width must be greater than zero".into()));
        }
        Ok(())
    }

    /// Path of the workout history file
    pub fn data_file(&self) -> PathBuf {
        self.data.data_dir.join(crate::store::DATA_FILE_NAME)
    }

    /// Path of the persisted user settings
    pub fn settings_file(&self) -> PathBuf {
        self.data.data_dir.join(crate::settings::SETTINGS_FILE_NAME)
    }
}
