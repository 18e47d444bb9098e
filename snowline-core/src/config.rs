use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::model::Coordinate;

pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// How the forecast provider is queried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastSettings {
    /// Forecast endpoint, e.g. a self-hosted Open-Meteo instance.
    pub base_url: String,
    pub forecast_days: u8,
    /// IANA zone name or "auto" for the location's own zone.
    pub timezone: String,
    pub timeout_secs: u64,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            forecast_days: 16,
            timezone: "auto".to_string(),
            timeout_secs: 30,
        }
    }
}

impl ForecastSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// [forecast]
/// timeout_secs = 10
///
/// [default_location]
/// latitude = 46.56
/// longitude = 7.98
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub forecast: ForecastSettings,

    /// Used by `show` when no coordinate is given.
    pub default_location: Option<Coordinate>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        if cfg.forecast.forecast_days == 0 {
            return Err(anyhow!("forecast_days must be at least 1"));
        }
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "snowline", "snowline-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// The stored default location, re-validated since the file is hand-editable.
    pub fn default_coordinate(&self) -> Result<Option<Coordinate>> {
        self.default_location
            .map(|c| {
                Coordinate::new(c.latitude, c.longitude)
                    .context("Invalid [default_location] in config file")
            })
            .transpose()
    }

    pub fn set_default_location(&mut self, coordinate: Coordinate) {
        self.default_location = Some(coordinate);
    }
}
