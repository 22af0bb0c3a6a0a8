use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::model::Coordinates;

pub const DEFAULT_API_BASE_URL: &str = "https://api.openweathermap.org";
pub const DEFAULT_IP_LOOKUP_URL: &str = "http://ip-api.com/json";
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Environment variable that overrides `api_key` from the config file.
pub const API_KEY_ENV: &str = "FORECAST_API_KEY";

/// Top-level configuration stored on disk.
///
/// Loaded once at start-up and handed to every component by reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// OpenWeatherMap API key, used for both geocoding and forecasts.
    pub api_key: Option<String>,

    pub api_base_url: String,

    /// IP-geolocation endpoint, used when no `home` is configured.
    pub ip_lookup_url: String,

    /// chrono `strftime` pattern for rendered dates.
    pub date_format: String,

    /// Where search history is persisted. Defaults to the platform data dir.
    pub history_file: Option<PathBuf>,

    /// Drop results of actions superseded by a newer one instead of rendering them.
    pub discard_stale_results: bool,

    /// Example TOML:
    /// [home]
    /// latitude = 48.85
    /// longitude = 2.35
    pub home: Option<Coordinates>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            ip_lookup_url: DEFAULT_IP_LOOKUP_URL.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            history_file: None,
            discard_stale_results: true,
            home: None,
        }
    }
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    /// `FORECAST_API_KEY` wins over the stored key.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let mut cfg = Self::load_from(&path)?;

        if let Some(key) = std::env::var(API_KEY_ENV)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
        {
            cfg.api_key = Some(key);
        }

        Ok(cfg)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn config_file_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    /// Storage file for search history, honouring `history_file`.
    pub fn history_file_path(&self) -> Result<PathBuf> {
        match &self.history_file {
            Some(path) => Ok(path.clone()),
            None => Ok(project_dirs()?.data_dir().join("storage.json")),
        }
    }

    /// Returns the API key, or a hint on how to set one.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "No API key configured.\n\
                     Hint: run `forecast configure` or set {API_KEY_ENV}."
                )
            })
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    pub fn set_home(&mut self, home: Option<Coordinates>) {
        self.home = home;
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "forecast", "forecast")
        .ok_or_else(|| anyhow!("Could not determine platform config directory"))
}
