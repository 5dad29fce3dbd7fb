use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::dial::DEFAULT_RADIUS;
use crate::grouping::UndatedPolicy;

const CONFIG_ENV_VAR: &str = "TASKDAY_CONFIG";
const DB_ENV_VAR: &str = "TASKDAY_DB";
const APP_DIR: &str = "taskday";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// User settings read from `config.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Where the task snapshot lives; see [`Config::data_file`].
    pub data_file: Option<PathBuf>,
    /// Placement of pending tasks that have no due date.
    pub undated: UndatedPolicy,
    /// Radius of the picker's clock face, in canvas units.
    pub dial_radius: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_file: None,
            undated: UndatedPolicy::default(),
            dial_radius: DEFAULT_RADIUS,
        }
    }
}

impl Config {
    /// Loads the config from `TASKDAY_CONFIG` or the user config directory.
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Config, ConfigError> {
        match config_path() {
            Some(path) => Config::load_from(&path),
            None => Ok(Config::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            debug!(file = %path.display(), "no config file; using defaults");
            return Ok(Config::default());
        }
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg = Config::parse(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(file = %path.display(), "loaded config");
        Ok(cfg)
    }

    pub fn parse(raw: &str) -> Result<Config, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Path of the tasks database file.
    ///
    /// The path is determined in the following order:
    /// 1. `TASKDAY_DB` environment variable.
    /// 2. `data-file` from the config.
    /// 3. `~/.local/share/taskday/tasks.json` (on Linux).
    /// 4. `./tasks.json` (fallback).
    pub fn data_file(&self) -> PathBuf {
        if let Ok(p) = std::env::var(DB_ENV_VAR) {
            return PathBuf::from(p);
        }
        if let Some(p) = &self.data_file {
            return p.clone();
        }
        match dirs::data_local_dir() {
            Some(mut p) => {
                p.push(APP_DIR);
                p.push("tasks.json");
                p
            }
            None => PathBuf::from("tasks.json"),
        }
    }
}

fn config_path() -> Option<PathBuf> {
    if let Ok(raw) = std::env::var(CONFIG_ENV_VAR) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    dirs::config_dir().map(|mut p| {
        p.push(APP_DIR);
        p.push("config.toml");
        p
    })
}
