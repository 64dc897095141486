use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::tui::theme::ThemeSection;

pub const HOME_ENV: &str = "TICKLIST_HOME";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// SQLite file holding the task list. Default: `<base>/ticklist.db`
    #[serde(default)]
    pub data_file: Option<PathBuf>,

    /// How long the TUI waits for input before redrawing, in milliseconds.
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,

    #[serde(default)]
    pub log: LogConfig,

    #[serde(default)]
    pub theme: ThemeSection,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_file: None,
            tick_rate_ms: default_tick_rate_ms(),
            log: LogConfig::default(),
            theme: ThemeSection::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LogConfig {
    /// Filter directive such as `"info"` or `"ticklist=debug"`. Unset means
    /// the command line decides.
    #[serde(default)]
    pub level: Option<String>,
}

fn default_tick_rate_ms() -> u64 {
    250
}

impl Config {
    /// Where the task database lives, honouring `data_file`.
    pub fn data_path(&self) -> Result<PathBuf> {
        match &self.data_file {
            Some(path) => Ok(path.clone()),
            None => db_path(),
        }
    }
}

/// Returns the base ticklist directory: `$TICKLIST_HOME` or ~/.ticklist/
pub fn base_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let home = dirs::home_dir().context("could not determine home directory")?;
    Ok(home.join(".ticklist"))
}

/// Returns the path to the default `SQLite` database
pub fn db_path() -> Result<PathBuf> {
    Ok(base_dir()?.join("ticklist.db"))
}

pub fn log_path() -> Result<PathBuf> {
    Ok(base_dir()?.join("ticklist.log"))
}

pub fn config_path() -> Result<PathBuf> {
    Ok(base_dir()?.join("config.toml"))
}

/// Ensure the base directory exists
pub fn ensure_dirs() -> Result<()> {
    let base = base_dir()?;
    fs::create_dir_all(&base).with_context(|| format!("failed to create {}", base.display()))?;
    Ok(())
}

/// Load config from `<base>/config.toml` (or return defaults if it doesn't exist)
pub fn load() -> Result<Config> {
    load_from(&config_path()?)
}

pub fn load_from(path: &Path) -> Result<Config> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        parse(&content).with_context(|| format!("failed to parse {}", path.display()))
    } else {
        Ok(Config::default())
    }
}

fn parse(content: &str) -> Result<Config> {
    Ok(toml::from_str(content)?)
}
