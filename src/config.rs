use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::query::QueryOptions;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Custom title for header (defaults to "Sleep Reports")
  pub title: Option<String>,
  /// UI refresh interval in milliseconds
  pub tick_rate_ms: Option<u64>,
  pub query: QueryConfig,
  pub store: StoreConfig,
  pub generator: GeneratorConfig,
  pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
  /// Seconds a fetched report list counts as fresh
  pub stale_time_secs: u64,
  /// Keep showing the previous list while a refetch is pending
  pub keep_previous_data: bool,
  /// Refetch a stale report list when the terminal regains focus
  pub refetch_on_focus: bool,
}

impl Default for QueryConfig {
  fn default() -> Self {
    Self {
      stale_time_secs: 60,
      keep_previous_data: true,
      refetch_on_focus: true,
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
  /// Artificial delay applied to every store read and write
  pub latency_ms: u64,
  /// YAML file with the initial reports (built-in seed if unset)
  pub seed_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
  /// Fixed RNG seed for reproducible demo reports
  pub seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
  /// Default filter directive; RUST_LOG takes precedence
  pub level: String,
  /// Log file path (defaults to the data directory)
  pub file: Option<PathBuf>,
}

impl Default for LogConfig {
  fn default() -> Self {
    Self {
      level: "info".to_string(),
      file: None,
    }
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./sleep-reports.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/sleep-reports/config.yaml
  ///
  /// Falls back to defaults when no file is found.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("sleep-reports.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("sleep-reports").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> std::result::Result<Self, serde_yaml::Error> {
    // An empty file deserializes as null
    if contents.trim().is_empty() {
      return Ok(Self::default());
    }
    serde_yaml::from_str(contents)
  }

  pub fn title(&self) -> &str {
    self.title.as_deref().unwrap_or("Sleep Reports")
  }

  pub fn tick_rate(&self) -> Duration {
    Duration::from_millis(self.tick_rate_ms.unwrap_or(250))
  }

  pub fn query_options(&self) -> QueryOptions {
    QueryOptions {
      stale_time: Duration::from_secs(self.query.stale_time_secs),
      keep_previous_data: self.query.keep_previous_data,
      refetch_on_focus: self.query.refetch_on_focus,
    }
  }

  pub fn store_latency(&self) -> Duration {
    Duration::from_millis(self.store.latency_ms)
  }
}
