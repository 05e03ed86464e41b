//! File logging. The terminal belongs to the UI, so log output goes to a
//! file through a non-blocking writer.

use color_eyre::{eyre::eyre, Result};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

const LOG_FILE_NAME: &str = "sleep-reports.log";

/// Install the global subscriber. Keep the returned guard alive until exit
/// so buffered lines are flushed.
pub fn init(config: &LogConfig) -> Result<WorkerGuard> {
  let path = match &config.file {
    Some(path) => path.clone(),
    None => default_path()?,
  };
  let (dir, file_name) = split_path(&path);

  std::fs::create_dir_all(&dir)
    .map_err(|e| eyre!("Failed to create log directory {}: {}", dir.display(), e))?;

  let appender = tracing_appender::rolling::never(&dir, file_name);
  let (writer, guard) = tracing_appender::non_blocking(appender);

  let filter = EnvFilter::try_from_default_env()
    .or_else(|_| EnvFilter::try_new(&config.level))
    .map_err(|e| eyre!("Invalid log level {:?}: {}", config.level, e))?;

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(writer)
    .with_ansi(false)
    .with_target(true)
    .try_init()
    .map_err(|e| eyre!("Failed to install tracing subscriber: {}", e))?;

  Ok(guard)
}

/// Get the default log file path
fn default_path() -> Result<PathBuf> {
  let data_dir = dirs::data_dir()
    .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
    .ok_or_else(|| eyre!("Could not determine data directory"))?;

  Ok(data_dir.join("sleep-reports").join(LOG_FILE_NAME))
}

fn split_path(path: &Path) -> (PathBuf, String) {
  let dir = path
    .parent()
    .filter(|p| !p.as_os_str().is_empty())
    .map(Path::to_path_buf)
    .unwrap_or_else(|| PathBuf::from("."));
  let file_name = path
    .file_name()
    .map(|n| n.to_string_lossy().into_owned())
    .unwrap_or_else(|| LOG_FILE_NAME.to_string());
  (dir, file_name)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_split_path() {
    let (dir, name) = split_path(Path::new("/var/log/sleep.log"));
    assert_eq!(dir, PathBuf::from("/var/log"));
    assert_eq!(name, "sleep.log");
  }

  #[test]
  fn test_split_bare_file_name() {
    let (dir, name) = split_path(Path::new("sleep.log"));
    assert_eq!(dir, PathBuf::from("."));
    assert_eq!(name, "sleep.log");
  }

  #[test]
  fn test_default_path_file_name() {
    if let Ok(path) = default_path() {
      assert!(path.ends_with("sleep-reports/sleep-reports.log"));
    }
  }
}
