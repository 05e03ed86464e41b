//! Wiring of the store, the query cache and the add-report mutation.

use color_eyre::{eyre::eyre, Result};
use tracing::info;

use crate::config::Config;
use crate::query::QueryClient;
use crate::reports::add_report::AddReport;
use crate::reports::seed::{builtin_reports, load_seed_file};
use crate::reports::store::ReportStore;
use crate::reports::types::Report;

/// Everything the views need, built once at startup and cloned into them.
#[derive(Clone)]
pub struct ReportsContext {
  pub store: ReportStore,
  pub client: QueryClient<Vec<Report>>,
  pub add_report: AddReport,
}

impl ReportsContext {
  pub fn from_config(config: &Config) -> Result<Self> {
    let seed = match &config.store.seed_file {
      Some(path) => load_seed_file(path)?,
      None => builtin_reports(),
    };

    let store = ReportStore::seeded(seed)
      .map_err(|e| eyre!("Invalid seed data: {}", e))?
      .with_latency(config.store_latency());
    info!(reports = store.len(), "report store seeded");

    Ok(Self::new(store, QueryClient::new(config.query_options())))
  }

  pub fn new(store: ReportStore, client: QueryClient<Vec<Report>>) -> Self {
    let add_report = AddReport::new(store.clone(), client.clone());
    Self {
      store,
      client,
      add_report,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_config_uses_builtin_seed() {
    let context = ReportsContext::from_config(&Config::default()).unwrap();
    assert_eq!(context.store.len(), 4);
  }

  #[test]
  fn test_missing_seed_file_fails() {
    let mut config = Config::default();
    config.store.seed_file = Some("/nonexistent/seed.yaml".into());
    assert!(ReportsContext::from_config(&config).is_err());
  }
}
