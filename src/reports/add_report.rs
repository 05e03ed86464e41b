use tracing::{info, warn};

use super::reports_key;
use super::store::ReportStore;
use super::types::{Report, ReportDraft};
use crate::error::WriteError;
use crate::query::QueryClient;

/// Appends a report and refreshes the cached report list.
#[derive(Clone)]
pub struct AddReport {
  store: ReportStore,
  client: QueryClient<Vec<Report>>,
}

impl AddReport {
  pub fn new(store: ReportStore, client: QueryClient<Vec<Report>>) -> Self {
    Self { store, client }
  }

  /// Store `draft` and invalidate the report list.
  ///
  /// Nothing is invalidated if the store rejects the draft.
  pub async fn run(&self, draft: ReportDraft) -> Result<Report, WriteError> {
    let report = self.store.append(draft).await.map_err(|e| {
      warn!(error = %e, "report rejected");
      WriteError::from(e)
    })?;

    info!(id = %report.id, location = %report.location, status = %report.status(), "report added");
    self.client.invalidate(&reports_key());

    Ok(report)
  }
}
