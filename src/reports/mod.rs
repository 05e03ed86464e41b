//! Sleep status reports: the domain model, the in-memory store, and the
//! write that keeps the cached list in sync.

pub mod add_report;
pub mod generator;
pub mod seed;
pub mod store;
pub mod types;

use std::future::Future;
use std::pin::Pin;

use crate::error::FetchError;
use crate::query::QueryKey;
use store::ReportStore;
use types::Report;

type ReportsFuture = Pin<Box<dyn Future<Output = Result<Vec<Report>, FetchError>> + Send>>;

/// Cache key of the report list
pub fn reports_key() -> QueryKey {
  QueryKey::from("reports")
}

/// Fetch function for [`reports_key`]: a snapshot of the store.
pub fn fetch_reports(store: ReportStore) -> impl Fn() -> ReportsFuture + Send + Sync + 'static {
  move || -> ReportsFuture {
    let store = store.clone();
    Box::pin(async move { Ok(store.list().await) })
  }
}
