//! In-memory system of record for reports.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::debug;

use super::types::{Report, ReportDraft, ReportId};
use crate::error::DuplicateIdError;

#[derive(Debug, Default)]
struct Inner {
  reports: Vec<Report>,
  ids: HashSet<ReportId>,
  /// Last sequence number handed out by `next_id`
  sequence: u64,
}

impl Inner {
  /// Next zero-padded sequence id not already taken. Ids widen past "999"
  /// and `ReportId` orders them numerically.
  fn next_id(&mut self) -> ReportId {
    loop {
      self.sequence += 1;
      let candidate = ReportId::from(format!("{:03}", self.sequence));
      if !self.ids.contains(&candidate) {
        return candidate;
      }
    }
  }

  fn push(&mut self, report: Report) {
    self.ids.insert(report.id.clone());
    self.reports.push(report);
  }
}

/// Shared handle to an ordered, append-only collection of reports.
///
/// Cloning the handle shares the underlying collection. Insertion order is
/// display order. Each append happens under one lock, so `list()` never sees
/// a half-written report.
#[derive(Debug, Clone, Default)]
pub struct ReportStore {
  inner: Arc<Mutex<Inner>>,
  latency: Duration,
}

impl ReportStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Build a store from seed reports, in order.
  pub fn seeded(reports: impl IntoIterator<Item = Report>) -> Result<Self, DuplicateIdError> {
    let mut inner = Inner::default();
    for report in reports {
      if inner.ids.contains(&report.id) {
        return Err(DuplicateIdError(report.id));
      }
      inner.push(report);
    }
    inner.sequence = inner.reports.len() as u64;

    Ok(Self {
      inner: Arc::new(Mutex::new(inner)),
      latency: Duration::ZERO,
    })
  }

  /// Delay every read and write by `latency`.
  pub fn with_latency(mut self, latency: Duration) -> Self {
    self.latency = latency;
    self
  }

  fn lock(&self) -> MutexGuard<'_, Inner> {
    self.inner.lock().unwrap_or_else(PoisonError::into_inner)
  }

  async fn simulate_latency(&self) {
    if !self.latency.is_zero() {
      tokio::time::sleep(self.latency).await;
    }
  }

  /// Snapshot of all reports in insertion order.
  pub async fn list(&self) -> Vec<Report> {
    self.simulate_latency().await;
    self.lock().reports.clone()
  }

  /// Append a report and return it as stored.
  ///
  /// A draft without an id gets the next free sequence id. A draft whose id
  /// is already taken is rejected.
  pub async fn append(&self, draft: ReportDraft) -> Result<Report, DuplicateIdError> {
    self.simulate_latency().await;

    let mut inner = self.lock();
    let id = match draft.id.clone() {
      Some(id) if inner.ids.contains(&id) => return Err(DuplicateIdError(id)),
      Some(id) => id,
      None => inner.next_id(),
    };

    let report = draft.into_report(id);
    inner.push(report.clone());
    debug!(id = %report.id, total = inner.reports.len(), "report appended");

    Ok(report)
  }

  pub fn len(&self) -> usize {
    self.lock().reports.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::reports::seed::builtin_reports;
  use crate::reports::types::{Rank, Sleep, User, UserId};
  use chrono::NaiveDate;

  fn draft(id: Option<&str>, sleep: Sleep) -> ReportDraft {
    ReportDraft {
      id: id.map(ReportId::from),
      date: NaiveDate::from_ymd_opt(2024, 10, 1).unwrap(),
      sleep,
      location: "Dormitory A".to_string(),
      user: User {
        id: UserId::from("U100"),
        name: "Emily Davis".to_string(),
        rank: Rank::Private,
      },
    }
  }

  #[tokio::test]
  async fn test_list_preserves_seed_order() {
    let store = ReportStore::seeded(builtin_reports()).unwrap();
    let ids: Vec<String> = store
      .list()
      .await
      .iter()
      .map(|r| r.id.to_string())
      .collect();
    assert_eq!(ids, vec!["001", "002", "003", "004"]);
  }

  #[tokio::test]
  async fn test_append_assigns_next_sequence_id() {
    let store = ReportStore::seeded(builtin_reports()).unwrap();
    let stored = store.append(draft(None, Sleep::Awake)).await.unwrap();

    assert_eq!(stored.id.as_str(), "005");
    let reports = store.list().await;
    assert_eq!(reports.len(), 5);
    assert_eq!(reports.last(), Some(&stored));
  }

  #[tokio::test]
  async fn test_sequence_ids_stay_ordered_past_999() {
    let template = builtin_reports().remove(0);
    let seed = (1..=999).map(|n| Report {
      id: ReportId::from(format!("{:03}", n)),
      ..template.clone()
    });
    let store = ReportStore::seeded(seed).unwrap();

    let stored = store.append(draft(None, Sleep::Awake)).await.unwrap();
    assert_eq!(stored.id.as_str(), "1000");

    let reports = store.list().await;
    let max = reports.iter().map(|r| &r.id).max();
    assert_eq!(max, Some(&stored.id));
  }

  #[tokio::test]
  async fn test_append_keeps_free_caller_id() {
    let store = ReportStore::new();
    let stored = store
      .append(draft(Some("custom"), Sleep::Asleep { duration: 3 }))
      .await
      .unwrap();
    assert_eq!(stored.id.as_str(), "custom");
  }

  #[tokio::test]
  async fn test_append_rejects_duplicate_id() {
    let store = ReportStore::seeded(builtin_reports()).unwrap();
    let err = store
      .append(draft(Some("003"), Sleep::Awake))
      .await
      .unwrap_err();

    assert_eq!(err, DuplicateIdError(ReportId::from("003")));
    assert_eq!(store.len(), 4);
  }

  #[tokio::test]
  async fn test_generated_ids_skip_taken_ones() {
    let store = ReportStore::new();
    store.append(draft(Some("002"), Sleep::Awake)).await.unwrap();

    let first = store.append(draft(None, Sleep::Awake)).await.unwrap();
    let second = store.append(draft(None, Sleep::Awake)).await.unwrap();

    assert_eq!(first.id.as_str(), "001");
    assert_eq!(second.id.as_str(), "003");
  }

  #[tokio::test]
  async fn test_ids_stay_unique_under_concurrent_appends() {
    let store = ReportStore::seeded(builtin_reports()).unwrap();

    let handles: Vec<_> = (0..16)
      .map(|_| {
        let store = store.clone();
        tokio::spawn(async move { store.append(draft(None, Sleep::Awake)).await })
      })
      .collect();
    for handle in handles {
      handle.await.unwrap().unwrap();
    }

    let reports = store.list().await;
    let unique: HashSet<_> = reports.iter().map(|r| r.id.clone()).collect();
    assert_eq!(reports.len(), 20);
    assert_eq!(unique.len(), 20);
  }

  #[test]
  fn test_seeded_rejects_duplicate_seed_ids() {
    let mut reports = builtin_reports();
    reports.push(reports[0].clone());
    let err = ReportStore::seeded(reports).unwrap_err();
    assert_eq!(err.0.as_str(), "001");
  }

  #[tokio::test]
  async fn test_latency_delays_reads() {
    let store = ReportStore::new().with_latency(Duration::from_millis(20));
    let started = std::time::Instant::now();
    store.list().await;
    assert!(started.elapsed() >= Duration::from_millis(20));
  }
}
