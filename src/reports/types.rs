use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Identifier of a report, unique within a store.
///
/// Ids made only of digits order numerically, so generated ids keep their
/// sequence order past "999". Other ids order as plain strings, after the
/// numeric ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportId(String);

impl ReportId {
  pub fn as_str(&self) -> &str {
    &self.0
  }

  fn is_numeric(&self) -> bool {
    !self.0.is_empty() && self.0.bytes().all(|b| b.is_ascii_digit())
  }
}

impl Ord for ReportId {
  fn cmp(&self, other: &Self) -> Ordering {
    match (self.is_numeric(), other.is_numeric()) {
      // Longer digit strings are larger once zero padding runs out
      (true, true) => {
        let a = self.0.trim_start_matches('0');
        let b = other.0.trim_start_matches('0');
        a.len()
          .cmp(&b.len())
          .then_with(|| a.cmp(b))
          .then_with(|| self.0.cmp(&other.0))
      }
      (true, false) => Ordering::Less,
      (false, true) => Ordering::Greater,
      (false, false) => self.0.cmp(&other.0),
    }
  }
}

impl PartialOrd for ReportId {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl From<&str> for ReportId {
  fn from(s: &str) -> Self {
    Self(s.to_string())
  }
}

impl From<String> for ReportId {
  fn from(s: String) -> Self {
    Self(s)
  }
}

impl fmt::Display for ReportId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// Identifier of a user
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl From<&str> for UserId {
  fn from(s: &str) -> Self {
    Self(s.to_string())
  }
}

impl From<String> for UserId {
  fn from(s: String) -> Self {
    Self(s)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
  Sergeant,
  Corporal,
  Private,
  Lieutenant,
}

impl Rank {
  pub const ALL: [Rank; 4] = [
    Rank::Sergeant,
    Rank::Corporal,
    Rank::Private,
    Rank::Lieutenant,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Rank::Sergeant => "Sergeant",
      Rank::Corporal => "Corporal",
      Rank::Private => "Private",
      Rank::Lieutenant => "Lieutenant",
    }
  }
}

impl fmt::Display for Rank {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// The person a report is about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id: UserId,
  pub name: String,
  pub rank: Rank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SleepStatus {
  Asleep,
  Awake,
}

impl SleepStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      SleepStatus::Asleep => "Asleep",
      SleepStatus::Awake => "Awake",
    }
  }
}

impl fmt::Display for SleepStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Observed sleep state. Only a sleeping person has a duration, so an awake
/// report always reads as zero hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "sleepStatus")]
pub enum Sleep {
  Asleep {
    /// Hours asleep
    duration: u32,
  },
  Awake,
}

impl Sleep {
  pub fn status(&self) -> SleepStatus {
    match self {
      Sleep::Asleep { .. } => SleepStatus::Asleep,
      Sleep::Awake => SleepStatus::Awake,
    }
  }

  pub fn duration_hours(&self) -> u32 {
    match self {
      Sleep::Asleep { duration } => *duration,
      Sleep::Awake => 0,
    }
  }
}

/// A single sleep status report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
  pub id: ReportId,
  pub date: NaiveDate,
  #[serde(flatten)]
  pub sleep: Sleep,
  /// Dormitory identifier
  pub location: String,
  pub user: User,
}

impl Report {
  pub fn status(&self) -> SleepStatus {
    self.sleep.status()
  }

  pub fn duration_hours(&self) -> u32 {
    self.sleep.duration_hours()
  }
}

/// Everything needed to build a report. Leave `id` empty to let the store
/// assign one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDraft {
  pub id: Option<ReportId>,
  pub date: NaiveDate,
  pub sleep: Sleep,
  pub location: String,
  pub user: User,
}

impl ReportDraft {
  pub(crate) fn into_report(self, id: ReportId) -> Report {
    Report {
      id,
      date: self.date,
      sleep: self.sleep,
      location: self.location,
      user: self.user,
    }
  }
}
