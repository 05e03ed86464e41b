//! Seed data loaded into the store at startup.

use chrono::NaiveDate;
use color_eyre::{eyre::eyre, Result};
use std::path::Path;

use super::types::{Rank, Report, ReportId, Sleep, User, UserId};

fn seed_report(
  id: &str,
  sleep: Sleep,
  location: &str,
  user_id: &str,
  name: &str,
  rank: Rank,
) -> Report {
  Report {
    id: ReportId::from(id),
    // 2024-09-30 is always a valid date
    date: NaiveDate::from_ymd_opt(2024, 9, 30).unwrap_or_default(),
    sleep,
    location: location.to_string(),
    user: User {
      id: UserId::from(user_id),
      name: name.to_string(),
      rank,
    },
  }
}

/// The four reports the demo starts with.
pub fn builtin_reports() -> Vec<Report> {
  vec![
    seed_report(
      "001",
      Sleep::Asleep { duration: 6 },
      "Dormitory A",
      "U001",
      "John Doe",
      Rank::Sergeant,
    ),
    seed_report(
      "002",
      Sleep::Awake,
      "Dormitory B",
      "U002",
      "Jane Smith",
      Rank::Corporal,
    ),
    seed_report(
      "003",
      Sleep::Asleep { duration: 4 },
      "Dormitory C",
      "U003",
      "Mike Johnson",
      Rank::Private,
    ),
    seed_report(
      "004",
      Sleep::Asleep { duration: 7 },
      "Dormitory D",
      "U004",
      "Emily Davis",
      Rank::Lieutenant,
    ),
  ]
}

/// Load seed reports from a YAML file holding a list of reports.
pub fn load_seed_file(path: &Path) -> Result<Vec<Report>> {
  let contents = std::fs::read_to_string(path)
    .map_err(|e| eyre!("Failed to read seed file {}: {}", path.display(), e))?;

  serde_yaml::from_str(&contents)
    .map_err(|e| eyre!("Failed to parse seed file {}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::reports::types::SleepStatus;

  #[test]
  fn test_builtin_reports() {
    let reports = builtin_reports();
    assert_eq!(reports.len(), 4);
    assert_eq!(reports[1].status(), SleepStatus::Awake);
    assert_eq!(reports[3].user.rank, Rank::Lieutenant);
    assert!(reports.iter().all(|r| r.date.to_string() == "2024-09-30"));
  }

  #[test]
  fn test_load_seed_file() {
    let path = std::env::temp_dir().join(format!("sleep-reports-seed-{}.yaml", std::process::id()));
    std::fs::write(
      &path,
      r#"
- id: "A1"
  date: 2024-10-02
  sleepStatus: Asleep
  duration: 5
  location: Dormitory C
  user:
    id: U010
    name: Mike Johnson
    rank: Private
"#,
    )
    .unwrap();

    let reports = load_seed_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].duration_hours(), 5);
    assert_eq!(reports[0].location, "Dormitory C");
  }

  #[test]
  fn test_load_missing_seed_file() {
    let err = load_seed_file(Path::new("/nonexistent/seed.yaml")).unwrap_err();
    assert!(err.to_string().contains("Failed to read seed file"));
  }
}
