//! Demo report generation.
//!
//! The core never generates data itself. Anything that can produce a
//! [`ReportDraft`] plugs in here; [`RandomReports`] is the one the UI uses.

use chrono::{NaiveDate, Utc};
use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::types::{Rank, ReportDraft, Sleep, User, UserId};

const NAMES: &[&str] = &["John Doe", "Jane Smith", "Mike Johnson", "Emily Davis"];

const LOCATIONS: &[&str] = &["Dormitory A", "Dormitory B", "Dormitory C", "Dormitory D"];

/// Longest generated sleep, exclusive
const MAX_DURATION_HOURS: u32 = 8;

/// Produces report drafts
pub trait ReportGenerator: Send {
  fn generate(&mut self) -> ReportDraft;
}

/// Random drafts dated today. Seed it for reproducible output.
pub struct RandomReports<R: Rng> {
  rng: R,
  date: Option<NaiveDate>,
}

impl RandomReports<StdRng> {
  /// Entropy-seeded generator, or a deterministic one when `seed` is given.
  pub fn from_seed(seed: Option<u64>) -> Self {
    let rng = match seed {
      Some(seed) => StdRng::seed_from_u64(seed),
      None => StdRng::from_entropy(),
    };
    Self::new(rng)
  }
}

impl<R: Rng> RandomReports<R> {
  pub fn new(rng: R) -> Self {
    Self { rng, date: None }
  }

  /// Pin the report date instead of using today's (UTC).
  pub fn with_date(mut self, date: NaiveDate) -> Self {
    self.date = Some(date);
    self
  }

  fn pick(&mut self, options: &[&str]) -> String {
    options
      .choose(&mut self.rng)
      .copied()
      .unwrap_or_default()
      .to_string()
  }

  fn random_id(&mut self) -> String {
    (&mut self.rng)
      .sample_iter(&Alphanumeric)
      .take(9)
      .map(|c| char::from(c).to_ascii_lowercase())
      .collect()
  }

  fn random_sleep(&mut self) -> Sleep {
    if self.rng.gen_bool(0.5) {
      Sleep::Asleep {
        duration: self.rng.gen_range(0..MAX_DURATION_HOURS),
      }
    } else {
      Sleep::Awake
    }
  }
}

impl<R: Rng + Send> ReportGenerator for RandomReports<R> {
  fn generate(&mut self) -> ReportDraft {
    let sleep = self.random_sleep();
    let location = self.pick(LOCATIONS);
    let name = self.pick(NAMES);
    let rank = *Rank::ALL.choose(&mut self.rng).unwrap_or(&Rank::Private);
    let user_id = self.random_id();

    ReportDraft {
      id: None,
      date: self.date.unwrap_or_else(|| Utc::now().date_naive()),
      sleep,
      location,
      user: User {
        id: UserId::from(user_id),
        name,
        rank,
      },
    }
  }
}
