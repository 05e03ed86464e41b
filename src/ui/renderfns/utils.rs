use ratatui::prelude::Color;

use crate::reports::types::{Rank, SleepStatus};

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Get the display color for a sleep status
pub fn sleep_status_color(status: SleepStatus) -> Color {
  match status {
    SleepStatus::Asleep => Color::Blue,
    SleepStatus::Awake => Color::Yellow,
  }
}

/// Short rank prefix for list rows
pub fn rank_abbrev(rank: Rank) -> &'static str {
  match rank {
    Rank::Sergeant => "Sgt",
    Rank::Corporal => "Cpl",
    Rank::Private => "Pvt",
    Rank::Lieutenant => "Lt",
  }
}

/// Hours asleep, or a dash for awake reports
pub fn format_duration(status: SleepStatus, hours: u32) -> String {
  match status {
    SleepStatus::Asleep => format!("{}h", hours),
    SleepStatus::Awake => "-".to_string(),
  }
}
