use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::reports::types::Report;
use crate::ui::renderfns::{format_duration, sleep_status_color};
use crate::ui::view::{ShortcutInfo, View, ViewAction};

/// Read-only view of a single report and its reporting user
pub struct ReportDetailView {
  report: Report,
}

impl ReportDetailView {
  pub fn new(report: Report) -> Self {
    Self { report }
  }

  fn field<'a>(label: &'a str, value: Span<'a>) -> Line<'a> {
    Line::from(vec![
      Span::styled(format!("{:<10}", label), Style::default().fg(Color::DarkGray)),
      value,
    ])
  }
}

impl View for ReportDetailView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('q') | KeyCode::Esc => ViewAction::Pop,
      _ => ViewAction::None,
    }
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let report = &self.report;
    let status = report.status();

    let block = Block::default()
      .title(format!(" Report {} ", report.id))
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let lines = vec![
      Self::field("Date:", Span::raw(report.date.to_string())),
      Self::field("Location:", Span::raw(report.location.as_str())),
      Self::field(
        "Status:",
        Span::styled(status.as_str(), Style::default().fg(sleep_status_color(status))),
      ),
      Self::field(
        "Duration:",
        Span::raw(format_duration(status, report.duration_hours())),
      ),
      Line::default(),
      Self::field("Name:", Span::raw(report.user.name.as_str())),
      Self::field(
        "Rank:",
        Span::styled(report.user.rank.as_str(), Style::default().fg(Color::Yellow)),
      ),
      Self::field("User ID:", Span::raw(report.user.id.as_str())),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
  }

  fn breadcrumb_label(&self) -> String {
    format!("Report {}", self.report.id)
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![ShortcutInfo::new("q", "back").with_priority(90)]
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::reports::seed::builtin_reports;
  use crossterm::event::KeyModifiers;
  use ratatui::backend::TestBackend;
  use ratatui::Terminal;

  #[test]
  fn test_renders_report_and_user_fields() {
    let mut view = ReportDetailView::new(builtin_reports().remove(1));
    let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
    terminal.draw(|frame| view.render(frame, frame.area())).unwrap();

    let text: String = terminal
      .backend()
      .buffer()
      .content()
      .iter()
      .map(|cell| cell.symbol())
      .collect();
    assert!(text.contains("Report 002"));
    assert!(text.contains("Awake"));
    assert!(text.contains("Jane Smith"));
    assert!(text.contains("Corporal"));
  }

  #[test]
  fn test_back_keys_pop() {
    let mut view = ReportDetailView::new(builtin_reports().remove(0));
    for code in [KeyCode::Char('q'), KeyCode::Esc] {
      let action = view.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
      assert!(matches!(action, ViewAction::Pop));
    }
  }
}
