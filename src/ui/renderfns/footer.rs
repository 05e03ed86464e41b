use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the footer: the view breadcrumb on the left and the current view's
/// status, if any, on the right.
pub fn draw_footer(frame: &mut Frame, area: Rect, breadcrumb: &[String], status: Option<&str>) {
  let style = Style::default().bg(Color::Black);
  frame.render_widget(Paragraph::new(breadcrumb_line(breadcrumb)).style(style), area);

  if let Some(status) = status {
    let text = format!("{} ", status);
    let width = (text.chars().count() as u16).min(area.width);
    let status_area = Rect {
      x: area.right() - width,
      width,
      ..area
    };
    let paragraph = Paragraph::new(text).style(Style::default().fg(Color::DarkGray).bg(Color::Black));
    frame.render_widget(paragraph, status_area);
  }
}

fn breadcrumb_line(breadcrumb: &[String]) -> Line<'static> {
  let last = breadcrumb.len().saturating_sub(1);
  let mut spans = vec![Span::raw(" ")];

  for (i, part) in breadcrumb.iter().enumerate() {
    if i > 0 {
      spans.push(Span::styled(" > ", Style::default().fg(Color::DarkGray)));
    }
    // Current view highlighted
    let style = if i == last {
      Style::default().fg(Color::Cyan).bold()
    } else {
      Style::default().fg(Color::White)
    };
    spans.push(Span::styled(part.clone(), style));
  }

  Line::from(spans)
}

#[cfg(test)]
mod tests {
  use super::*;
  use ratatui::backend::TestBackend;
  use ratatui::Terminal;

  fn render(breadcrumb: &[String], status: Option<&str>) -> String {
    let mut terminal = Terminal::new(TestBackend::new(40, 1)).unwrap();
    terminal
      .draw(|frame| draw_footer(frame, frame.area(), breadcrumb, status))
      .unwrap();
    terminal
      .backend()
      .buffer()
      .content()
      .iter()
      .map(|cell| cell.symbol())
      .collect()
  }

  #[test]
  fn test_breadcrumb_highlights_current_view() {
    let line = breadcrumb_line(&["Reports".to_string(), "Report 002".to_string()]);
    let current = line.spans.last().unwrap();
    assert_eq!(current.content, "Report 002");
    assert_eq!(current.style.fg, Some(Color::Cyan));
  }

  #[test]
  fn test_status_is_right_aligned() {
    let text = render(&["Reports".to_string()], Some("4 reports"));
    assert!(text.starts_with(" Reports"));
    assert!(text.ends_with("4 reports "));
  }

  #[test]
  fn test_without_status_only_breadcrumb() {
    let text = render(&["Reports".to_string(), "Report 001".to_string()], None);
    assert_eq!(text.trim_end(), " Reports > Report 001");
  }
}
