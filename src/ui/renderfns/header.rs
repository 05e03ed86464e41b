use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::ui::view::ShortcutInfo;

/// Draw the header bar with title and the current view's shortcuts
pub fn draw_header(frame: &mut Frame, area: Rect, title: &str, shortcuts: &[ShortcutInfo]) {
  let paragraph = Paragraph::new(header_line(title, shortcuts)).style(Style::default().bg(Color::Black));
  frame.render_widget(paragraph, area);
}

fn header_line(title: &str, shortcuts: &[ShortcutInfo]) -> Line<'static> {
  let mut spans = vec![
    Span::styled(format!(" {} ", title), Style::default().fg(Color::Cyan).bold()),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::raw(" "),
  ];

  let mut sorted: Vec<&ShortcutInfo> = shortcuts.iter().collect();
  sorted.sort_by_key(|s| s.priority);

  for (i, shortcut) in sorted.into_iter().enumerate() {
    if i > 0 {
      spans.push(Span::raw("   "));
    }
    // Keys and brackets highlighted, descriptions dimmed
    let key_style = if shortcut.enabled {
      Style::default().fg(Color::Cyan)
    } else {
      Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
    };
    spans.push(Span::styled(format!("<{}>", shortcut.key), key_style));
    spans.push(Span::styled(
      format!(" {}", shortcut.label),
      Style::default().fg(Color::DarkGray),
    ));
  }

  Line::from(spans)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_shortcuts_sorted_by_priority() {
    let shortcuts = [
      ShortcutInfo::new("q", "quit").with_priority(90),
      ShortcutInfo::new("a", "add").with_priority(10),
    ];
    let text: String = header_line("Sleep Reports", &shortcuts)
      .spans
      .iter()
      .map(|s| s.content.as_ref())
      .collect();

    assert!(text.starts_with(" Sleep Reports │"));
    assert!(text.find("<a>").unwrap() < text.find("<q>").unwrap());
  }

  #[test]
  fn test_disabled_shortcut_is_dimmed() {
    let shortcuts = [ShortcutInfo::new("a", "add").disabled_if(true)];
    let line = header_line("t", &shortcuts);
    let key = line.spans.iter().find(|s| s.content == "<a>").unwrap();
    assert_eq!(key.style.fg, Some(Color::DarkGray));
  }
}
