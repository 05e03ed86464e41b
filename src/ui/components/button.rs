use ratatui::prelude::*;

/// Single-line action button. Rendered dimmed and with its busy label while
/// disabled, underlined while it has keyboard focus.
#[derive(Debug, Clone)]
pub struct ActionButton {
  label: &'static str,
  busy_label: &'static str,
  disabled: bool,
  focused: bool,
}

impl ActionButton {
  pub fn new(label: &'static str, busy_label: &'static str) -> Self {
    Self {
      label,
      busy_label,
      disabled: false,
      focused: false,
    }
  }

  pub fn disabled(mut self, disabled: bool) -> Self {
    self.disabled = disabled;
    self
  }

  pub fn focused(mut self, focused: bool) -> Self {
    self.focused = focused;
    self
  }

  pub fn text(&self) -> String {
    let label = if self.disabled {
      self.busy_label
    } else {
      self.label
    };
    format!("[ {} ]", label)
  }

  /// Width needed to render the button
  pub fn width(&self) -> u16 {
    self.text().chars().count() as u16
  }
}

impl Widget for &ActionButton {
  fn render(self, area: Rect, buf: &mut Buffer) {
    let mut style = if self.disabled {
      Style::default().fg(Color::DarkGray)
    } else {
      Style::default()
        .fg(Color::Black)
        .bg(Color::Green)
        .add_modifier(Modifier::BOLD)
    };
    if self.focused {
      style = style.add_modifier(Modifier::UNDERLINED);
    }
    Line::styled(self.text(), style).render(area, buf);
  }
}
