pub mod components;
pub mod renderfns;
pub mod view;
pub mod views;

use crate::app::App;
use ratatui::prelude::*;
use ratatui::widgets::ListState;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &mut App) {
  let [header, content, footer] = Layout::vertical([
    Constraint::Length(1), // Header
    Constraint::Min(1),    // Main content
    Constraint::Length(1), // Breadcrumb
  ])
  .areas(frame.area());

  let shortcuts = app.shortcuts();
  renderfns::draw_header(frame, header, app.title(), &shortcuts);

  if let Some(view) = app.current_view_mut() {
    view.render(frame, content);
  }

  let status = app.status();
  renderfns::draw_footer(frame, footer, &app.breadcrumb(), status.as_deref());
}

/// Keep a list selection inside `len` items, selecting the first item when
/// nothing is selected yet.
pub fn ensure_valid_selection(list_state: &mut ListState, len: usize) {
  if len == 0 {
    list_state.select(None);
    return;
  }
  match list_state.selected() {
    Some(idx) if idx >= len => list_state.select(Some(len - 1)),
    Some(_) => {}
    None => list_state.select(Some(0)),
  }
}
