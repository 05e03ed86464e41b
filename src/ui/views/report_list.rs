use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

use crate::context::ReportsContext;
use crate::query::{Mutation, MutationState, QueryClient, QueryState, Subscription};
use crate::reports::generator::ReportGenerator;
use crate::reports::store::ReportStore;
use crate::reports::types::{Report, ReportDraft, ReportId};
use crate::reports::{fetch_reports, reports_key};
use crate::ui::components::ActionButton;
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::{format_duration, rank_abbrev, sleep_status_color, truncate};
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crate::ui::views::ReportDetailView;

/// Which part of the view receives Enter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
  List,
  AddButton,
}

/// Root view: the cached report list plus the "Add New Report" button
pub struct ReportListView {
  store: ReportStore,
  client: QueryClient<Vec<Report>>,
  reports: Subscription<Vec<Report>>,
  add: Mutation<ReportDraft, Report>,
  generator: Box<dyn ReportGenerator>,
  list_state: ListState,
  focus: Focus,
  /// Report to select once the refreshed list contains it
  follow: Option<ReportId>,
}

impl ReportListView {
  pub fn new(context: &ReportsContext, generator: Box<dyn ReportGenerator>) -> Self {
    let reports = context
      .client
      .query(&reports_key(), fetch_reports(context.store.clone()));

    let add_report = context.add_report.clone();
    let add = Mutation::new(move |draft: ReportDraft| {
      let add_report = add_report.clone();
      async move { add_report.run(draft).await }
    });

    Self {
      store: context.store.clone(),
      client: context.client.clone(),
      reports,
      add,
      generator,
      list_state: ListState::default(),
      focus: Focus::List,
      follow: None,
    }
  }

  fn visible_reports(&self) -> &[Report] {
    self
      .reports
      .current()
      .visible_data()
      .map(|v| v.as_slice())
      .unwrap_or(&[])
  }

  fn add_report(&mut self) {
    if self.add.is_pending() {
      return;
    }
    let draft = self.generator.generate();
    self.add.mutate(draft);
  }

  fn title(&self) -> String {
    let entry = self.reports.current();
    match entry.state() {
      QueryState::Error(_) => " Reports (error) ".to_string(),
      QueryState::Pending if entry.placeholder().is_none() => " Reports (loading...) ".to_string(),
      _ if entry.is_fetching() => {
        format!(" Reports ({}) (refreshing...) ", self.visible_reports().len())
      }
      _ => format!(" Reports ({}) ", self.visible_reports().len()),
    }
  }

  fn render_list(&mut self, frame: &mut Frame, area: Rect) {
    let len = self.visible_reports().len();
    ensure_valid_selection(&mut self.list_state, len);

    let block = Block::default()
      .title(self.title())
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let entry = self.reports.current();
    if let Some(error) = entry.error() {
      let text = vec![
        Line::styled(error.to_string(), Style::default().fg(Color::Red)),
        Line::default(),
        Line::styled("Press 'r' to retry.", Style::default().fg(Color::DarkGray)),
      ];
      let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: false });
      frame.render_widget(paragraph, area);
      return;
    }

    if entry.visible_data().is_none() {
      let paragraph = Paragraph::new("Loading...")
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }

    if len == 0 {
      let paragraph = Paragraph::new("No reports yet. Press 'a' to add one.")
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }

    // Collect items first to avoid borrow conflicts with list_state
    let items: Vec<ListItem> = self.visible_reports().iter().map(report_item).collect();

    let list = List::new(items)
      .block(block)
      .highlight_style(
        Style::default()
          .bg(Color::DarkGray)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut self.list_state);
  }

  fn render_actions(&self, frame: &mut Frame, area: Rect) {
    let button = ActionButton::new("Add New Report", "Adding...")
      .disabled(self.add.is_pending())
      .focused(self.focus == Focus::AddButton);
    let [button_area, message_area] = Layout::horizontal([
      Constraint::Length(button.width() + 1),
      Constraint::Min(0),
    ])
    .areas(area);

    frame.render_widget(&button, button_area);

    let message = match self.add.state() {
      MutationState::Success(report) => Line::styled(
        format!("Added report {} ({})", report.id, report.location),
        Style::default().fg(Color::Green),
      ),
      MutationState::Error(e) => {
        Line::styled(format!("Add failed: {}", e), Style::default().fg(Color::Red))
      }
      MutationState::Idle | MutationState::Pending => Line::default(),
    };
    frame.render_widget(Paragraph::new(message), message_area);
  }

  // Key handling helpers for or_else chain pattern
  fn handle_navigation(&mut self, key: KeyEvent) -> Option<ViewAction> {
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => {
        self.list_state.select_next();
        Some(ViewAction::None)
      }
      KeyCode::Char('k') | KeyCode::Up => {
        self.list_state.select_previous();
        Some(ViewAction::None)
      }
      _ => None,
    }
  }

  fn handle_actions(&mut self, key: KeyEvent) -> Option<ViewAction> {
    match key.code {
      KeyCode::Char('a') => {
        self.add_report();
        Some(ViewAction::None)
      }
      KeyCode::Char('r') => {
        self.client.invalidate(&reports_key());
        Some(ViewAction::None)
      }
      KeyCode::Tab | KeyCode::BackTab => {
        self.focus = match self.focus {
          Focus::List => Focus::AddButton,
          Focus::AddButton => Focus::List,
        };
        Some(ViewAction::None)
      }
      KeyCode::Enter if self.focus == Focus::AddButton => {
        self.add_report();
        Some(ViewAction::None)
      }
      KeyCode::Enter => {
        let idx = self.list_state.selected()?;
        let report = self.visible_reports().get(idx)?.clone();
        Some(ViewAction::Push(Box::new(ReportDetailView::new(report))))
      }
      KeyCode::Char('q') | KeyCode::Esc => Some(ViewAction::Quit),
      _ => None,
    }
  }
}

fn report_item(report: &Report) -> ListItem<'static> {
  let status = report.status();
  let line = Line::from(vec![
    Span::styled(
      format!("{:<6}", truncate(report.id.as_str(), 6)),
      Style::default().fg(Color::Cyan),
    ),
    Span::raw(" "),
    Span::raw(report.date.to_string()),
    Span::raw("  "),
    Span::raw(format!("{:<12}", truncate(&report.location, 12))),
    Span::styled(
      format!("{:<7}", status.as_str()),
      Style::default().fg(sleep_status_color(status)),
    ),
    Span::raw(format!("{:>4}", format_duration(status, report.duration_hours()))),
    Span::raw("  "),
    Span::styled(
      format!("{:<4}", rank_abbrev(report.user.rank)),
      Style::default().fg(Color::Yellow),
    ),
    Span::raw(truncate(&report.user.name, 24)),
  ]);
  ListItem::new(line)
}

impl View for ReportListView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    self
      .handle_navigation(key)
      .or_else(|| self.handle_actions(key))
      .unwrap_or(ViewAction::None)
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let [list_area, actions_area] =
      Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(area);

    self.render_list(frame, list_area);
    self.render_actions(frame, actions_area);
  }

  fn breadcrumb_label(&self) -> String {
    "Reports".to_string()
  }

  fn tick(&mut self) {
    self.reports.poll();
    if self.add.poll() {
      self.follow = self.add.data().map(|report| report.id.clone());
    }

    if let Some(id) = self.follow.clone() {
      if let Some(idx) = self.visible_reports().iter().position(|r| r.id == id) {
        self.list_state.select(Some(idx));
        self.follow = None;
      }
    }
  }

  fn focus_gained(&mut self) {
    if self.client.options().refetch_on_focus {
      // Only refetches when the cached list is stale
      self
        .client
        .fetch(&reports_key(), fetch_reports(self.store.clone()));
    }
  }

  fn status(&self) -> Option<String> {
    let entry = self.reports.current();
    let status = match entry.state() {
      QueryState::Error(_) => "fetch failed".to_string(),
      QueryState::Pending if entry.placeholder().is_none() => "loading".to_string(),
      _ if entry.is_fetching() => format!("{} reports, refreshing", self.visible_reports().len()),
      _ if entry.is_stale() => format!("{} reports, stale", self.visible_reports().len()),
      _ => format!("{} reports", self.visible_reports().len()),
    };
    Some(status)
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    let (tab_label, enter_label) = match self.focus {
      Focus::List => ("focus button", "details"),
      Focus::AddButton => ("focus list", "add report"),
    };
    vec![
      ShortcutInfo::new("a", "add report")
        .with_priority(10)
        .disabled_if(self.add.is_pending()),
      ShortcutInfo::new("r", "refresh").with_priority(20),
      ShortcutInfo::new("enter", enter_label).with_priority(30),
      ShortcutInfo::new("tab", tab_label).with_priority(40),
      ShortcutInfo::new("q", "quit").with_priority(90),
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::query::{QueryOptions, QueryStatus};
  use crate::reports::generator::RandomReports;
  use crate::reports::seed::builtin_reports;
  use crossterm::event::KeyModifiers;
  use ratatui::backend::TestBackend;
  use ratatui::Terminal;
  use std::time::Duration;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn context(latency: Duration) -> ReportsContext {
    context_with(latency, QueryOptions::default())
  }

  fn context_with(latency: Duration, options: QueryOptions) -> ReportsContext {
    let store = ReportStore::seeded(builtin_reports())
      .unwrap()
      .with_latency(latency);
    ReportsContext::new(store, QueryClient::new(options))
  }

  fn view(context: &ReportsContext) -> ReportListView {
    ReportListView::new(context, Box::new(RandomReports::from_seed(Some(3))))
  }

  fn screen(view: &mut ReportListView) -> String {
    let mut terminal = Terminal::new(TestBackend::new(90, 12)).unwrap();
    terminal.draw(|frame| view.render(frame, frame.area())).unwrap();
    terminal
      .backend()
      .buffer()
      .content()
      .iter()
      .map(|cell| cell.symbol())
      .collect()
  }

  /// Tick until the list shows settled data, or give up.
  async fn tick_until_settled(view: &mut ReportListView) {
    for _ in 0..50 {
      view.tick();
      let entry = view.reports.current();
      if entry.status() != QueryStatus::Pending && !entry.is_fetching() && !view.add.is_pending() {
        return;
      }
      tokio::time::sleep(Duration::from_millis(5)).await;
    }
  }

  #[tokio::test]
  async fn test_shows_loading_then_reports() {
    let context = context(Duration::from_millis(30));
    let mut view = view(&context);

    assert!(screen(&mut view).contains("Loading..."));

    tick_until_settled(&mut view).await;
    let text = screen(&mut view);
    assert!(text.contains("Reports (4)"));
    assert!(text.contains("Dormitory A"));
    assert!(text.contains("[ Add New Report ]"));
  }

  #[tokio::test]
  async fn test_add_key_appends_and_refreshes() {
    let context = context(Duration::ZERO);
    let mut view = view(&context);
    tick_until_settled(&mut view).await;

    view.handle_key(key(KeyCode::Char('a')));
    assert!(view.add.is_pending());
    assert!(!view.shortcuts()[0].enabled);
    assert!(screen(&mut view).contains("[ Adding... ]"));

    tick_until_settled(&mut view).await;
    // One more round for the refetch triggered by the invalidation
    tokio::time::sleep(Duration::from_millis(20)).await;
    view.tick();

    assert_eq!(context.store.len(), 5);
    assert_eq!(view.visible_reports().len(), 5);
    assert_eq!(view.list_state.selected(), Some(4));
    assert!(screen(&mut view).contains("Added report 005"));
  }

  #[tokio::test]
  async fn test_add_while_pending_is_ignored() {
    let context = context(Duration::from_millis(30));
    let mut view = view(&context);
    tick_until_settled(&mut view).await;

    view.handle_key(key(KeyCode::Char('a')));
    view.handle_key(key(KeyCode::Char('a')));
    tick_until_settled(&mut view).await;

    assert_eq!(context.store.len(), 5);
  }

  #[tokio::test]
  async fn test_enter_pushes_detail_view() {
    let context = context(Duration::ZERO);
    let mut view = view(&context);
    tick_until_settled(&mut view).await;
    screen(&mut view);

    match view.handle_key(key(KeyCode::Enter)) {
      ViewAction::Push(detail) => assert_eq!(detail.breadcrumb_label(), "Report 001"),
      _ => panic!("expected a pushed detail view"),
    }
  }

  #[tokio::test]
  async fn test_fetch_error_is_rendered_verbatim() {
    let context = context(Duration::ZERO);
    // Register a failing fetcher before the view does
    context.client.fetch(&reports_key(), || async {
      Err::<Vec<Report>, _>(crate::error::FetchError::new("store offline"))
    });
    let mut view = view(&context);
    tick_until_settled(&mut view).await;

    let text = screen(&mut view);
    assert!(text.contains("Reports (error)"));
    assert!(text.contains("store offline"));
  }

  #[tokio::test]
  async fn test_quit_key() {
    let context = context(Duration::ZERO);
    let mut view = view(&context);
    assert!(matches!(view.handle_key(key(KeyCode::Char('q'))), ViewAction::Quit));
  }

  #[tokio::test]
  async fn test_enter_on_focused_button_adds_report() {
    let context = context(Duration::ZERO);
    let mut view = view(&context);
    tick_until_settled(&mut view).await;

    view.handle_key(key(KeyCode::Tab));
    assert_eq!(view.focus, Focus::AddButton);
    assert!(matches!(view.handle_key(key(KeyCode::Enter)), ViewAction::None));
    tick_until_settled(&mut view).await;

    assert_eq!(context.store.len(), 5);

    view.handle_key(key(KeyCode::Tab));
    assert_eq!(view.focus, Focus::List);
  }

  /// Append behind the cache's back, so only a refetch can show it.
  async fn append_directly(context: &ReportsContext) {
    let draft = RandomReports::from_seed(Some(1)).generate();
    context.store.append(draft).await.unwrap();
  }

  #[tokio::test]
  async fn test_focus_gained_refetches_stale_list() {
    let options = QueryOptions {
      stale_time: Duration::ZERO,
      ..QueryOptions::default()
    };
    let context = context_with(Duration::ZERO, options);
    let mut view = view(&context);
    tick_until_settled(&mut view).await;
    append_directly(&context).await;

    view.focus_gained();
    tick_until_settled(&mut view).await;

    assert_eq!(view.visible_reports().len(), 5);
    assert_eq!(view.status().as_deref(), Some("5 reports"));
  }

  #[tokio::test]
  async fn test_focus_gained_keeps_fresh_list() {
    let context = context(Duration::ZERO);
    let mut view = view(&context);
    tick_until_settled(&mut view).await;
    append_directly(&context).await;

    view.focus_gained();
    tokio::time::sleep(Duration::from_millis(20)).await;
    view.tick();

    assert_eq!(view.visible_reports().len(), 4);
  }

  #[tokio::test]
  async fn test_focus_refetch_can_be_disabled() {
    let options = QueryOptions {
      stale_time: Duration::ZERO,
      refetch_on_focus: false,
      ..QueryOptions::default()
    };
    let context = context_with(Duration::ZERO, options);
    let mut view = view(&context);
    tick_until_settled(&mut view).await;
    append_directly(&context).await;

    view.focus_gained();
    tokio::time::sleep(Duration::from_millis(20)).await;
    view.tick();

    assert_eq!(view.visible_reports().len(), 4);
  }
}
