use chrono::Utc;
use ratatui::widgets::TableState;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::dataset::{Dataset, sorted_indices};
use crate::error::RetrievalError;
use crate::export::{default_file_name, write_xlsx};
use crate::model::CategoryMap;
use crate::normalize::VideoRecord;
use crate::session::Session;
use crate::strategy::{self, Outcome, Request};
use crate::theme::THEMES;
use crate::youtube::VideoApi;

// --- Types ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
  Search,
  Chart,
  CategoryTop,
  Trends,
}

impl View {
  pub const ALL: [View; 4] = [View::Search, View::Chart, View::CategoryTop, View::Trends];

  pub fn index(self) -> usize {
    match self {
      View::Search => 0,
      View::Chart => 1,
      View::CategoryTop => 2,
      View::Trends => 3,
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      View::Search => "Search",
      View::Chart => "Chart",
      View::CategoryTop => "Top by Category",
      View::Trends => "Trends",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
  Input,
  Results,
  Filter,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum TabStatus {
  #[default]
  Idle,
  Loading,
  Ready,
  Empty,
  Failed(String),
}

/// One tab's results plus its own sort, category filter and selection.
#[derive(Default)]
pub struct TabState {
  pub status: TabStatus,
  pub request: Option<Request>,
  pub dataset: Dataset,
  pub table_state: TableState,
  /// Column index and whether it sorts descending. `None` keeps the strategy's order.
  pub sort: Option<(usize, bool)>,
  pub category_filter: Option<String>,
  /// Indices into `dataset` that pass both filters, in display order.
  pub visible: Vec<usize>,
}

impl TabState {
  pub fn visible_rows(&self) -> impl Iterator<Item = &VideoRecord> {
    self.visible.iter().filter_map(|&i| self.dataset.rows().get(i))
  }
}

struct PendingFetch {
  view: View,
  request: Request,
  rx: oneshot::Receiver<Outcome>,
}

/// In-flight async task receivers.
#[derive(Default)]
pub(crate) struct AsyncTasks {
  categories_rx: Option<oneshot::Receiver<Result<CategoryMap, RetrievalError>>>,
  fetches: Vec<PendingFetch>,
  /// Requests parked until the category map arrives.
  waiting: Vec<(View, Request)>,
}

pub struct App {
  pub session: Session,
  pub input: String,
  pub cursor_position: usize,
  pub input_scroll: usize,
  pub mode: AppMode,
  pub view: View,
  pub theme_index: usize,
  pub tabs: [TabState; 4],
  /// Text filter applied to the active tab (title and channel).
  pub filter: String,
  pub filter_cursor: usize,
  pub last_error: Option<String>,
  pub status_message: Option<String>,
  pub info_message: Option<String>,
  pub should_quit: bool,
  pub(crate) tasks: AsyncTasks,
  error_time: Option<Instant>,
}

/// Default sort direction when a column is first selected: numbers high to low, text A to Z.
fn descending_by_default(column: usize) -> bool {
  use crate::dataset::col;
  matches!(
    column,
    col::VIEWS | col::VIEWS_PER_HOUR | col::LIKES | col::COMMENTS | col::ENGAGEMENT | col::PUBLISHED
  )
}

impl App {
  pub fn new(session: Session, theme_index: usize) -> Self {
    Self {
      session,
      input: String::new(),
      cursor_position: 0,
      input_scroll: 0,
      mode: AppMode::Results,
      view: View::Chart,
      theme_index: theme_index.min(THEMES.len() - 1),
      tabs: Default::default(),
      filter: String::new(),
      filter_cursor: 0,
      last_error: None,
      status_message: None,
      info_message: None,
      should_quit: false,
      tasks: AsyncTasks::default(),
      error_time: None,
    }
  }

  pub fn theme(&self) -> &'static crate::theme::Theme {
    &THEMES[self.theme_index]
  }

  pub fn tab(&self) -> &TabState {
    &self.tabs[self.view.index()]
  }

  pub fn tab_mut(&mut self) -> &mut TabState {
    &mut self.tabs[self.view.index()]
  }

  /// Set an error message with auto-dismiss tracking.
  pub fn set_error(&mut self, msg: String) {
    self.last_error = Some(msg);
    self.error_time = Some(Instant::now());
  }

  pub fn clear_error(&mut self) {
    self.last_error = None;
    self.error_time = None;
  }

  /// Clear stale error messages after 5 seconds.
  pub fn expire_error(&mut self) {
    if let Some(t) = self.error_time
      && t.elapsed() >= Duration::from_secs(5)
    {
      self.last_error = None;
      self.error_time = None;
    }
  }

  fn save_config(&self) {
    let mut config = Config::load();
    config.theme_name = Some(self.theme().name.to_string());
    config.save();
  }

  pub fn next_theme(&mut self) {
    self.theme_index = (self.theme_index + 1) % THEMES.len();
    self.save_config();
  }

  // --- Startup and background work ---

  /// Load the category map, then open the chart (the landing view).
  pub fn start(&mut self) {
    self.spawn_categories();
    let request = self.session.chart_request();
    self.load(View::Chart, request, false);
  }

  fn spawn_categories(&mut self) {
    if self.tasks.categories_rx.is_some() {
      return;
    }
    let api = self.session.api.clone();
    let region = self.session.region.clone();
    let language = self.session.language.clone();
    self.status_message = Some("Loading categories…".to_string());
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let _ = tx.send(api.categories(&region, &language).await);
    });
    self.tasks.categories_rx = Some(rx);
  }

  /// Show `request` in `view`, from the cache when possible.
  pub fn load(&mut self, view: View, request: Request, refresh: bool) {
    self.tasks.fetches.retain(|f| f.view != view);
    self.tasks.waiting.retain(|(v, _)| *v != view);
    self.tabs[view.index()].request = Some(request.clone());

    if refresh {
      self.session.cache.invalidate(&request);
    } else if let Some(ds) = self.session.cached(&request) {
      debug!(strategy = request.name(), "app: cache hit");
      self.apply_outcome(view, request, Outcome::Table(ds));
      return;
    }
    self.tabs[view.index()].status = TabStatus::Loading;

    match self.session.categories.clone() {
      Some(categories) => self.spawn_fetch(view, request, categories),
      None => {
        self.tasks.waiting.push((view, request));
        self.spawn_categories();
      }
    }
  }

  fn spawn_fetch(&mut self, view: View, request: Request, categories: Arc<CategoryMap>) {
    info!(strategy = request.name(), label = %request.label(), "app: fetch started");
    self.status_message = Some(format!("Loading {}…", view.label()));
    let api = self.session.api.clone();
    let trends = self.session.trends.clone();
    let task_request = request.clone();
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let _ = tx.send(strategy::run(&api, &trends, &categories, &task_request, Utc::now()).await);
    });
    self.tasks.fetches.push(PendingFetch { view, request, rx });
  }

  pub fn check_pending(&mut self) {
    if let Some(mut rx) = self.tasks.categories_rx.take() {
      match rx.try_recv() {
        Ok(Ok(categories)) => {
          self.status_message = None;
          let categories = Arc::new(categories);
          info!(count = categories.len(), "app: categories loaded");
          self.session.categories = Some(Arc::clone(&categories));
          for (view, request) in std::mem::take(&mut self.tasks.waiting) {
            self.spawn_fetch(view, request, Arc::clone(&categories));
          }
        }
        Ok(Err(e)) => {
          self.status_message = None;
          warn!(err = %e, "app: category load failed");
          self.fail_waiting(format!("Failed to load categories: {}", e));
        }
        Err(oneshot::error::TryRecvError::Empty) => {
          self.tasks.categories_rx = Some(rx);
        }
        Err(oneshot::error::TryRecvError::Closed) => {
          self.status_message = None;
          self.fail_waiting("Category task failed.".to_string());
        }
      }
    }

    let mut done = Vec::new();
    let mut still_running = Vec::new();
    for mut fetch in std::mem::take(&mut self.tasks.fetches) {
      match fetch.rx.try_recv() {
        Ok(outcome) => done.push((fetch.view, fetch.request, outcome)),
        Err(oneshot::error::TryRecvError::Empty) => still_running.push(fetch),
        Err(oneshot::error::TryRecvError::Closed) => {
          done.push((fetch.view, fetch.request, Outcome::Failed("Fetch task failed.".to_string())))
        }
      }
    }
    self.tasks.fetches = still_running;
    if self.tasks.fetches.is_empty() && !done.is_empty() && self.tasks.categories_rx.is_none() {
      self.status_message = None;
    }
    for (view, request, outcome) in done {
      self.session.remember(&request, &outcome);
      self.apply_outcome(view, request, outcome);
    }
  }

  fn fail_waiting(&mut self, msg: String) {
    for (view, _) in std::mem::take(&mut self.tasks.waiting) {
      self.tabs[view.index()].status = TabStatus::Failed(msg.clone());
    }
    self.set_error(msg);
  }

  /// Install a finished outcome into its tab.
  pub fn apply_outcome(&mut self, view: View, request: Request, outcome: Outcome) {
    let tab = &mut self.tabs[view.index()];
    if tab.request.as_ref().is_some_and(|r| *r != request) {
      debug!(strategy = request.name(), "app: dropping stale result");
      return;
    }
    tab.request = Some(request);
    tab.category_filter = None;
    match outcome {
      Outcome::Table(ds) => {
        tab.dataset = ds;
        tab.status = TabStatus::Ready;
        tab.table_state.select(Some(0));
        self.info_message = Some(format!("{}: {} videos", view.label(), tab.dataset.len()));
      }
      Outcome::Empty => {
        tab.dataset = Dataset::default();
        tab.status = TabStatus::Empty;
        tab.table_state.select(None);
        self.info_message = Some("No results found.".to_string());
      }
      Outcome::Failed(msg) => {
        tab.dataset = Dataset::default();
        tab.status = TabStatus::Failed(msg.clone());
        tab.table_state.select(None);
        self.set_error(msg);
      }
    }
    self.recompute_view(view);
    if view == self.view && view == View::Search && self.tab().status == TabStatus::Ready {
      self.mode = AppMode::Results;
    }
  }

  // --- User actions ---

  pub fn trigger_search(&mut self) {
    let query = self.input.trim().to_string();
    if query.is_empty() {
      self.set_error("Enter a search term.".to_string());
      return;
    }
    info!(query = %query, "search triggered");
    self.clear_error();
    self.info_message = None;
    self.clear_filter();
    self.view = View::Search;
    self.load(View::Search, Request::search(query, None), false);
  }

  fn request_for(&self, view: View) -> Option<Request> {
    match view {
      View::Search => self.tabs[View::Search.index()].request.clone(),
      View::Chart => Some(self.session.chart_request()),
      View::CategoryTop => Some(self.session.category_top_request()),
      View::Trends => Some(self.session.trends_request()),
    }
  }

  /// Switch views, loading the target the first time it is shown.
  pub fn select_view(&mut self, view: View) {
    self.view = view;
    self.clear_filter();
    if view == View::Search && self.tab().request.is_none() {
      self.mode = AppMode::Input;
      return;
    }
    if self.mode == AppMode::Input && view != View::Search {
      self.mode = AppMode::Results;
    }
    if self.tab().status == TabStatus::Idle
      && let Some(request) = self.request_for(view)
    {
      self.load(view, request, false);
    }
  }

  pub fn next_view(&mut self) {
    let next = View::ALL[(self.view.index() + 1) % View::ALL.len()];
    self.select_view(next);
  }

  pub fn prev_view(&mut self) {
    let prev = View::ALL[(self.view.index() + View::ALL.len() - 1) % View::ALL.len()];
    self.select_view(prev);
  }

  /// Re-run the active view, bypassing the cache. Retries the category map if it never loaded.
  pub fn refresh(&mut self) {
    self.clear_error();
    if let Some(request) = self.request_for(self.view) {
      self.load(self.view, request, true);
    } else if self.session.categories.is_none() {
      self.spawn_categories();
    }
  }

  /// Cycle the sort column: strategy order, then each column in turn.
  pub fn cycle_sort(&mut self) {
    let columns = crate::dataset::COLUMNS.len();
    let tab = self.tab_mut();
    tab.sort = match tab.sort {
      None => Some((0, descending_by_default(0))),
      Some((c, _)) if c + 1 >= columns => None,
      Some((c, _)) => Some((c + 1, descending_by_default(c + 1))),
    };
    self.recompute_view(self.view);
  }

  pub fn reverse_sort(&mut self) {
    if let Some((c, desc)) = self.tab().sort {
      self.tab_mut().sort = Some((c, !desc));
      self.recompute_view(self.view);
    }
  }

  /// Cycle through "All" and each category present in the active tab.
  pub fn cycle_category_filter(&mut self) {
    let tab = self.tab_mut();
    let names = tab.dataset.category_names();
    tab.category_filter = match &tab.category_filter {
      None => names.first().cloned(),
      Some(current) => match names.iter().position(|n| n == current) {
        Some(i) => names.get(i + 1).cloned(),
        None => names.first().cloned(),
      },
    };
    self.recompute_view(self.view);
  }

  pub fn clear_filter(&mut self) {
    self.filter.clear();
    self.filter_cursor = 0;
    self.recompute_view(self.view);
  }

  /// Rebuild a tab's visible rows from its dataset, filters and sort.
  /// Clamps the selection to stay within range.
  pub fn recompute_view(&mut self, view: View) {
    let needle = if view == self.view { self.filter.clone() } else { String::new() };
    let tab = &mut self.tabs[view.index()];
    let rows = tab.dataset.rows();
    let matching: Vec<usize> = rows
      .iter()
      .enumerate()
      .filter(|(_, r)| r.matches_text(&needle))
      .filter(|(_, r)| tab.category_filter.as_ref().is_none_or(|c| r.category == *c))
      .map(|(i, _)| i)
      .collect();
    tab.visible = sorted_indices(rows, &matching, tab.sort);

    if tab.visible.is_empty() {
      tab.table_state.select(None);
    } else {
      let sel = tab.table_state.selected().unwrap_or(0);
      tab.table_state.select(Some(sel.min(tab.visible.len() - 1)));
    }
  }

  pub fn select_next(&mut self) {
    let tab = self.tab_mut();
    let count = tab.visible.len();
    if count > 0 {
      let i = tab.table_state.selected().map_or(0, |i| (i + 1) % count);
      tab.table_state.select(Some(i));
    }
  }

  pub fn select_prev(&mut self) {
    let tab = self.tab_mut();
    let count = tab.visible.len();
    if count > 0 {
      let i = tab.table_state.selected().map_or(0, |i| if i == 0 { count - 1 } else { i - 1 });
      tab.table_state.select(Some(i));
    }
  }

  pub fn selected_record(&self) -> Option<&VideoRecord> {
    let tab = self.tab();
    let idx = *tab.visible.get(tab.table_state.selected()?)?;
    tab.dataset.rows().get(idx)
  }

  /// Write the rows currently shown, in display order, to `youtube_analysis_<label>.xlsx`.
  pub fn export_current(&mut self) {
    let tab = self.tab();
    let Some(request) = &tab.request else {
      self.set_error("Nothing to export.".to_string());
      return;
    };
    if tab.visible.is_empty() {
      self.set_error("Nothing to export.".to_string());
      return;
    }
    let path = default_file_name(&request.label());
    let dataset = Dataset::from_rows(tab.visible_rows().cloned().collect());
    match write_xlsx(&dataset, &path) {
      Ok(()) => self.info_message = Some(format!("Exported {} rows to {}", dataset.len(), path.display())),
      Err(e) => self.set_error(format!("Export failed: {:#}", e)),
    }
  }
}
