use ratatui::{
  Frame,
  layout::{Alignment, Constraint, Layout, Rect},
  style::{Modifier, Style, Stylize},
  text::{Line, Span},
  widgets::{Block, BorderType, Cell, Padding, Paragraph, Row, Table, Tabs},
};

use crate::app::{App, AppMode, TabStatus, View};
use crate::dataset::{COLUMNS, col};
use crate::display::{display_width, title_text, truncate_to_width};
use crate::theme::Theme;

/// Column widths in `COLUMNS` order.
const WIDTHS: [Constraint; 11] = [
  Constraint::Min(24),
  Constraint::Length(13),
  Constraint::Length(10),
  Constraint::Length(10),
  Constraint::Length(9),
  Constraint::Length(8),
  Constraint::Length(10),
  Constraint::Length(18),
  Constraint::Length(14),
  Constraint::Length(9),
  Constraint::Length(43),
];

pub fn ui(frame: &mut Frame, app: &mut App) {
  let theme = app.theme();

  frame.render_widget(Block::default().style(Style::default().bg(theme.bg)), frame.area());

  let [header_area, main_area, status_area, input_area, footer_area] = Layout::vertical([
    Constraint::Length(1),
    Constraint::Min(3),
    Constraint::Length(1),
    Constraint::Length(3),
    Constraint::Length(1),
  ])
  .areas(frame.area());

  render_header(frame, app, header_area);
  render_main(frame, app, main_area);
  render_status(frame, app, status_area);
  render_input(frame, app, input_area);
  render_footer(frame, app, footer_area);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let brand = " ▶ yta ";
  let [brand_area, tabs_area] =
    Layout::horizontal([Constraint::Length(brand.len() as u16), Constraint::Min(0)]).areas(area);
  frame.render_widget(
    Line::from(Span::styled(brand, Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))),
    brand_area,
  );

  let titles: Vec<Line> = View::ALL
    .iter()
    .map(|v| {
      let loading = app.tabs[v.index()].status == TabStatus::Loading;
      Line::from(if loading { format!("{} …", v.label()) } else { v.label().to_string() })
    })
    .collect();
  let tabs = Tabs::new(titles)
    .select(app.view.index())
    .style(Style::default().fg(theme.muted))
    .highlight_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
    .divider("│");
  frame.render_widget(tabs, tabs_area);

  let right_text = format!("{} · {} · v{} ", app.session.region, app.session.language, env!("CARGO_PKG_VERSION"));
  let width = right_text.chars().count() as u16;
  let right_area = Rect { x: area.x + area.width.saturating_sub(width), width, ..area };
  frame.render_widget(Line::from(Span::styled(right_text, Style::default().fg(theme.muted))), right_area);
}

fn render_main(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  match app.tab().status.clone() {
    TabStatus::Ready => render_table(frame, app, area),
    TabStatus::Idle => render_welcome(frame, theme, area),
    TabStatus::Loading => render_message(frame, theme, area, "Loading…", theme.status),
    TabStatus::Empty => render_message(frame, theme, area, "No results found.", theme.muted),
    TabStatus::Failed(msg) => render_message(frame, theme, area, &msg, theme.error),
  }
}

fn bordered(theme: &Theme) -> Block<'static> {
  Block::bordered().border_type(BorderType::Rounded).border_style(Style::default().fg(theme.border))
}

fn render_welcome(frame: &mut Frame, theme: &Theme, area: Rect) {
  let text = vec![
    Line::from(""),
    Line::from(Span::styled("▶  Welcome to yta", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))),
    Line::from(""),
    Line::from(Span::styled("Search, chart and rank YouTube videos.", Style::default().fg(theme.fg))),
    Line::from(""),
    Line::from(Span::styled("Type a query below and press Enter.", Style::default().fg(theme.muted))),
  ];
  let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(bordered(theme));
  frame.render_widget(paragraph, area);
}

fn render_message(frame: &mut Frame, theme: &Theme, area: Rect, msg: &str, color: ratatui::style::Color) {
  let text = vec![Line::from(""), Line::from(Span::styled(msg.to_string(), Style::default().fg(color)))];
  let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(bordered(theme));
  frame.render_widget(paragraph, area);
}

fn table_title(app: &App) -> String {
  let tab = app.tab();
  let mut parts = vec![format!("{}: {} of {} videos", app.view.label(), tab.visible.len(), tab.dataset.len())];
  if let Some((column, descending)) = tab.sort {
    parts.push(format!("sort {} {}", COLUMNS[column], if descending { "↓" } else { "↑" }));
  }
  if let Some(category) = &tab.category_filter {
    parts.push(format!("category {}", category));
  }
  if !app.filter.is_empty() {
    parts.push(format!("filter \"{}\"", app.filter));
  }
  format!(" {} ", parts.join(" · "))
}

fn render_table(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  let title = table_title(app);
  let sort_column = app.tab().sort.map(|(c, _)| c);

  let header = Row::new(COLUMNS.iter().enumerate().map(|(i, name)| {
    let style = if Some(i) == sort_column { Style::default().fg(theme.accent) } else { Style::default().fg(theme.fg) };
    Cell::from(*name).style(style.add_modifier(Modifier::BOLD))
  }));

  // Title column gets whatever the fixed columns leave over.
  let fixed: u16 = WIDTHS.iter().skip(1).map(|c| if let Constraint::Length(n) = c { *n + 1 } else { 0 }).sum();
  let title_w = area.width.saturating_sub(fixed + 4).max(24) as usize;

  let tab = app.tab();
  let rows: Vec<Row> = tab
    .visible_rows()
    .enumerate()
    .map(|(i, record)| {
      let cells = record.cells().into_iter().enumerate().map(|(c, cell)| {
        let text = if c == col::TITLE { truncate_to_width(&title_text(record), title_w) } else { cell.render() };
        let line = match c {
          col::VIEWS | col::VIEWS_PER_HOUR | col::LIKES | col::COMMENTS | col::ENGAGEMENT => {
            Line::from(text).alignment(Alignment::Right)
          }
          col::URL => Line::from(Span::styled(text, Style::default().fg(theme.muted))),
          _ => Line::from(text),
        };
        Cell::from(line)
      });
      let bg = if i % 2 == 1 { theme.stripe_bg } else { theme.bg };
      Row::new(cells).style(Style::default().fg(theme.fg)).bg(bg)
    })
    .collect();

  let table = Table::new(rows, WIDTHS)
    .header(header)
    .block(
      bordered(theme)
        .title(title)
        .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)),
    )
    .highlight_symbol("▶ ")
    .row_highlight_style(Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD));

  let view = app.view.index();
  frame.render_stateful_widget(table, area, &mut app.tabs[view].table_state);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let (text, style) = if let Some(msg) = &app.status_message {
    (format!(" ⏳ {}", msg), Style::default().fg(theme.status))
  } else if let Some(err) = &app.last_error {
    (format!(" ⚠  {}", err), Style::default().fg(theme.error))
  } else if let Some(info) = &app.info_message {
    (format!(" ℹ  {}", info), Style::default().fg(theme.muted))
  } else {
    (" Ready".to_string(), Style::default().fg(theme.muted))
  };
  frame.render_widget(Paragraph::new(text).style(style), area);
}

fn render_input(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  let filtering = app.mode == AppMode::Filter;
  let active = filtering || app.mode == AppMode::Input;
  let border_color = if active { theme.accent } else { theme.border };
  let title = if filtering { " Filter title / channel " } else { " Search YouTube " };
  let input_block = Block::bordered()
    .title(title)
    .title_style(Style::default().fg(border_color))
    .border_type(BorderType::Rounded)
    .border_style(Style::default().fg(border_color))
    .padding(Padding::horizontal(1));

  let (text, cursor) = if filtering { (&app.filter, app.filter_cursor) } else { (&app.input, app.cursor_position) };
  let inner_w = area.width.saturating_sub(4) as usize;
  let cursor_col = display_width(text, cursor);

  let mut scroll = if filtering { 0 } else { app.input_scroll };
  if cursor_col < scroll {
    scroll = cursor_col;
  } else if cursor_col >= scroll + inner_w {
    scroll = cursor_col.saturating_sub(inner_w) + 1;
  }

  let visible: String = text
    .chars()
    .scan(0usize, |col, c| {
      let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
      let start = *col;
      *col += w;
      Some((start, *col, c))
    })
    .skip_while(|(_, end, _)| *end <= scroll)
    .take_while(|(start, _, _)| *start < scroll + inner_w)
    .map(|(_, _, c)| c)
    .collect();

  let paragraph = Paragraph::new(visible).style(Style::default().fg(theme.fg)).block(input_block);
  frame.render_widget(paragraph, area);

  if !filtering {
    app.input_scroll = scroll;
  }
  if active {
    let cursor_x = area.x + 2 + (cursor_col - scroll) as u16;
    frame.set_cursor_position((cursor_x, area.y + 1));
  }
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let has_results = !app.tab().visible.is_empty();
  let keys: Vec<(&str, &str)> = match app.mode {
    AppMode::Input => {
      let mut k = vec![("Enter", "Search"), ("Tab", "View"), ("^t", "Theme")];
      if has_results {
        k.push(("↓", "Results"));
      } else {
        k.push(("Esc", "Quit"));
      }
      k
    }
    AppMode::Results => vec![
      ("j/k", "Navigate"),
      ("Tab", "View"),
      ("s/r", "Sort"),
      ("c", "Category"),
      ("/", "Filter"),
      ("^e", "Export"),
      ("^r", "Refresh"),
      ("^o", "Open"),
      ("Esc", "Search"),
    ],
    AppMode::Filter => vec![("Enter", "Apply"), ("↑/↓", "Navigate"), ("Esc", "Clear")],
  };

  let spans: Vec<Span> = keys
    .iter()
    .enumerate()
    .flat_map(|(i, (key, action))| {
      let mut s = vec![
        Span::styled(format!(" {} ", key), Style::default().fg(theme.key_fg).bg(theme.key_bg)),
        Span::styled(format!(" {} ", action), Style::default().fg(theme.muted)),
      ];
      if i < keys.len() - 1 {
        s.push(Span::raw("  "));
      }
      s
    })
    .collect();

  frame.render_widget(Line::from(spans), area);

  let theme_label = format!("{} ", theme.name);
  let right = Line::from(Span::styled(&theme_label, Style::default().fg(theme.muted)));
  let right_area =
    Rect { x: area.x + area.width.saturating_sub(theme_label.len() as u16), width: theme_label.len() as u16, ..area };
  frame.render_widget(right, right_area);
}
