//! Plain-text rendering of datasets for headless output, plus width helpers shared with the TUI.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::dataset::{COLUMNS, Cell, Dataset, col};
use crate::normalize::VideoRecord;

/// Widest a text column may grow in the plain-text table.
const MAX_TEXT_WIDTH: usize = 40;

/// Compute the display width of the first `n` chars (accounting for double-width CJK).
pub fn display_width(s: &str, n: usize) -> usize {
  s.chars().take(n).map(|c| c.width().unwrap_or(0)).sum()
}

/// Truncate to at most `max_width` terminal columns, appending "…" if truncated.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
  if s.width() <= max_width {
    return s.to_string();
  }
  let mut out = String::new();
  let mut used = 0;
  for c in s.chars() {
    let w = c.width().unwrap_or(0);
    if used + w + 1 > max_width {
      break;
    }
    out.push(c);
    used += w;
  }
  out.push('…');
  out
}

fn pad(s: &str, width: usize, right_align: bool) -> String {
  let fill = " ".repeat(width.saturating_sub(s.width()));
  if right_align { format!("{}{}", fill, s) } else { format!("{}{}", s, fill) }
}

/// Title cell text, prefixed with the trend rank and phrase for trend-joined rows.
pub fn title_text(record: &VideoRecord) -> String {
  match &record.trend {
    Some(tag) => format!("#{} {} · {}", tag.rank, tag.phrase, record.title),
    None => record.title.clone(),
  }
}

/// Render rows as an aligned text table in `COLUMNS` order.
pub fn render_table(dataset: &Dataset) -> String {
  let rows: Vec<Vec<(String, bool)>> = dataset
    .rows()
    .iter()
    .map(|record| {
      record
        .cells()
        .iter()
        .enumerate()
        .map(|(i, cell)| match cell {
          Cell::Int(_) | Cell::Percent(_) => (cell.render(), true),
          Cell::Link(_) => (cell.render(), false),
          _ if i == col::TITLE => (truncate_to_width(&title_text(record), MAX_TEXT_WIDTH), false),
          _ => (truncate_to_width(&cell.render(), MAX_TEXT_WIDTH), false),
        })
        .collect()
    })
    .collect();

  let widths: Vec<usize> = (0..COLUMNS.len())
    .map(|i| rows.iter().map(|r| r[i].0.width()).chain(std::iter::once(COLUMNS[i].width())).max().unwrap_or(0))
    .collect();

  let mut out = String::new();
  let header: Vec<String> = COLUMNS.iter().enumerate().map(|(i, name)| pad(name, widths[i], false)).collect();
  out.push_str(header.join("  ").trim_end());
  out.push('\n');
  let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
  out.push_str(&rule.join("  "));
  out.push('\n');
  for row in &rows {
    let line: Vec<String> = row.iter().enumerate().map(|(i, (text, right))| pad(text, widths[i], *right)).collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::dataset::build_dataset;
  use crate::model::CategoryMap;
  use crate::normalize::TrendTag;
  use crate::normalize::tests::raw_item;
  use chrono::{TimeZone, Utc};

  #[test]
  fn width_counts_wide_chars() {
    assert_eq!(display_width("abc", 3), 3);
    assert_eq!(display_width("日本語", 2), 4);
    assert_eq!(display_width("abc", 10), 3);
  }

  #[test]
  fn truncate_respects_columns() {
    assert_eq!(truncate_to_width("hello", 10), "hello");
    assert_eq!(truncate_to_width("hello world", 6), "hello…");
    assert_eq!(truncate_to_width("日本語テキスト", 5), "日本…");
  }

  #[test]
  fn table_has_header_and_one_line_per_row() {
    let items = vec![raw_item("a", Some("1234"), Some("10"), "PT30S"), raw_item("b", Some("5"), None, "PT9M")];
    let categories: CategoryMap = [("10", "Music")].into_iter().collect();
    let ds = build_dataset(&items, &categories, Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap());
    let text = render_table(&ds);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("Title"));
    assert!(lines[0].trim_end().ends_with("URL"));
    assert!(lines[2].contains("1,234"));
    assert!(lines[2].contains("https://www.youtube.com/watch?v=a"));
  }

  #[test]
  fn trend_rows_show_rank() {
    let items = vec![raw_item("a", Some("1"), None, "PT30S")];
    let ds = build_dataset(&items, &CategoryMap::new(), Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap());
    let mut record = ds.rows()[0].clone();
    record.trend = Some(TrendTag { rank: 2, phrase: "cats".into() });
    assert_eq!(title_text(&record), "#2 cats · title a");
  }
}
