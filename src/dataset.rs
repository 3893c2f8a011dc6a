use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use tracing::{debug, warn};

use crate::model::{CategoryMap, RawVideoItem};
use crate::normalize::{VideoRecord, normalize_item};

/// Table header, in the order every surface (display, export) must use.
pub const COLUMNS: [&str; 11] = [
  "Title",
  "Views",
  "Views/Hour",
  "Likes",
  "Comments",
  "Engagement (%)",
  "Published",
  "Channel",
  "Category",
  "Type",
  "URL",
];

/// Column positions, for sorting and cell lookup.
pub mod col {
  pub const TITLE: usize = 0;
  pub const VIEWS: usize = 1;
  pub const VIEWS_PER_HOUR: usize = 2;
  pub const LIKES: usize = 3;
  pub const COMMENTS: usize = 4;
  pub const ENGAGEMENT: usize = 5;
  pub const PUBLISHED: usize = 6;
  pub const CHANNEL: usize = 7;
  pub const CATEGORY: usize = 8;
  pub const KIND: usize = 9;
  pub const URL: usize = 10;
}

/// A typed table cell, so renderers can pick number formats.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell<'a> {
  Text(&'a str),
  Int(u64),
  Percent(f64),
  Date(String),
  Link(&'a str),
}

impl Cell<'_> {
  pub fn render(&self) -> String {
    match self {
      Cell::Text(s) | Cell::Link(s) => s.to_string(),
      Cell::Int(n) => group_thousands(*n),
      Cell::Percent(p) => format!("{:.2}%", p),
      Cell::Date(d) => d.clone(),
    }
  }
}

/// `1234567` -> `1,234,567`
pub fn group_thousands(n: u64) -> String {
  let digits = n.to_string();
  let mut out = String::with_capacity(digits.len() + digits.len() / 3);
  for (i, c) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      out.push(',');
    }
    out.push(c);
  }
  out
}

impl VideoRecord {
  /// The record's values laid out in `COLUMNS` order.
  pub fn cells(&self) -> [Cell<'_>; COLUMNS.len()] {
    [
      Cell::Text(&self.title),
      Cell::Int(self.views),
      Cell::Int(self.views_per_hour),
      Cell::Int(self.likes),
      Cell::Int(self.comments),
      Cell::Percent(self.engagement_rate),
      Cell::Date(self.published.format("%Y-%m-%d").to_string()),
      Cell::Text(&self.channel),
      Cell::Text(&self.category),
      Cell::Text(self.kind.label()),
      Cell::Link(&self.url),
    ]
  }

  fn compare_by(&self, other: &Self, column: usize) -> Ordering {
    match column {
      col::TITLE => self.title.to_lowercase().cmp(&other.title.to_lowercase()),
      col::VIEWS => self.views.cmp(&other.views),
      col::VIEWS_PER_HOUR => self.views_per_hour.cmp(&other.views_per_hour),
      col::LIKES => self.likes.cmp(&other.likes),
      col::COMMENTS => self.comments.cmp(&other.comments),
      col::ENGAGEMENT => self.engagement_rate.total_cmp(&other.engagement_rate),
      col::PUBLISHED => self.published.cmp(&other.published),
      col::CHANNEL => self.channel.to_lowercase().cmp(&other.channel.to_lowercase()),
      col::CATEGORY => self.category.cmp(&other.category),
      col::KIND => self.kind.label().cmp(other.kind.label()),
      _ => self.url.cmp(&other.url),
    }
  }

  /// Case-insensitive match against title and channel.
  pub fn matches_text(&self, needle: &str) -> bool {
    if needle.is_empty() {
      return true;
    }
    let needle = needle.to_lowercase();
    self.title.to_lowercase().contains(&needle) || self.channel.to_lowercase().contains(&needle)
  }
}

/// An ordered table of normalized videos.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
  rows: Vec<VideoRecord>,
}

impl Dataset {
  pub fn from_rows(rows: Vec<VideoRecord>) -> Self {
    Self { rows }
  }

  pub fn rows(&self) -> &[VideoRecord] {
    &self.rows
  }

  pub fn into_rows(self) -> Vec<VideoRecord> {
    self.rows
  }

  pub fn len(&self) -> usize {
    self.rows.len()
  }

  pub fn is_empty(&self) -> bool {
    self.rows.is_empty()
  }

  /// Stable sort, most-viewed first.
  pub fn sort_by_views_desc(&mut self) {
    self.rows.sort_by(|a, b| b.views.cmp(&a.views));
  }

  pub fn truncate(&mut self, len: usize) {
    self.rows.truncate(len);
  }

  /// Sorted, de-duplicated category names present in the table.
  pub fn category_names(&self) -> Vec<String> {
    self.rows.iter().map(|r| r.category.clone()).collect::<BTreeSet<_>>().into_iter().collect()
  }
}

/// Normalize each raw item, dropping (and logging) the ones that fail.
/// Keeps input order; callers apply their own sort and limit.
pub fn build_dataset<'a, I>(items: I, categories: &CategoryMap, now: DateTime<Utc>) -> Dataset
where
  I: IntoIterator<Item = &'a RawVideoItem>,
{
  let mut rows = Vec::new();
  let mut skipped = 0usize;
  for item in items {
    match normalize_item(item, categories, now) {
      Ok(record) => rows.push(record),
      Err(e) => {
        skipped += 1;
        warn!(err = %e, "dataset: skipping item");
      }
    }
  }
  debug!(rows = rows.len(), skipped, "dataset: built");
  Dataset { rows }
}

/// Row order for display: indices into `rows`, optionally sorted by `column`.
/// `None` keeps the natural order (the strategy's own ranking).
pub fn sorted_indices(rows: &[VideoRecord], indices: &[usize], sort: Option<(usize, bool)>) -> Vec<usize> {
  let mut out = indices.to_vec();
  if let Some((column, descending)) = sort {
    out.sort_by(|&a, &b| {
      let ord = rows[a].compare_by(&rows[b], column);
      if descending { ord.reverse() } else { ord }
    });
  }
  out
}
