//! Raw records as the video platform returns them, plus the category lookup.

use serde::{Deserialize, Deserializer};
use std::collections::{BTreeMap, HashSet};

/// One entry from a `videos.list` response.
///
/// Every field is optional on the wire so that a structurally incomplete item decodes and is
/// rejected later by the normalizer, instead of failing the whole response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawVideoItem {
  #[serde(default)]
  pub id: String,
  pub snippet: Option<Snippet>,
  pub statistics: Option<Statistics>,
  pub content_details: Option<ContentDetails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub channel_title: String,
  #[serde(default)]
  pub published_at: Option<String>,
  pub category_id: Option<String>,
}

/// Counts arrive as decimal strings and any of them may be hidden by the uploader.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
  #[serde(default, deserialize_with = "count_text")]
  pub view_count: Option<String>,
  #[serde(default, deserialize_with = "count_text")]
  pub like_count: Option<String>,
  #[serde(default, deserialize_with = "count_text")]
  pub comment_count: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CountText {
  Text(String),
  Number(u64),
}

/// Accept a count as either a decimal string or a bare JSON number.
fn count_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
  Ok(Option::<CountText>::deserialize(deserializer)?.map(|count| match count {
    CountText::Text(text) => text,
    CountText::Number(n) => n.to_string(),
  }))
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentDetails {
  #[serde(default)]
  pub duration: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
  pub name: String,
  /// Whether videos can be filed under (and searched by) this category.
  pub assignable: bool,
}

/// Category id to display name, built once per region and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryMap {
  entries: BTreeMap<String, Category>,
}

impl CategoryMap {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&mut self, id: impl Into<String>, name: impl Into<String>, assignable: bool) {
    self.entries.insert(id.into(), Category { name: name.into(), assignable });
  }

  pub fn name(&self, id: &str) -> Option<&str> {
    self.entries.get(id).map(|c| c.name.as_str())
  }

  /// Resolve a category id, falling back to `fallback` for unknown or absent ids.
  pub fn resolve<'a>(&'a self, id: Option<&str>, fallback: &'a str) -> &'a str {
    id.and_then(|id| self.name(id)).unwrap_or(fallback)
  }

  /// Ids whose display name is in `names`. Names not present in the map are ignored.
  pub fn ids_named(&self, names: &[String]) -> HashSet<String> {
    self.entries.iter().filter(|(_, c)| names.iter().any(|n| n == &c.name)).map(|(id, _)| id.clone()).collect()
  }

  pub fn assignable_ids(&self) -> impl Iterator<Item = &str> {
    self.entries.iter().filter(|(_, c)| c.assignable).map(|(id, _)| id.as_str())
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &Category)> {
    self.entries.iter().map(|(id, c)| (id.as_str(), c))
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

impl<I: Into<String>, N: Into<String>> FromIterator<(I, N)> for CategoryMap {
  fn from_iter<T: IntoIterator<Item = (I, N)>>(iter: T) -> Self {
    let mut map = CategoryMap::new();
    for (id, name) in iter {
      map.insert(id, name, true);
    }
    map
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample() -> CategoryMap {
    let mut map = CategoryMap::new();
    map.insert("10", "Music", true);
    map.insert("20", "Gaming", true);
    map.insert("24", "Entertainment", true);
    map.insert("18", "Short Movies", false);
    map
  }

  #[test]
  fn resolve_known_and_fallback() {
    let map = sample();
    assert_eq!(map.resolve(Some("10"), "Other"), "Music");
    assert_eq!(map.resolve(Some("999"), "Other"), "Other");
    assert_eq!(map.resolve(None, "Other"), "Other");
  }

  #[test]
  fn ids_named_ignores_unknown_names() {
    let map = sample();
    let ids = map.ids_named(&["Music".into(), "Gaming".into(), "Cooking".into()]);
    assert_eq!(ids, HashSet::from(["10".to_string(), "20".to_string()]));
  }

  #[test]
  fn assignable_ids_skip_unassignable() {
    let map = sample();
    let ids: Vec<&str> = map.assignable_ids().collect();
    assert_eq!(ids, vec!["10", "20", "24"]);
  }

  #[test]
  fn deserializes_api_item_with_missing_statistics() {
    let json = r#"{
      "id": "abc123",
      "snippet": {"title": "T", "channelTitle": "C", "publishedAt": "2024-01-01T00:00:00Z", "categoryId": "10"},
      "contentDetails": {"duration": "PT1M"}
    }"#;
    let item: RawVideoItem = serde_json::from_str(json).unwrap();
    assert_eq!(item.id, "abc123");
    assert!(item.statistics.is_none());
    assert_eq!(item.snippet.unwrap().category_id.as_deref(), Some("10"));
  }

  #[test]
  fn incomplete_item_still_decodes() {
    let json = r#"{
      "snippet": {"title": "T"},
      "statistics": {"viewCount": 1200, "likeCount": "7"},
      "contentDetails": {}
    }"#;
    let item: RawVideoItem = serde_json::from_str(json).unwrap();
    assert!(item.id.is_empty());
    assert!(item.snippet.unwrap().published_at.is_none());
    assert!(item.content_details.unwrap().duration.is_none());
    let stats = item.statistics.unwrap();
    assert_eq!(stats.view_count.as_deref(), Some("1200"));
    assert_eq!(stats.like_count.as_deref(), Some("7"));
    assert!(stats.comment_count.is_none());
  }
}
