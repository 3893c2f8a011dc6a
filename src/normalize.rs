use chrono::{DateTime, NaiveDate, Utc};

use crate::constants::constants;
use crate::duration::parse_duration;
use crate::error::ItemError;
use crate::model::{CategoryMap, RawVideoItem};

/// Short-form vs long-form, split at the short-form threshold (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VideoKind {
  Short,
  Long,
}

impl VideoKind {
  pub fn from_seconds(secs: u64) -> Self {
    if secs <= constants().short_form_max_secs { VideoKind::Short } else { VideoKind::Long }
  }

  pub fn label(self) -> &'static str {
    match self {
      VideoKind::Short => "Shorts",
      VideoKind::Long => "Long-form",
    }
  }
}

/// Position of a row in an external trending-phrase ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendTag {
  pub rank: usize,
  pub phrase: String,
}

/// One flattened video with its derived metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoRecord {
  pub title: String,
  pub views: u64,
  pub views_per_hour: u64,
  pub likes: u64,
  pub comments: u64,
  /// Likes per hundred views; 0 when there are no views.
  pub engagement_rate: f64,
  pub published: NaiveDate,
  pub channel: String,
  pub category: String,
  pub kind: VideoKind,
  pub url: String,
  /// Kept for joins; not one of the table columns.
  pub video_id: String,
  pub trend: Option<TrendTag>,
}

pub fn video_url(video_id: &str) -> String {
  format!("https://www.youtube.com/watch?v={}", video_id)
}

pub fn engagement_rate(likes: u64, views: u64) -> f64 {
  if views == 0 { 0.0 } else { likes as f64 / views as f64 * 100.0 }
}

/// Views divided by hours since publish, never dividing by less than one hour.
pub fn views_per_hour(views: u64, published_at: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
  let hours = ((now - published_at).num_seconds() as f64 / 3600.0).max(1.0);
  (views as f64 / hours).floor() as u64
}

fn count(id: &str, field: &'static str, raw: Option<&String>) -> Result<u64, ItemError> {
  match raw {
    None => Ok(0),
    Some(value) => value.trim().parse::<u64>().map_err(|_| ItemError::BadCount {
      id: id.to_string(),
      field,
      value: value.clone(),
    }),
  }
}

/// Flatten one raw item. Pure: `now` is injected so tests can pin the clock.
pub fn normalize_item(
  item: &RawVideoItem,
  categories: &CategoryMap,
  now: DateTime<Utc>,
) -> Result<VideoRecord, ItemError> {
  let id = item.id.as_str();
  if id.is_empty() {
    return Err(ItemError::MissingField { id: String::new(), field: "id" });
  }
  let snippet = item.snippet.as_ref().ok_or_else(|| ItemError::MissingSnippet(id.to_string()))?;
  let details = item.content_details.as_ref().ok_or_else(|| ItemError::MissingContentDetails(id.to_string()))?;

  let stats = item.statistics.clone().unwrap_or_default();
  let views = count(id, "viewCount", stats.view_count.as_ref())?;
  let likes = count(id, "likeCount", stats.like_count.as_ref())?;
  let comments = count(id, "commentCount", stats.comment_count.as_ref())?;

  let missing = |field| ItemError::MissingField { id: id.to_string(), field };
  let raw_published = snippet.published_at.as_deref().ok_or_else(|| missing("publishedAt"))?;
  let published_at = DateTime::parse_from_rfc3339(raw_published)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|_| ItemError::BadTimestamp { id: id.to_string(), value: raw_published.to_string() })?;

  let raw_duration = details.duration.as_deref().ok_or_else(|| missing("duration"))?;
  let seconds = parse_duration(raw_duration).map_err(|source| ItemError::Duration { id: id.to_string(), source })?;

  let category = categories.resolve(snippet.category_id.as_deref(), &constants().fallback_category).to_string();

  Ok(VideoRecord {
    title: snippet.title.clone(),
    views,
    views_per_hour: views_per_hour(views, published_at, now),
    likes,
    comments,
    engagement_rate: engagement_rate(likes, views),
    published: published_at.date_naive(),
    channel: snippet.channel_title.clone(),
    category,
    kind: VideoKind::from_seconds(seconds),
    url: video_url(id),
    video_id: id.to_string(),
    trend: None,
  })
}

#[cfg(test)]
pub(crate) mod tests {
  use super::*;
  use crate::model::{ContentDetails, Snippet, Statistics};
  use chrono::TimeZone;

  pub(crate) fn raw_item(id: &str, views: Option<&str>, likes: Option<&str>, duration: &str) -> RawVideoItem {
    RawVideoItem {
      id: id.to_string(),
      snippet: Some(Snippet {
        title: format!("title {}", id),
        channel_title: "channel".to_string(),
        published_at: Some("2024-05-01T00:00:00Z".to_string()),
        category_id: Some("10".to_string()),
      }),
      statistics: Some(Statistics {
        view_count: views.map(str::to_string),
        like_count: likes.map(str::to_string),
        comment_count: Some("3".to_string()),
      }),
      content_details: Some(ContentDetails { duration: Some(duration.to_string()) }),
    }
  }

  fn categories() -> CategoryMap {
    [("10", "Music")].into_iter().collect()
  }

  fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
  }

  #[test]
  fn derives_all_fields() {
    let item = raw_item("vid1", Some("1000"), Some("50"), "PT1H2M3S");
    let rec = normalize_item(&item, &categories(), now()).unwrap();
    assert_eq!(rec.views, 1000);
    assert_eq!(rec.likes, 50);
    assert_eq!(rec.comments, 3);
    assert_eq!(rec.views_per_hour, 100);
    assert!((rec.engagement_rate - 5.0).abs() < f64::EPSILON);
    assert_eq!(rec.published.to_string(), "2024-05-01");
    assert_eq!(rec.category, "Music");
    assert_eq!(rec.kind, VideoKind::Long);
    assert_eq!(rec.url, "https://www.youtube.com/watch?v=vid1");
    assert_eq!(rec.video_id, "vid1");
  }

  #[test]
  fn zero_views_means_zero_engagement() {
    let item = raw_item("vid1", Some("0"), Some("40"), "PT10S");
    let rec = normalize_item(&item, &categories(), now()).unwrap();
    assert_eq!(rec.engagement_rate, 0.0);
    assert_eq!(rec.views_per_hour, 0);
  }

  #[test]
  fn missing_statistics_default_to_zero() {
    let mut item = raw_item("vid1", None, None, "PT10S");
    item.statistics = None;
    let rec = normalize_item(&item, &categories(), now()).unwrap();
    assert_eq!((rec.views, rec.likes, rec.comments), (0, 0, 0));
  }

  #[test]
  fn fresh_upload_divides_by_one_hour() {
    let published = Utc.with_ymd_and_hms(2024, 5, 1, 9, 59, 30).unwrap();
    assert_eq!(views_per_hour(500, published, now()), 500);
    // Clock skew: publish time in the future still floors at one hour.
    let future = Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap();
    assert_eq!(views_per_hour(500, future, now()), 500);
  }

  #[test]
  fn views_per_hour_floors() {
    let published = Utc.with_ymd_and_hms(2024, 5, 1, 7, 0, 0).unwrap();
    assert_eq!(views_per_hour(1000, published, now()), 333);
  }

  #[test]
  fn short_form_boundary() {
    assert_eq!(VideoKind::from_seconds(60), VideoKind::Short);
    assert_eq!(VideoKind::from_seconds(61), VideoKind::Long);
    let rec = normalize_item(&raw_item("s", Some("1"), None, "PT1M"), &categories(), now()).unwrap();
    assert_eq!(rec.kind, VideoKind::Short);
    let rec = normalize_item(&raw_item("l", Some("1"), None, "PT1M1S"), &categories(), now()).unwrap();
    assert_eq!(rec.kind, VideoKind::Long);
  }

  #[test]
  fn unknown_category_uses_fallback() {
    let mut item = raw_item("vid1", Some("1"), None, "PT1M");
    item.snippet.as_mut().unwrap().category_id = Some("999".into());
    let rec = normalize_item(&item, &categories(), now()).unwrap();
    assert_eq!(rec.category, constants().fallback_category);
  }

  #[test]
  fn structural_failures() {
    let mut item = raw_item("vid1", Some("1"), None, "PT1M");
    item.snippet = None;
    assert_eq!(normalize_item(&item, &categories(), now()), Err(ItemError::MissingSnippet("vid1".into())));

    let item = raw_item("vid2", Some("1"), None, "bogus");
    assert!(matches!(normalize_item(&item, &categories(), now()), Err(ItemError::Duration { .. })));

    let item = raw_item("vid3", Some("many"), None, "PT1M");
    assert!(matches!(normalize_item(&item, &categories(), now()), Err(ItemError::BadCount { field: "viewCount", .. })));

    let mut item = raw_item("vid4", Some("1"), None, "PT1M");
    item.snippet.as_mut().unwrap().published_at = Some("yesterday".into());
    assert!(matches!(normalize_item(&item, &categories(), now()), Err(ItemError::BadTimestamp { .. })));
  }

  #[test]
  fn missing_wire_fields_are_item_failures() {
    let mut item = raw_item("vid1", Some("1"), None, "PT1M");
    item.snippet.as_mut().unwrap().published_at = None;
    assert_eq!(
      normalize_item(&item, &categories(), now()),
      Err(ItemError::MissingField { id: "vid1".into(), field: "publishedAt" })
    );

    let mut item = raw_item("vid2", Some("1"), None, "PT1M");
    item.content_details.as_mut().unwrap().duration = None;
    assert_eq!(
      normalize_item(&item, &categories(), now()),
      Err(ItemError::MissingField { id: "vid2".into(), field: "duration" })
    );

    let item = raw_item("", Some("1"), None, "PT1M");
    assert!(matches!(normalize_item(&item, &categories(), now()), Err(ItemError::MissingField { field: "id", .. })));
  }
}
