//! The four retrieval strategies: keyword search, trending chart, per-category top-N, and trend-joined.
//!
//! Each strategy returns `Result<Dataset, RetrievalError>`; `run` is the entry point the
//! presentation layer uses and turns that into an explicit `Outcome`.

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

use crate::constants::constants;
use crate::dataset::{Dataset, build_dataset};
use crate::error::RetrievalError;
use crate::model::{CategoryMap, RawVideoItem};
use crate::normalize::TrendTag;
use crate::trends::TrendSource;
use crate::youtube::{SearchOrder, SearchQuery, VideoApi};

/// What a strategy produced, for the presentation layer to render.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
  Table(Dataset),
  /// The query was fine but matched nothing.
  Empty,
  /// The strategy's call failed; the message is meant for the user.
  Failed(String),
}

impl From<Result<Dataset, RetrievalError>> for Outcome {
  fn from(result: Result<Dataset, RetrievalError>) -> Self {
    match result {
      Ok(ds) if ds.is_empty() => Outcome::Empty,
      Ok(ds) => Outcome::Table(ds),
      Err(e) => Outcome::Failed(e.to_string()),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchParams {
  pub query: String,
  pub limit: u32,
  pub region: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChartParams {
  pub region: String,
  /// Category names to drop; resolved to ids through the category map.
  pub excluded: Vec<String>,
  pub target: usize,
  pub page_size: u32,
  pub max_pages: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CategoryTopParams {
  pub region: String,
  pub excluded: Vec<String>,
  pub recency_days: i64,
  pub sub_limit: u32,
  pub final_cap: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrendParams {
  pub region: String,
}

/// A strategy plus its parameters. Doubles as the result cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Request {
  Search(SearchParams),
  Chart(ChartParams),
  CategoryTop(CategoryTopParams),
  Trends(TrendParams),
}

impl Request {
  pub fn search(query: impl Into<String>, region: Option<String>) -> Self {
    Request::Search(SearchParams { query: query.into(), limit: constants().search_limit, region })
  }

  pub fn chart(region: impl Into<String>, excluded: &[String]) -> Self {
    let c = constants();
    Request::Chart(ChartParams {
      region: region.into(),
      excluded: sorted(excluded),
      target: c.chart_target,
      page_size: c.chart_page_size,
      max_pages: c.chart_max_pages,
    })
  }

  pub fn category_top(region: impl Into<String>, excluded: &[String]) -> Self {
    let c = constants();
    Request::CategoryTop(CategoryTopParams {
      region: region.into(),
      excluded: sorted(excluded),
      recency_days: c.recency_days,
      sub_limit: c.category_sub_limit,
      final_cap: c.category_final_cap,
    })
  }

  pub fn trends(region: impl Into<String>) -> Self {
    Request::Trends(TrendParams { region: region.into() })
  }

  pub fn name(&self) -> &'static str {
    match self {
      Request::Search(_) => "search",
      Request::Chart(_) => "chart",
      Request::CategoryTop(_) => "category_top",
      Request::Trends(_) => "trends",
    }
  }

  /// Short human label, used for status lines and export file names.
  pub fn label(&self) -> String {
    match self {
      Request::Search(p) => p.query.clone(),
      Request::Chart(p) => format!("chart_{}", p.region),
      Request::CategoryTop(p) => format!("top_{}", p.region),
      Request::Trends(p) => format!("trends_{}", p.region),
    }
  }
}

fn sorted(names: &[String]) -> Vec<String> {
  let mut names = names.to_vec();
  names.sort();
  names.dedup();
  names
}

/// Run one request end to end. Never panics; failures come back as `Outcome::Failed`.
pub async fn run<A, T>(api: &A, trends: &T, categories: &CategoryMap, request: &Request, now: DateTime<Utc>) -> Outcome
where
  A: VideoApi,
  T: TrendSource,
{
  let result = match request {
    Request::Search(p) => keyword_search(api, categories, p, now).await,
    Request::Chart(p) => trending_chart(api, categories, p, now).await,
    Request::CategoryTop(p) => category_top(api, categories, p, now).await,
    Request::Trends(p) => match trends.trending_phrases(&p.region).await {
      Ok(phrases) => trend_joined(api, categories, &phrases, Some(&p.region), now).await,
      Err(e) => Err(e),
    },
  };
  let outcome = Outcome::from(result);
  match &outcome {
    Outcome::Table(ds) => info!(strategy = request.name(), rows = ds.len(), "strategy: done"),
    Outcome::Empty => info!(strategy = request.name(), "strategy: no results"),
    Outcome::Failed(msg) => warn!(strategy = request.name(), err = %msg, "strategy: failed"),
  }
  outcome
}

/// Relevance search, then one batched detail lookup, sorted by views (descending).
pub async fn keyword_search<A: VideoApi>(
  api: &A,
  categories: &CategoryMap,
  params: &SearchParams,
  now: DateTime<Utc>,
) -> Result<Dataset, RetrievalError> {
  let mut query = SearchQuery::relevance(&params.query, params.limit);
  query.region = params.region.as_deref();
  let ids = api.search(&query).await?;
  if ids.is_empty() {
    return Ok(Dataset::default());
  }
  let items = api.videos(&ids).await?;
  let mut ds = build_dataset(&items, categories, now);
  ds.sort_by_views_desc();
  Ok(ds)
}

fn is_excluded(item: &RawVideoItem, excluded_ids: &HashSet<String>) -> bool {
  item.snippet.as_ref().and_then(|s| s.category_id.as_ref()).is_some_and(|id| excluded_ids.contains(id))
}

/// Page through the most-popular chart, dropping excluded categories, until the target is met,
/// the chart runs out, or the page ceiling is hit. Never returns more than `target` rows.
pub async fn trending_chart<A: VideoApi>(
  api: &A,
  categories: &CategoryMap,
  params: &ChartParams,
  now: DateTime<Utc>,
) -> Result<Dataset, RetrievalError> {
  let excluded_ids = categories.ids_named(&params.excluded);
  let mut kept: Vec<RawVideoItem> = Vec::new();
  let mut token: Option<String> = None;
  let mut pages = 0usize;

  while pages < params.max_pages {
    let page = api.popular_page(&params.region, params.page_size, token.as_deref()).await?;
    pages += 1;
    let fetched = page.items.len();
    kept.extend(page.items.into_iter().filter(|item| !is_excluded(item, &excluded_ids)));
    debug!(page = pages, fetched, kept = kept.len(), "chart: page");

    if kept.len() >= params.target {
      break;
    }
    match page.next_page_token {
      Some(next) => token = Some(next),
      None => break,
    }
  }

  info!(pages, kept = kept.len(), target = params.target, "chart: collected");
  let mut ds = build_dataset(&kept, categories, now);
  ds.truncate(params.target);
  Ok(ds)
}

/// Top videos by view count for every searchable, non-excluded category within the recency
/// window, merged without duplicates, sorted by views and capped.
///
/// A failing category only costs its own slice of results; only when every category query
/// fails is the whole strategy reported as failed.
pub async fn category_top<A: VideoApi>(
  api: &A,
  categories: &CategoryMap,
  params: &CategoryTopParams,
  now: DateTime<Utc>,
) -> Result<Dataset, RetrievalError> {
  let excluded_ids = categories.ids_named(&params.excluded);
  let published_after = now - chrono::Duration::days(params.recency_days);
  let region = params.region.as_str();
  let sub_limit = params.sub_limit;

  let targets: Vec<String> =
    categories.assignable_ids().filter(|id| !excluded_ids.contains(*id)).map(str::to_string).collect();
  let total = targets.len();

  // Owned ids: the spawned strategy future must stay `Send`.
  let results: Vec<(String, Result<Vec<String>, RetrievalError>)> = stream::iter(targets)
    .map(|category_id: String| async move {
      let found = {
        let query = SearchQuery {
          text: None,
          order: SearchOrder::ViewCount,
          limit: sub_limit,
          region: Some(region),
          category_id: Some(category_id.as_str()),
          published_after: Some(published_after),
        };
        api.search(&query).await
      };
      (category_id, found)
    })
    .buffer_unordered(constants().category_concurrency.max(1))
    .collect()
    .await;

  let mut seen: HashSet<String> = HashSet::new();
  let mut ids: Vec<String> = Vec::new();
  let mut failures = 0usize;
  let mut last_err = None;
  for (category_id, result) in results {
    match result {
      Ok(found) => {
        for id in found {
          if seen.insert(id.clone()) {
            ids.push(id);
          }
        }
      }
      Err(e) => {
        warn!(category = %category_id, err = %e, "category_top: category query failed");
        failures += 1;
        last_err = Some(e);
      }
    }
  }

  if failures == total
    && let Some(e) = last_err
  {
    return Err(e);
  }
  info!(categories = total, failures, unique = ids.len(), "category_top: collected");
  if ids.is_empty() {
    return Ok(Dataset::default());
  }

  let items = api.videos(&ids).await?;
  let mut ds = build_dataset(&items, categories, now);
  ds.sort_by_views_desc();
  ds.truncate(params.final_cap);
  Ok(ds)
}

/// Resolve each trending phrase to its single best-matching video and return the videos in
/// phrase order (a ranked join, not a metric sort). Phrases without a hit are dropped.
pub async fn trend_joined<A: VideoApi>(
  api: &A,
  categories: &CategoryMap,
  phrases: &[String],
  region: Option<&str>,
  now: DateTime<Utc>,
) -> Result<Dataset, RetrievalError> {
  // (rank, phrase) by first appearance; the phrase -> id map is last-write-wins.
  let mut ranking: Vec<(usize, &str)> = Vec::new();
  let mut hits: HashMap<&str, String> = HashMap::new();
  let mut failures = 0usize;
  let mut last_err = None;

  for (idx, phrase) in phrases.iter().enumerate() {
    let phrase = phrase.as_str();
    if !ranking.iter().any(|(_, p)| *p == phrase) {
      ranking.push((idx + 1, phrase));
    }
    let mut query = SearchQuery::relevance(phrase, 1);
    query.region = region;
    match api.search(&query).await {
      Ok(ids) => match ids.into_iter().next() {
        Some(id) => {
          hits.insert(phrase, id);
        }
        None => debug!(phrase, "trends: no matching video"),
      },
      Err(e) => {
        warn!(phrase, err = %e, "trends: phrase search failed");
        failures += 1;
        last_err = Some(e);
      }
    }
  }

  if failures == phrases.len()
    && let Some(e) = last_err
  {
    return Err(e);
  }

  let mut ids: Vec<String> = Vec::new();
  for (_, phrase) in &ranking {
    if let Some(id) = hits.get(phrase)
      && !ids.contains(id)
    {
      ids.push(id.clone());
    }
  }
  if ids.is_empty() {
    return Ok(Dataset::default());
  }

  let items = api.videos(&ids).await?;
  let by_id: HashMap<String, _> =
    build_dataset(&items, categories, now).into_rows().into_iter().map(|r| (r.video_id.clone(), r)).collect();

  let rows = ranking
    .into_iter()
    .filter_map(|(rank, phrase)| {
      let record = by_id.get(hits.get(phrase)?)?;
      let mut record = record.clone();
      record.trend = Some(TrendTag { rank, phrase: phrase.to_string() });
      Some(record)
    })
    .collect();
  Ok(Dataset::from_rows(rows))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::normalize::tests::raw_item;
  use crate::trends::StaticTrends;
  use crate::youtube::ChartPage;
  use chrono::TimeZone;
  use std::sync::Mutex;

  #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
  struct Calls {
    search: usize,
    videos: usize,
    pages: usize,
  }

  /// In-memory stand-in for the platform API.
  #[derive(Default)]
  struct FakeApi {
    videos: HashMap<String, RawVideoItem>,
    /// Search hits keyed by query text, or by category id for category queries.
    hits: HashMap<String, Vec<String>>,
    failing_keys: HashSet<String>,
    chart: Vec<Vec<RawVideoItem>>,
    fail_chart: bool,
    calls: Mutex<Calls>,
  }

  impl FakeApi {
    fn with_video(mut self, id: &str, views: u64, category: &str) -> Self {
      let mut item = raw_item(id, Some(&views.to_string()), Some("1"), "PT2M");
      item.snippet.as_mut().unwrap().category_id = Some(category.to_string());
      self.videos.insert(id.to_string(), item);
      self
    }

    fn with_hits(mut self, key: &str, ids: &[&str]) -> Self {
      self.hits.insert(key.to_string(), ids.iter().map(|s| s.to_string()).collect());
      self
    }

    fn failing(mut self, key: &str) -> Self {
      self.failing_keys.insert(key.to_string());
      self
    }

    fn calls(&self) -> Calls {
      *self.calls.lock().unwrap()
    }
  }

  impl VideoApi for FakeApi {
    async fn categories(&self, _region: &str, _language: &str) -> Result<CategoryMap, RetrievalError> {
      Ok(categories())
    }

    async fn search(&self, query: &SearchQuery<'_>) -> Result<Vec<String>, RetrievalError> {
      self.calls.lock().unwrap().search += 1;
      let key = query.category_id.or(query.text).unwrap_or_default();
      if self.failing_keys.contains(key) {
        return Err(RetrievalError::Network(format!("boom: {}", key)));
      }
      let mut ids = self.hits.get(key).cloned().unwrap_or_default();
      ids.truncate(query.limit as usize);
      Ok(ids)
    }

    async fn videos(&self, ids: &[String]) -> Result<Vec<RawVideoItem>, RetrievalError> {
      self.calls.lock().unwrap().videos += 1;
      Ok(ids.iter().filter_map(|id| self.videos.get(id).cloned()).collect())
    }

    async fn popular_page(
      &self,
      _region: &str,
      _page_size: u32,
      page_token: Option<&str>,
    ) -> Result<ChartPage, RetrievalError> {
      self.calls.lock().unwrap().pages += 1;
      if self.fail_chart {
        return Err(RetrievalError::Api { code: 403, message: "quotaExceeded".into() });
      }
      let idx = page_token.and_then(|t| t.parse::<usize>().ok()).unwrap_or(0);
      let items = self.chart.get(idx).cloned().unwrap_or_default();
      let next_page_token = (idx + 1 < self.chart.len()).then(|| (idx + 1).to_string());
      Ok(ChartPage { items, next_page_token })
    }
  }

  fn categories() -> CategoryMap {
    let mut map = CategoryMap::new();
    map.insert("10", "Music", true);
    map.insert("17", "Sports", true);
    map.insert("20", "Gaming", true);
    map.insert("24", "Entertainment", true);
    map.insert("25", "News", true);
    map.insert("43", "Shows", false);
    map
  }

  fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
  }

  fn ids(ds: &Dataset) -> Vec<&str> {
    ds.rows().iter().map(|r| r.video_id.as_str()).collect()
  }

  fn excluded() -> Vec<String> {
    vec!["Music".to_string(), "Gaming".to_string()]
  }

  // --- keyword search ---

  fn search_params(query: &str) -> SearchParams {
    SearchParams { query: query.to_string(), limit: 50, region: None }
  }

  #[tokio::test]
  async fn keyword_search_sorts_by_views_desc() {
    let api = FakeApi::default()
      .with_video("a", 10, "24")
      .with_video("b", 3000, "24")
      .with_video("c", 200, "10")
      .with_hits("cats", &["a", "b", "c"]);
    let ds = keyword_search(&api, &categories(), &search_params("cats"), now()).await.unwrap();
    assert_eq!(ids(&ds), vec!["b", "c", "a"]);
    assert_eq!(api.calls(), Calls { search: 1, videos: 1, pages: 0 });
  }

  #[tokio::test]
  async fn keyword_search_without_hits_is_empty_and_skips_lookup() {
    let api = FakeApi::default();
    let outcome = run(&api, &StaticTrends::default(), &categories(), &Request::search("nothing", None), now()).await;
    assert_eq!(outcome, Outcome::Empty);
    assert_eq!(api.calls().videos, 0);
  }

  #[tokio::test]
  async fn keyword_search_failure_is_reported_not_raised() {
    let api = FakeApi::default().failing("cats");
    let outcome = run(&api, &StaticTrends::default(), &categories(), &Request::search("cats", None), now()).await;
    match outcome {
      Outcome::Failed(msg) => assert!(msg.contains("boom")),
      other => panic!("expected failure, got {other:?}"),
    }
  }

  // --- trending chart ---

  /// `pages` pages of `per_page` items, alternating an excluded (Music) and a kept (News) category.
  fn chart_api(pages: usize, per_page: usize) -> FakeApi {
    let mut api = FakeApi::default();
    for p in 0..pages {
      let page = (0..per_page)
        .map(|i| {
          let id = format!("p{}-{}", p, i);
          let mut item = raw_item(&id, Some("100"), None, "PT5M");
          let category = if i % 2 == 0 { "10" } else { "25" };
          item.snippet.as_mut().unwrap().category_id = Some(category.to_string());
          item
        })
        .collect();
      api.chart.push(page);
    }
    api
  }

  fn chart_params(target: usize, max_pages: usize) -> ChartParams {
    ChartParams { region: "KR".into(), excluded: excluded(), target, page_size: 50, max_pages }
  }

  #[tokio::test]
  async fn chart_stops_once_target_is_met() {
    let api = chart_api(10, 50);
    let ds = trending_chart(&api, &categories(), &chart_params(60, 10), now()).await.unwrap();
    // 25 kept per page: 25, 50, 75 -> stop after the third page.
    assert_eq!(api.calls().pages, 3);
    assert_eq!(ds.len(), 60);
    assert!(ds.rows().iter().all(|r| r.category == "News"));
  }

  #[tokio::test]
  async fn chart_stops_when_chart_is_exhausted() {
    let api = chart_api(2, 50);
    let ds = trending_chart(&api, &categories(), &chart_params(200, 10), now()).await.unwrap();
    assert_eq!(api.calls().pages, 2);
    assert_eq!(ds.len(), 50);
  }

  #[tokio::test]
  async fn chart_respects_page_ceiling() {
    let api = chart_api(10, 50);
    let ds = trending_chart(&api, &categories(), &chart_params(200, 4), now()).await.unwrap();
    assert_eq!(api.calls().pages, 4);
    assert_eq!(ds.len(), 100);
  }

  #[tokio::test]
  async fn chart_page_failure_fails_strategy() {
    let mut api = chart_api(3, 50);
    api.fail_chart = true;
    let outcome = run(&api, &StaticTrends::default(), &categories(), &Request::chart("KR", &excluded()), now()).await;
    assert!(matches!(outcome, Outcome::Failed(_)));
  }

  #[tokio::test]
  async fn chart_keeps_items_without_category() {
    let mut api = FakeApi::default();
    let mut item = raw_item("nocat", Some("5"), None, "PT5M");
    item.snippet.as_mut().unwrap().category_id = None;
    api.chart.push(vec![item]);
    let ds = trending_chart(&api, &categories(), &chart_params(10, 10), now()).await.unwrap();
    assert_eq!(ids(&ds), vec!["nocat"]);
    assert_eq!(ds.rows()[0].category, constants().fallback_category);
  }

  // --- per-category aggregation ---

  fn top_params(final_cap: usize) -> CategoryTopParams {
    CategoryTopParams { region: "KR".into(), excluded: excluded(), recency_days: 90, sub_limit: 15, final_cap }
  }

  fn top_api() -> FakeApi {
    FakeApi::default()
      .with_video("shared", 5000, "24")
      .with_video("s1", 100, "17")
      .with_video("e1", 900, "24")
      .with_video("n1", 40, "25")
      .with_video("m1", 99999, "10")
      .with_hits("17", &["s1", "shared"])
      .with_hits("24", &["shared", "e1"])
      .with_hits("25", &["n1"])
      .with_hits("10", &["m1"])
  }

  #[tokio::test]
  async fn category_top_dedups_sorts_and_skips_excluded() {
    let api = top_api();
    let ds = category_top(&api, &categories(), &top_params(100), now()).await.unwrap();
    assert_eq!(ids(&ds), vec!["shared", "e1", "s1", "n1"]);
    // Sports, Entertainment, News: Music and Gaming excluded, Shows not assignable.
    assert_eq!(api.calls(), Calls { search: 3, videos: 1, pages: 0 });
  }

  #[tokio::test]
  async fn category_top_truncates_to_cap() {
    let api = top_api();
    let ds = category_top(&api, &categories(), &top_params(2), now()).await.unwrap();
    assert_eq!(ids(&ds), vec!["shared", "e1"]);
  }

  #[tokio::test]
  async fn category_top_isolates_failing_category() {
    let api = top_api().failing("24");
    let ds = category_top(&api, &categories(), &top_params(100), now()).await.unwrap();
    assert_eq!(ids(&ds), vec!["shared", "s1", "n1"]);
  }

  #[tokio::test]
  async fn category_top_fails_when_every_category_fails() {
    let api = top_api().failing("17").failing("24").failing("25");
    let result = category_top(&api, &categories(), &top_params(100), now()).await;
    assert!(result.is_err());
  }

  #[tokio::test]
  async fn category_top_runs_on_a_spawned_task() {
    let api = std::sync::Arc::new(top_api());
    let task_api = api.clone();
    let request = Request::CategoryTop(top_params(100));
    let outcome =
      tokio::spawn(async move { run(&*task_api, &StaticTrends::default(), &categories(), &request, now()).await })
        .await
        .unwrap();
    match outcome {
      Outcome::Table(ds) => assert_eq!(ids(&ds), vec!["shared", "e1", "s1", "n1"]),
      other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(api.calls().search, 3);
  }

  // --- trend-joined ---

  #[tokio::test]
  async fn trend_join_keeps_phrase_order_and_drops_misses() {
    let api = FakeApi::default()
      .with_video("low", 5, "24")
      .with_video("high", 5000, "24")
      .with_hits("first", &["low"])
      .with_hits("third", &["high"]);
    let phrases: Vec<String> = ["first", "no hits", "third"].iter().map(|s| s.to_string()).collect();
    let ds = trend_joined(&api, &categories(), &phrases, None, now()).await.unwrap();
    assert_eq!(ids(&ds), vec!["low", "high"]);
    let tags: Vec<(usize, &str)> =
      ds.rows().iter().map(|r| r.trend.as_ref().map(|t| (t.rank, t.phrase.as_str())).unwrap()).collect();
    assert_eq!(tags, vec![(1, "first"), (3, "third")]);
    assert_eq!(api.calls().videos, 1);
  }

  #[tokio::test]
  async fn trend_join_repeated_phrase_appears_once() {
    let api = FakeApi::default().with_video("v", 5, "24").with_hits("dup", &["v"]);
    let phrases: Vec<String> = ["dup", "dup"].iter().map(|s| s.to_string()).collect();
    let ds = trend_joined(&api, &categories(), &phrases, None, now()).await.unwrap();
    assert_eq!(ds.len(), 1);
    assert_eq!(ds.rows()[0].trend.as_ref().unwrap().rank, 1);
  }

  #[tokio::test]
  async fn trend_join_via_run_uses_trend_source() {
    let api = FakeApi::default().with_video("v", 5, "24").with_hits("alpha", &["v"]);
    let trends = StaticTrends::new(vec!["alpha".into(), "beta".into()]);
    let outcome = run(&api, &trends, &categories(), &Request::trends("KR"), now()).await;
    match outcome {
      Outcome::Table(ds) => assert_eq!(ids(&ds), vec!["v"]),
      other => panic!("expected table, got {other:?}"),
    }
  }

  #[tokio::test]
  async fn trend_join_with_no_phrases_is_empty() {
    let api = FakeApi::default();
    let outcome = run(&api, &StaticTrends::default(), &categories(), &Request::trends("KR"), now()).await;
    assert_eq!(outcome, Outcome::Empty);
    assert_eq!(api.calls().search, 0);
  }

  // --- requests ---

  #[test]
  fn request_key_ignores_exclusion_order() {
    let a = Request::chart("KR", &["Music".into(), "Gaming".into()]);
    let b = Request::chart("KR", &["Gaming".into(), "Music".into()]);
    assert_eq!(a, b);
    assert_ne!(a, Request::chart("US", &["Music".into(), "Gaming".into()]));
    assert_eq!(a.name(), "chart");
    assert_eq!(Request::search("lofi", None).label(), "lofi");
  }
}
