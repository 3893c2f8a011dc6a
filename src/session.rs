//! Per-session context: everything the presentation layer needs to call the pipeline.

use chrono::Utc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::cache::ResultCache;
use crate::constants::constants;
use crate::dataset::Dataset;
use crate::error::RetrievalError;
use crate::model::CategoryMap;
use crate::strategy::{self, Outcome, Request};
use crate::trends::Trends;
use crate::youtube::{VideoApi, YouTubeClient};

pub struct Session {
  pub api: YouTubeClient,
  pub trends: Trends,
  /// Loaded once, then shared read-only with every strategy.
  pub categories: Option<Arc<CategoryMap>>,
  pub cache: ResultCache,
  pub region: String,
  pub language: String,
  pub excluded: Vec<String>,
}

impl Session {
  pub fn new(api: YouTubeClient, trends: Trends, region: String, language: String, excluded: Vec<String>) -> Self {
    Self {
      api,
      trends,
      categories: None,
      cache: ResultCache::new(Duration::from_secs(constants().cache_ttl_secs)),
      region,
      language,
      excluded,
    }
  }

  pub fn chart_request(&self) -> Request {
    Request::chart(self.region.clone(), &self.excluded)
  }

  pub fn category_top_request(&self) -> Request {
    Request::category_top(self.region.clone(), &self.excluded)
  }

  pub fn trends_request(&self) -> Request {
    Request::trends(self.region.clone())
  }

  /// The category map, fetching it on first use.
  pub async fn ensure_categories(&mut self) -> Result<Arc<CategoryMap>, RetrievalError> {
    if let Some(categories) = &self.categories {
      return Ok(Arc::clone(categories));
    }
    let categories = Arc::new(self.api.categories(&self.region, &self.language).await?);
    if categories.is_empty() {
      warn!(region = %self.region, "session: region has no categories");
    }
    info!(region = %self.region, count = categories.len(), "session: categories loaded");
    self.categories = Some(Arc::clone(&categories));
    Ok(categories)
  }

  /// A cached table for `request`, if still fresh.
  pub fn cached(&mut self, request: &Request) -> Option<Dataset> {
    self.cache.get(request, Instant::now()).map(|entry| entry.dataset.clone())
  }

  /// Keep successful tables; empty and failed outcomes are always re-fetched.
  pub fn remember(&mut self, request: &Request, outcome: &Outcome) {
    if let Outcome::Table(ds) = outcome {
      self.cache.insert(request.clone(), ds.clone(), Instant::now());
      debug!(strategy = request.name(), rows = ds.len(), entries = self.cache.len(), "session: cached result");
    }
  }

  /// Blocking-style fetch used by the headless commands: cache, then pipeline.
  pub async fn fetch(&mut self, request: &Request) -> Outcome {
    if let Some(ds) = self.cached(request) {
      return Outcome::Table(ds);
    }
    let categories = match self.ensure_categories().await {
      Ok(c) => c,
      Err(e) => return Outcome::Failed(format!("Failed to load categories: {}", e)),
    };
    let outcome = strategy::run(&self.api, &self.trends, &categories, request, Utc::now()).await;
    self.remember(request, &outcome);
    outcome
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::trends::StaticTrends;
  use serde_json::json;
  use wiremock::matchers::path;
  use wiremock::{Mock, MockServer, ResponseTemplate};

  async fn session(server: &MockServer) -> Session {
    let api = YouTubeClient::with_base("k".into(), server.uri()).unwrap();
    Session::new(api, Trends::Static(StaticTrends::default()), "KR".into(), "en".into(), vec!["Music".into()])
  }

  #[tokio::test]
  async fn search_goes_through_cache_on_second_fetch() {
    let server = MockServer::start().await;
    Mock::given(path("/videoCategories"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
        "items": [{"id": "24", "snippet": {"title": "Entertainment", "assignable": true}}]
      })))
      .expect(1)
      .mount(&server)
      .await;
    Mock::given(path("/search"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": [{"id": {"videoId": "v1"}}]})))
      .expect(1)
      .mount(&server)
      .await;
    Mock::given(path("/videos"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": [{
        "id": "v1",
        "snippet": {"title": "Hello", "channelTitle": "Ch", "publishedAt": "2024-01-01T00:00:00Z", "categoryId": "24"},
        "statistics": {"viewCount": "1000", "likeCount": "10", "commentCount": "2"},
        "contentDetails": {"duration": "PT45S"}
      }]})))
      .expect(1)
      .mount(&server)
      .await;

    let mut session = session(&server).await;
    let request = Request::search("hello", None);
    let first = session.fetch(&request).await;
    let Outcome::Table(ds) = first else { panic!("expected a table") };
    assert_eq!(ds.rows()[0].category, "Entertainment");
    assert_eq!(session.fetch(&request).await, Outcome::Table(ds));
  }

  #[tokio::test]
  async fn category_failure_becomes_failed_outcome() {
    let server = MockServer::start().await;
    Mock::given(path("/videoCategories")).respond_with(ResponseTemplate::new(500)).mount(&server).await;

    let mut session = session(&server).await;
    let request = session.chart_request();
    let outcome = session.fetch(&request).await;
    assert!(matches!(outcome, Outcome::Failed(msg) if msg.starts_with("Failed to load categories")));
  }

  #[tokio::test]
  async fn empty_outcomes_are_not_cached() {
    let server = MockServer::start().await;
    let mut session = session(&server).await;
    let request = Request::search("x", None);
    session.remember(&request, &Outcome::Empty);
    assert!(session.cached(&request).is_none());
  }
}
