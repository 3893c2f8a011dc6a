//! YouTube Data API v3 access.
//!
//! Strategies only see the `VideoApi` trait; `YouTubeClient` is the HTTP implementation.
//! All calls are read-only.

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::constants::constants;
use crate::error::RetrievalError;
use crate::model::{CategoryMap, RawVideoItem};

/// User agent for API requests.
const USER_AGENT: &str = concat!("yta/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOrder {
  Relevance,
  ViewCount,
}

impl SearchOrder {
  fn as_param(self) -> &'static str {
    match self {
      SearchOrder::Relevance => "relevance",
      SearchOrder::ViewCount => "viewCount",
    }
  }
}

/// Parameters of a video-only `search.list` call.
#[derive(Debug, Clone)]
pub struct SearchQuery<'a> {
  pub text: Option<&'a str>,
  pub order: SearchOrder,
  pub limit: u32,
  pub region: Option<&'a str>,
  pub category_id: Option<&'a str>,
  pub published_after: Option<DateTime<Utc>>,
}

impl<'a> SearchQuery<'a> {
  pub fn relevance(text: &'a str, limit: u32) -> Self {
    Self { text: Some(text), order: SearchOrder::Relevance, limit, region: None, category_id: None, published_after: None }
  }
}

/// One page of the most-popular chart.
#[derive(Debug, Clone, Default)]
pub struct ChartPage {
  pub items: Vec<RawVideoItem>,
  pub next_page_token: Option<String>,
}

/// The platform calls the retrieval strategies need.
pub trait VideoApi {
  /// Category id -> name for a region, names localized to `language`.
  fn categories(&self, region: &str, language: &str) -> impl Future<Output = Result<CategoryMap, RetrievalError>> + Send;

  /// Video ids matching `query`, in the platform's order.
  fn search(&self, query: &SearchQuery<'_>) -> impl Future<Output = Result<Vec<String>, RetrievalError>> + Send;

  /// Full records for `ids`. Unknown ids are silently absent from the result.
  fn videos(&self, ids: &[String]) -> impl Future<Output = Result<Vec<RawVideoItem>, RetrievalError>> + Send;

  fn popular_page(
    &self,
    region: &str,
    page_size: u32,
    page_token: Option<&str>,
  ) -> impl Future<Output = Result<ChartPage, RetrievalError>> + Send;
}

// --- Wire types ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse<T> {
  #[serde(default = "Vec::new")]
  items: Vec<T>,
  next_page_token: Option<String>,
}

/// Decode each video item on its own, so one malformed entry only costs itself.
fn decode_items(values: Vec<serde_json::Value>) -> Vec<RawVideoItem> {
  values
    .into_iter()
    .filter_map(|value| match serde_json::from_value::<RawVideoItem>(value) {
      Ok(item) => Some(item),
      Err(e) => {
        warn!(err = %e, "youtube: skipping undecodable item");
        None
      }
    })
    .collect()
}

#[derive(Debug, Deserialize)]
struct SearchItem {
  id: SearchItemId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
  video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CategoryItem {
  id: String,
  snippet: CategorySnippet,
}

#[derive(Debug, Deserialize)]
struct CategorySnippet {
  title: String,
  #[serde(default)]
  assignable: bool,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
  error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
  code: u16,
  message: String,
}

// --- HTTP client ---

#[derive(Debug, Clone)]
pub struct YouTubeClient {
  http: Client,
  api_base: String,
  api_key: String,
}

impl YouTubeClient {
  pub fn new(api_key: String) -> Result<Self, RetrievalError> {
    Self::with_base(api_key, constants().api_base.clone())
  }

  /// Point the client at a different API root (a local mock in tests).
  pub fn with_base(api_key: String, api_base: String) -> Result<Self, RetrievalError> {
    if api_key.trim().is_empty() {
      return Err(RetrievalError::MissingKey);
    }
    let http = Client::builder()
      .user_agent(USER_AGENT)
      .timeout(Duration::from_secs(constants().http_timeout_secs))
      .build()
      .map_err(|e| RetrievalError::Network(format!("failed to create HTTP client: {}", e)))?;
    Ok(Self { http, api_base: api_base.trim_end_matches('/').to_string(), api_key })
  }

  pub fn http(&self) -> &Client {
    &self.http
  }

  async fn get_json<T: DeserializeOwned>(&self, endpoint: &str, params: &[(&str, String)]) -> Result<T, RetrievalError> {
    // Params are logged without the key.
    debug!(endpoint, ?params, "youtube: request");
    let response = self
      .http
      .get(format!("{}/{}", self.api_base, endpoint))
      .query(params)
      .query(&[("key", self.api_key.as_str())])
      .send()
      .await?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(env) => RetrievalError::Api { code: env.error.code, message: env.error.message },
        Err(_) => RetrievalError::Api { code: status.as_u16(), message: status.to_string() },
      });
    }

    response.json::<T>().await.map_err(|e| RetrievalError::Decode(e.to_string()))
  }
}

impl VideoApi for YouTubeClient {
  async fn categories(&self, region: &str, language: &str) -> Result<CategoryMap, RetrievalError> {
    let params = [("part", "snippet".to_string()), ("regionCode", region.to_string()), ("hl", language.to_string())];
    let response: ListResponse<CategoryItem> = self.get_json("videoCategories", &params).await?;
    let mut map = CategoryMap::new();
    for item in response.items {
      map.insert(item.id, item.snippet.title, item.snippet.assignable);
    }
    Ok(map)
  }

  async fn search(&self, query: &SearchQuery<'_>) -> Result<Vec<String>, RetrievalError> {
    let limit = query.limit.min(constants().max_results_per_call);
    let mut params = vec![
      ("part", "id".to_string()),
      ("type", "video".to_string()),
      ("order", query.order.as_param().to_string()),
      ("maxResults", limit.to_string()),
    ];
    if let Some(text) = query.text {
      params.push(("q", text.to_string()));
    }
    if let Some(region) = query.region {
      params.push(("regionCode", region.to_string()));
    }
    if let Some(category_id) = query.category_id {
      params.push(("videoCategoryId", category_id.to_string()));
    }
    if let Some(after) = query.published_after {
      params.push(("publishedAfter", after.to_rfc3339_opts(SecondsFormat::Secs, true)));
    }
    let response: ListResponse<SearchItem> = self.get_json("search", &params).await?;
    Ok(response.items.into_iter().filter_map(|item| item.id.video_id).collect())
  }

  async fn videos(&self, ids: &[String]) -> Result<Vec<RawVideoItem>, RetrievalError> {
    let mut items = Vec::with_capacity(ids.len());
    for chunk in ids.chunks(constants().max_ids_per_call.max(1)) {
      let params = [("part", "snippet,statistics,contentDetails".to_string()), ("id", chunk.join(","))];
      let response: ListResponse<serde_json::Value> = self.get_json("videos", &params).await?;
      items.extend(decode_items(response.items));
    }
    Ok(items)
  }

  async fn popular_page(
    &self,
    region: &str,
    page_size: u32,
    page_token: Option<&str>,
  ) -> Result<ChartPage, RetrievalError> {
    let mut params = vec![
      ("part", "snippet,statistics,contentDetails".to_string()),
      ("chart", "mostPopular".to_string()),
      ("regionCode", region.to_string()),
      ("maxResults", page_size.min(constants().max_results_per_call).to_string()),
    ];
    if let Some(token) = page_token {
      params.push(("pageToken", token.to_string()));
    }
    let response: ListResponse<serde_json::Value> = self.get_json("videos", &params).await?;
    Ok(ChartPage { items: decode_items(response.items), next_page_token: response.next_page_token.filter(|t| !t.is_empty()) })
  }
}
