//! Ranked trending search phrases from an outside source.

use regex::Regex;
use reqwest::Client;
use std::future::Future;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

use crate::error::RetrievalError;

/// Supplies currently trending search phrases for a region, best-ranked first.
pub trait TrendSource {
  fn trending_phrases(&self, region: &str) -> impl Future<Output = Result<Vec<String>, RetrievalError>> + Send;
}

static ITEM_TITLE_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?s)<item>.*?<title>(.*?)</title>").expect("item title pattern is a valid regex"));

/// Google Trends "trending now" RSS feed.
#[derive(Debug, Clone)]
pub struct GoogleTrends {
  http: Client,
  feed_url: String,
}

impl GoogleTrends {
  pub fn new(http: Client, feed_url: impl Into<String>) -> Self {
    Self { http, feed_url: feed_url.into() }
  }
}

impl TrendSource for GoogleTrends {
  async fn trending_phrases(&self, region: &str) -> Result<Vec<String>, RetrievalError> {
    let response = self.http.get(&self.feed_url).query(&[("geo", region)]).send().await?;
    let status = response.status();
    if !status.is_success() {
      return Err(RetrievalError::Api { code: status.as_u16(), message: format!("trends feed returned {}", status) });
    }
    let body = response.text().await?;
    let phrases = parse_feed_titles(&body);
    debug!(region, count = phrases.len(), "trends: feed parsed");
    Ok(phrases)
  }
}

/// Item titles in feed order. The channel's own `<title>` is outside any `<item>` and is skipped.
pub fn parse_feed_titles(xml: &str) -> Vec<String> {
  ITEM_TITLE_RE
    .captures_iter(xml)
    .filter_map(|caps| caps.get(1))
    .map(|m| unescape_xml(strip_cdata(m.as_str().trim())))
    .filter(|s| !s.is_empty())
    .collect()
}

fn strip_cdata(s: &str) -> &str {
  s.strip_prefix("<![CDATA[").and_then(|rest| rest.strip_suffix("]]>")).unwrap_or(s).trim()
}

fn unescape_xml(s: &str) -> String {
  s.replace("&lt;", "<")
    .replace("&gt;", ">")
    .replace("&quot;", "\"")
    .replace("&apos;", "'")
    .replace("&#39;", "'")
    .replace("&amp;", "&")
}

/// A fixed, operator-supplied ranking.
#[derive(Debug, Clone, Default)]
pub struct StaticTrends {
  phrases: Vec<String>,
}

impl StaticTrends {
  pub fn new(phrases: Vec<String>) -> Self {
    Self { phrases }
  }

  /// One phrase per line; blank lines and `#` comments are skipped.
  pub fn from_file(path: &Path) -> anyhow::Result<Self> {
    use anyhow::Context;
    let content =
      std::fs::read_to_string(path).with_context(|| format!("Failed to read trend phrases from {}", path.display()))?;
    Ok(Self::new(parse_phrase_lines(&content)))
  }
}

pub fn parse_phrase_lines(content: &str) -> Vec<String> {
  content.lines().map(str::trim).filter(|l| !l.is_empty() && !l.starts_with('#')).map(str::to_string).collect()
}

impl TrendSource for StaticTrends {
  async fn trending_phrases(&self, _region: &str) -> Result<Vec<String>, RetrievalError> {
    Ok(self.phrases.clone())
  }
}

/// The source a session was configured with.
#[derive(Debug, Clone)]
pub enum Trends {
  Feed(GoogleTrends),
  Static(StaticTrends),
}

impl TrendSource for Trends {
  async fn trending_phrases(&self, region: &str) -> Result<Vec<String>, RetrievalError> {
    match self {
      Trends::Feed(feed) => feed.trending_phrases(region).await,
      Trends::Static(list) => list.trending_phrases(region).await,
    }
  }
}
