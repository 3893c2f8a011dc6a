//! Application constants loaded from `constants.ron` at compile time.
//!
//! The RON file is embedded via `include_str!` so it's always available,
//! no runtime file I/O. Parsed once on first access via `LazyLock`.

use serde::Deserialize;
use std::sync::LazyLock;

/// All tuneable application constants.
#[derive(Debug, Deserialize)]
pub struct Constants {
  // Endpoints
  pub api_base: String,
  pub trends_feed_url: String,

  // Locale
  pub default_region: String,
  pub default_language: String,

  // Platform request limits
  pub search_limit: u32,
  pub max_results_per_call: u32,
  pub max_ids_per_call: usize,

  // Trending chart collection
  pub chart_page_size: u32,
  pub chart_target: usize,
  pub chart_max_pages: usize,

  // Per-category aggregation
  pub category_sub_limit: u32,
  pub category_final_cap: usize,
  pub recency_days: i64,
  pub category_concurrency: usize,

  // Normalization
  pub short_form_max_secs: u64,
  pub fallback_category: String,
  pub excluded_categories: Vec<String>,

  // Session
  pub cache_ttl_secs: u64,
  pub http_timeout_secs: u64,
}

static CONSTANTS: LazyLock<Constants> = LazyLock::new(|| {
  // Safety: the RON file is embedded at compile time; if it's malformed this is caught by the test below.
  ron::from_str(include_str!("../constants.ron")).expect("constants.ron must be valid RON (embedded at compile time)")
});

/// Returns a reference to the parsed application constants.
pub fn constants() -> &'static Constants {
  &CONSTANTS
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn embedded_constants_parse() {
    let c = constants();
    assert_eq!(c.chart_page_size, 50);
    assert!(c.chart_target > 0);
    assert!(c.max_ids_per_call <= 50);
    assert_eq!(c.short_form_max_secs, 60);
  }
}
