use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::dataset::Dataset;
use crate::strategy::Request;

#[derive(Debug, Clone)]
pub struct CacheEntry {
  pub dataset: Dataset,
  pub fetched_at: Instant,
}

/// Session-owned memo of strategy results, keyed by request. Entries go stale after `ttl`.
#[derive(Debug)]
pub struct ResultCache {
  ttl: Duration,
  entries: HashMap<Request, CacheEntry>,
}

impl ResultCache {
  pub fn new(ttl: Duration) -> Self {
    Self { ttl, entries: HashMap::new() }
  }

  /// A fresh entry for `request`, if any. Stale entries are dropped on lookup.
  pub fn get(&mut self, request: &Request, now: Instant) -> Option<&CacheEntry> {
    let fresh = self.entries.get(request).is_some_and(|e| now.saturating_duration_since(e.fetched_at) < self.ttl);
    if !fresh {
      if self.entries.remove(request).is_some() {
        debug!(strategy = request.name(), "cache: expired");
      }
      return None;
    }
    debug!(strategy = request.name(), "cache: hit");
    self.entries.get(request)
  }

  /// Store a result, sweeping every entry that has already gone stale.
  pub fn insert(&mut self, request: Request, dataset: Dataset, now: Instant) {
    let ttl = self.ttl;
    let before = self.entries.len();
    self.entries.retain(|_, e| now.saturating_duration_since(e.fetched_at) < ttl);
    let swept = before - self.entries.len();
    if swept > 0 {
      debug!(swept, "cache: swept expired entries");
    }
    self.entries.insert(request, CacheEntry { dataset, fetched_at: now });
  }

  /// Manual refresh: forget one request's result.
  pub fn invalidate(&mut self, request: &Request) {
    self.entries.remove(request);
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }
}
