use thiserror::Error;

/// A duration code that does not follow the `P[nD][T[nH][nM][nS]]` shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed duration code {0:?}")]
pub struct ParseError(pub String);

/// Why a single raw item could not be normalized. Always absorbed by the dataset builder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemError {
  #[error("item {0} has no snippet")]
  MissingSnippet(String),

  #[error("item {0} has no content details")]
  MissingContentDetails(String),

  #[error("item {id:?} has no {field}")]
  MissingField { id: String, field: &'static str },

  #[error("item {id} has malformed publish timestamp {value:?}")]
  BadTimestamp { id: String, value: String },

  #[error("item {id} has malformed {field} {value:?}")]
  BadCount { id: String, field: &'static str, value: String },

  #[error("item {id}: {source}")]
  Duration {
    id: String,
    #[source]
    source: ParseError,
  },
}

/// Failure talking to the video platform or the trends feed.
#[derive(Debug, Error)]
pub enum RetrievalError {
  #[error("API key not configured. Set YOUTUBE_API_KEY or api_key in prefs.toml")]
  MissingKey,

  #[error("network error: {0}")]
  Network(String),

  #[error("API error {code}: {message}")]
  Api { code: u16, message: String },

  #[error("failed to decode response: {0}")]
  Decode(String),
}

impl From<reqwest::Error> for RetrievalError {
  fn from(e: reqwest::Error) -> Self {
    if e.is_decode() { RetrievalError::Decode(e.to_string()) } else { RetrievalError::Network(e.to_string()) }
  }
}
