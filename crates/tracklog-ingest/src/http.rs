//! [`SnapshotSource`] over plain HTTP(S).

use std::time::Duration;

use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracklog_core::source::SnapshotSource;

use crate::IngestConfig;

#[derive(Debug, Error)]
pub enum FetchError {
  #[error("GET {url} failed: {source}")]
  Request {
    url:    String,
    #[source]
    source: reqwest::Error,
  },

  #[error("GET {url} → {status}")]
  Status { url: String, status: StatusCode },
}

/// Fetches snapshot files relative to one directory URL.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Debug, Clone)]
pub struct HttpSource {
  client:   Client,
  base_url: String,
}

impl HttpSource {
  /// `base_url` is joined with the snapshot name, so it normally ends in `/`.
  pub fn new(base_url: impl Into<String>) -> reqwest::Result<Self> {
    let client = Client::builder().timeout(Duration::from_secs(60)).build()?;
    Ok(Self { client, base_url: base_url.into() })
  }

  /// A source for the day named by `config`.
  pub fn for_day(config: &IngestConfig) -> reqwest::Result<Self> {
    Self::new(config.day_url())
  }

  fn url(&self, name: &str) -> String { format!("{}{}", self.base_url, name) }
}

impl SnapshotSource for HttpSource {
  type Error = FetchError;

  async fn fetch(&self, name: &str) -> Result<Vec<u8>, FetchError> {
    let url = self.url(name);

    let resp = self
      .client
      .get(&url)
      .send()
      .await
      .map_err(|source| FetchError::Request { url: url.clone(), source })?;

    if !resp.status().is_success() {
      return Err(FetchError::Status { url, status: resp.status() });
    }

    let body = resp
      .bytes()
      .await
      .map_err(|source| FetchError::Request { url: url.clone(), source })?;
    Ok(body.to_vec())
  }
}
