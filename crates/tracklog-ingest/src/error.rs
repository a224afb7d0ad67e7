//! Error types for the ingestion pipeline.

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A failure that aborts a whole run.
#[derive(Debug, Error)]
pub enum Error {
  #[error("blob store unavailable: {0}")]
  Blob(#[source] BoxError),

  #[error("record store unavailable: {0}")]
  StoreUnavailable(#[source] BoxError),
}

impl Error {
  pub(crate) fn blob(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Blob(Box::new(e))
  }

  pub(crate) fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::StoreUnavailable(Box::new(e))
  }
}

/// A failure confined to one snapshot file. Logged, never propagated.
#[derive(Debug, Error)]
pub enum FileError {
  #[error("fetch failed: {0}")]
  Fetch(#[source] BoxError),

  #[error("parse failed: {0}")]
  Parse(#[from] tracklog_snapshot::Error),

  #[error("parser task failed: {0}")]
  Join(#[from] tokio::task::JoinError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
