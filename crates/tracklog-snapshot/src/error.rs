//! Error types for the snapshot parser.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("corrupt gzip stream: {0}")]
  Decompress(#[source] std::io::Error),

  #[error("invalid JSON: {0}")]
  Json(#[from] serde_json::Error),

  #[error("snapshot has no `aircraft` list")]
  MissingAircraft,

  #[error("snapshot `aircraft` field is a {0}, not a list")]
  AircraftNotAList(&'static str),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
