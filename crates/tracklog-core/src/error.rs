//! Error types for `tracklog-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("aircraft not found: {0}")]
  AircraftNotFound(String),

  #[error("page {page} of size {size} is out of range")]
  PageOutOfRange { page: u64, size: u64 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
