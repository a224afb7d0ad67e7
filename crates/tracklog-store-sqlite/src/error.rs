//! Error type for `tracklog-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A count column held a value that does not fit the domain type.
  #[error("invalid count in column {column}: {value}")]
  InvalidCount { column: &'static str, value: i64 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
