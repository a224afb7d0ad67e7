//! Where a run reads from and writes to.

use chrono::NaiveDate;
use serde::Deserialize;

/// Ingestion settings, passed explicitly to every component that needs them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IngestConfig {
  /// Root of the snapshot archive, e.g.
  /// `https://samples.adsbexchange.com/readsb-hist`.
  pub source_url: String,
  /// The single day a run covers.
  pub day:        NaiveDate,
}

impl IngestConfig {
  /// Blob key prefix of the day's raw files, e.g. `raw/day=20231101/`.
  pub fn raw_prefix(&self) -> String {
    format!("raw/day={}/", self.day.format("%Y%m%d"))
  }

  /// URL of the day's directory in the archive, with a trailing slash.
  pub fn day_url(&self) -> String {
    format!(
      "{}/{}/",
      self.source_url.trim_end_matches('/'),
      self.day.format("%Y/%m/%d")
    )
  }
}
