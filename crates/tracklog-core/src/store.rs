//! The `RecordStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g.
//! `tracklog-store-sqlite`). The ingestion pipeline and the HTTP API depend on
//! this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  Error, Result,
  aircraft::{AircraftMetadata, AircraftStats, LatestPosition, PositionRecord, TypeCount},
  dataset::Dataset,
};

// ─── Pagination ──────────────────────────────────────────────────────────────

/// A `LIMIT`/`OFFSET` window over an ordered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
  pub limit:  u64,
  pub offset: u64,
}

impl Page {
  /// Window for the zero-indexed `page` of `size` results.
  pub fn new(page: u64, size: u64) -> Result<Self> {
    let offset = page
      .checked_mul(size)
      .ok_or(Error::PageOutOfRange { page, size })?;
    Ok(Self { limit: size, offset })
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a tracklog record store backend.
///
/// A store holds the output of exactly one ingestion run. Reads on a store
/// that has never been written return empty results, never errors.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait RecordStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Replace the previous run's data with `dataset`.
  ///
  /// Readers observe either the complete previous run or the complete new
  /// one. On error nothing of `dataset` becomes visible.
  fn replace_all(
    &self,
    dataset: Dataset,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Aircraft metadata ordered by `icao` ascending.
  fn list_metadata(
    &self,
    page: Page,
  ) -> impl Future<Output = Result<Vec<AircraftMetadata>, Self::Error>> + Send + '_;

  /// Positions of one aircraft ordered by timestamp ascending, ties broken by
  /// arrival order. Unknown aircraft yield an empty list.
  fn list_positions<'a>(
    &'a self,
    icao: &'a str,
    page: Page,
  ) -> impl Future<Output = Result<Vec<PositionRecord>, Self::Error>> + Send + 'a;

  /// Maxima over non-null altitude and speed, plus whether any position
  /// carried an emergency indicator.
  fn aggregate_stats<'a>(
    &'a self,
    icao: &'a str,
  ) -> impl Future<Output = Result<AircraftStats, Self::Error>> + Send + 'a;

  /// The newest position of one aircraft. Returns `None` if it has none.
  fn latest_position<'a>(
    &'a self,
    icao: &'a str,
  ) -> impl Future<Output = Result<Option<LatestPosition>, Self::Error>> + Send + 'a;

  /// Position counts grouped by aircraft type, largest first.
  fn type_counts(
    &self,
  ) -> impl Future<Output = Result<Vec<TypeCount>, Self::Error>> + Send + '_;
}
