//! Handlers for the `/aircraft` query endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/aircraft/` | `?num_results` (default 100), `?page` (default 0) |
//! | `GET`  | `/aircraft/types` | Position counts per aircraft type |
//! | `GET`  | `/aircraft/{icao}/positions` | `?num_results` (default 1000), `?page` |
//! | `GET`  | `/aircraft/{icao}/stats` | Default shape for unknown aircraft |
//! | `GET`  | `/aircraft/{icao}/latest` | 404 if the aircraft has no positions |
//!
//! `per_page` is accepted as an alias of `num_results`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State, rejection::QueryRejection},
};
use serde::{Deserialize, Serialize};
use tracklog_core::{
  aircraft::{AircraftMetadata, AircraftStats, LatestPosition, PositionRecord, TypeCount},
  source::{BlobStore, SnapshotSource},
  store::{Page, RecordStore},
};
use tracklog_ingest::Ingestor;

use crate::error::ApiError;

const DEFAULT_AIRCRAFT_PAGE: u64 = 100;
const DEFAULT_POSITIONS_PAGE: u64 = 1000;

// ─── Parameters ──────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
  #[serde(alias = "per_page")]
  pub num_results: Option<u64>,
  /// Zero-indexed.
  pub page:        Option<u64>,
}

impl PageParams {
  fn page(&self, default_size: u64) -> Result<Page, ApiError> {
    let size = self.num_results.unwrap_or(default_size);
    Ok(Page::new(self.page.unwrap_or(0), size)?)
  }
}

/// Identifiers are stored lowercase; accept any case in the path.
fn icao_key(icao: &str) -> String { icao.trim().to_ascii_lowercase() }

// ─── Response shapes ─────────────────────────────────────────────────────────

/// A position as listed by `/aircraft/{icao}/positions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionView {
  pub timestamp: Option<f64>,
  pub lat:       f64,
  pub lon:       f64,
  pub alt_baro:  Option<f64>,
  pub gs:        Option<f64>,
  pub emergency: bool,
}

impl From<PositionRecord> for PositionView {
  fn from(p: PositionRecord) -> Self {
    Self {
      emergency: p.had_emergency(),
      timestamp: p.timestamp,
      lat:       p.lat,
      lon:       p.lon,
      alt_baro:  p.alt_baro,
      gs:        p.gs,
    }
  }
}

// ─── List ────────────────────────────────────────────────────────────────────

/// `GET /aircraft/[?num_results=<n>][&page=<p>]`
pub async fn list<S, B, F>(
  State(ingestor): State<Arc<Ingestor<S, B, F>>>,
  params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<Vec<AircraftMetadata>>, ApiError>
where
  S: RecordStore + 'static,
  B: BlobStore + 'static,
  F: SnapshotSource + 'static,
{
  let Query(params) = params?;
  let page = params.page(DEFAULT_AIRCRAFT_PAGE)?;

  let aircraft = ingestor
    .store()
    .list_metadata(page)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(aircraft))
}

// ─── Positions ───────────────────────────────────────────────────────────────

/// `GET /aircraft/{icao}/positions[?num_results=<n>][&page=<p>]`
pub async fn positions<S, B, F>(
  State(ingestor): State<Arc<Ingestor<S, B, F>>>,
  Path(icao): Path<String>,
  params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<Vec<PositionView>>, ApiError>
where
  S: RecordStore + 'static,
  B: BlobStore + 'static,
  F: SnapshotSource + 'static,
{
  let Query(params) = params?;
  let page = params.page(DEFAULT_POSITIONS_PAGE)?;

  let positions = ingestor
    .store()
    .list_positions(&icao_key(&icao), page)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(positions.into_iter().map(PositionView::from).collect()))
}

// ─── Stats ───────────────────────────────────────────────────────────────────

/// `GET /aircraft/{icao}/stats`
pub async fn stats<S, B, F>(
  State(ingestor): State<Arc<Ingestor<S, B, F>>>,
  Path(icao): Path<String>,
) -> Result<Json<AircraftStats>, ApiError>
where
  S: RecordStore + 'static,
  B: BlobStore + 'static,
  F: SnapshotSource + 'static,
{
  let stats = ingestor
    .store()
    .aggregate_stats(&icao_key(&icao))
    .await
    .map_err(ApiError::store)?;
  Ok(Json(stats))
}

// ─── Latest ──────────────────────────────────────────────────────────────────

/// `GET /aircraft/{icao}/latest`
pub async fn latest<S, B, F>(
  State(ingestor): State<Arc<Ingestor<S, B, F>>>,
  Path(icao): Path<String>,
) -> Result<Json<LatestPosition>, ApiError>
where
  S: RecordStore + 'static,
  B: BlobStore + 'static,
  F: SnapshotSource + 'static,
{
  let icao = icao_key(&icao);
  let latest = ingestor
    .store()
    .latest_position(&icao)
    .await
    .map_err(ApiError::store)?
    .ok_or(tracklog_core::Error::AircraftNotFound(icao))?;
  Ok(Json(latest))
}

// ─── Types ───────────────────────────────────────────────────────────────────

/// `GET /aircraft/types`
pub async fn types<S, B, F>(
  State(ingestor): State<Arc<Ingestor<S, B, F>>>,
) -> Result<Json<Vec<TypeCount>>, ApiError>
where
  S: RecordStore + 'static,
  B: BlobStore + 'static,
  F: SnapshotSource + 'static,
{
  let counts = ingestor
    .store()
    .type_counts()
    .await
    .map_err(ApiError::store)?;
  Ok(Json(counts))
}
