//! Encoding and decoding helpers between tracklog domain types and SQLite
//! rows.
//!
//! Timestamps of runs are stored as RFC 3339 strings. Position timestamps are
//! plain epoch seconds in a `REAL` column.

use chrono::{DateTime, Utc};
use rusqlite::Row;
use tracklog_core::{
  aircraft::{AircraftMetadata, LatestPosition, PositionRecord, TypeCount},
  store::Page,
};

use crate::{Error, Result, store::Generation};

// ─── DateTime<Utc>
// ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Counts and windows ──────────────────────────────────────────────────────

/// SQLite integers are signed; clamp rather than wrap.
pub fn encode_count(n: u64) -> i64 { i64::try_from(n).unwrap_or(i64::MAX) }

pub fn decode_count(column: &'static str, value: i64) -> Result<u64> {
  u64::try_from(value).map_err(|_| Error::InvalidCount { column, value })
}

/// `(LIMIT, OFFSET)` parameters for `page`.
pub fn encode_page(page: Page) -> (i64, i64) {
  (encode_count(page.limit), encode_count(page.offset))
}

// ─── Row mappers ─────────────────────────────────────────────────────────────

/// Columns: `icao, registration, type`.
pub fn metadata_from_row(row: &Row<'_>) -> rusqlite::Result<AircraftMetadata> {
  Ok(AircraftMetadata {
    icao:          row.get(0)?,
    registration:  row.get(1)?,
    aircraft_type: row.get(2)?,
  })
}

/// Columns: `icao, timestamp, lat, lon, alt_baro, gs, emergency`.
pub fn position_from_row(row: &Row<'_>) -> rusqlite::Result<PositionRecord> {
  Ok(PositionRecord {
    icao:      row.get(0)?,
    timestamp: row.get(1)?,
    lat:       row.get(2)?,
    lon:       row.get(3)?,
    alt_baro:  row.get(4)?,
    gs:        row.get(5)?,
    emergency: row.get(6)?,
  })
}

/// Columns: `icao, registration, type, timestamp, lat, lon, alt_baro, gs`.
pub fn latest_from_row(row: &Row<'_>) -> rusqlite::Result<LatestPosition> {
  Ok(LatestPosition {
    icao:          row.get(0)?,
    registration:  row.get(1)?,
    aircraft_type: row.get(2)?,
    timestamp:     row.get(3)?,
    lat:           row.get(4)?,
    lon:           row.get(5)?,
    alt_baro:      row.get(6)?,
    ground_speed:  row.get(7)?,
  })
}

// ─── Raw row types ───────────────────────────────────────────────────────────

/// Raw values read directly from a `type_counts` aggregate row.
pub struct RawTypeCount {
  pub aircraft_type: Option<String>,
  pub count:         i64,
}

impl RawTypeCount {
  pub fn into_type_count(self) -> Result<TypeCount> {
    Ok(TypeCount {
      aircraft_type: self.aircraft_type,
      count:         decode_count("count", self.count)?,
    })
  }
}

/// Raw values read directly from a `generations` row.
pub struct RawGeneration {
  pub generation:     i64,
  pub created_at:     String,
  pub aircraft_count: i64,
  pub position_count: i64,
}

impl RawGeneration {
  pub fn into_generation(self) -> Result<Generation> {
    Ok(Generation {
      id:             self.generation,
      created_at:     decode_dt(&self.created_at)?,
      aircraft_count: decode_count("aircraft_count", self.aircraft_count)?,
      position_count: decode_count("position_count", self.position_count)?,
    })
  }
}
