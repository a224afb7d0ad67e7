//! Aircraft records — the two persisted record sets and their read models.
//!
//! Every field that the upstream feed may omit or garble is an `Option`.
//! Normalisation decides what becomes `None`; nothing downstream ever has to
//! recognise a sentinel value.

use serde::{Deserialize, Serialize};

// ─── Metadata ────────────────────────────────────────────────────────────────

/// Identity metadata for one aircraft, keyed by its ICAO hex address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AircraftMetadata {
  /// Lowercase hex identifier; never empty.
  pub icao:          String,
  /// Tail number, e.g. `"EC-MTI"`.
  pub registration:  Option<String>,
  /// Type designator, e.g. `"A320"`.
  #[serde(rename = "type")]
  pub aircraft_type: Option<String>,
}

// ─── Positions ───────────────────────────────────────────────────────────────

/// One observed position of an aircraft.
///
/// `icao` references an [`AircraftMetadata`] by key but the reference is not
/// enforced: a position may exist without any stored metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionRecord {
  pub icao:      String,
  /// Absolute time of the fix in epoch seconds, if it could be derived.
  pub timestamp: Option<f64>,
  pub lat:       f64,
  pub lon:       f64,
  /// Barometric altitude in feet; `Some(0.0)` when reported on the ground.
  pub alt_baro:  Option<f64>,
  /// Ground speed in knots.
  pub gs:        Option<f64>,
  /// Raw emergency indicator as reported. Only its presence is meaningful.
  pub emergency: Option<String>,
}

impl PositionRecord {
  pub fn had_emergency(&self) -> bool { self.emergency.is_some() }
}

// ─── Read models ─────────────────────────────────────────────────────────────

/// Aggregates over all stored positions of one aircraft.
///
/// The default value is the shape returned for an aircraft with no positions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AircraftStats {
  pub max_altitude_baro: Option<f64>,
  pub max_ground_speed:  Option<f64>,
  pub had_emergency:     bool,
}

/// The newest position of an aircraft together with its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestPosition {
  pub icao:          String,
  pub registration:  Option<String>,
  #[serde(rename = "type")]
  pub aircraft_type: Option<String>,
  pub timestamp:     Option<f64>,
  pub lat:           f64,
  pub lon:           f64,
  pub alt_baro:      Option<f64>,
  pub ground_speed:  Option<f64>,
}

/// Number of stored positions for one aircraft type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCount {
  /// `None` groups positions whose aircraft has no known type.
  #[serde(rename = "type")]
  pub aircraft_type: Option<String>,
  pub count:         u64,
}
