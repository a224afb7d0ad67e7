//! Field normalisation: one raw entry plus its snapshot's base time becomes an
//! [`Observation`], or nothing.
//!
//! Nothing here fails. A field that cannot be interpreted becomes `None`.

use serde_json::Value;
use tracklog_core::{
  aircraft::{AircraftMetadata, PositionRecord},
  dataset::Observation,
};

use crate::RawEntry;

/// Altitude reported by aircraft on the ground instead of a number of feet.
pub const GROUND_SENTINEL: &str = "ground";

/// Normalise `entry` captured in a snapshot taken at `base_time`.
///
/// Returns `None` when the entry has no usable identifier. Otherwise the
/// observation always carries metadata, and carries a position only when both
/// latitude and longitude are numeric.
pub fn normalize(entry: RawEntry, base_time: Option<f64>) -> Option<Observation> {
  let icao = identifier(entry.hex.as_ref())?;

  let position = match (number(entry.lat.as_ref()), number(entry.lon.as_ref())) {
    (Some(lat), Some(lon)) => Some(PositionRecord {
      icao: icao.clone(),
      timestamp: timestamp(base_time, number(entry.seen_pos.as_ref())),
      lat,
      lon,
      alt_baro: altitude(entry.alt_baro.as_ref()),
      gs: number(entry.gs.as_ref()),
      emergency: emergency(entry.emergency),
    }),
    _ => None,
  };

  Some(Observation {
    metadata: AircraftMetadata {
      icao,
      registration: text(entry.registration),
      aircraft_type: text(entry.aircraft_type),
    },
    position,
  })
}

// ─── Field helpers ───────────────────────────────────────────────────────────

fn identifier(value: Option<&Value>) -> Option<String> {
  let hex = value?.as_str()?.trim();
  (!hex.is_empty()).then(|| hex.to_ascii_lowercase())
}

fn text(value: Option<Value>) -> Option<String> {
  match value? {
    Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_owned()),
    _ => None,
  }
}

/// Numbers only; numeric-looking strings are not parsed.
fn number(value: Option<&Value>) -> Option<f64> { value?.as_f64() }

/// `base_time - seen_pos` when both are known, else `base_time` as is.
fn timestamp(base_time: Option<f64>, seen_pos: Option<f64>) -> Option<f64> {
  match (base_time, seen_pos) {
    (Some(base), Some(offset)) => Some(base - offset),
    _ => base_time,
  }
}

fn altitude(value: Option<&Value>) -> Option<f64> {
  match value? {
    Value::Number(n) => n.as_f64(),
    Value::String(s) if s == GROUND_SENTINEL => Some(0.0),
    _ => None,
  }
}

/// Keeps the indicator's textual form. Empty strings count as absent.
fn emergency(value: Option<Value>) -> Option<String> {
  match value? {
    Value::Null => None,
    Value::String(s) if s.trim().is_empty() => None,
    Value::String(s) => Some(s),
    other => Some(other.to_string()),
  }
}
