//! Snapshot codec for tracklog.
//!
//! Turns the raw bytes of one aircraft snapshot file (gzip-compressed or plain
//! JSON) into normalised [`Observation`]s. Pure synchronous; no HTTP or
//! database dependencies.
//!
//! # Quick start
//!
//! ```no_run
//! use tracklog_snapshot::parse;
//!
//! let bytes = std::fs::read("000000Z.json.gz").unwrap();
//! let snapshot = parse(&bytes).unwrap();
//! let observations: Vec<_> = snapshot.into_observations().collect();
//! println!("{} observations", observations.len());
//! ```

pub mod error;
mod normalize;
mod parse;

pub use error::{Error, Result};
pub use normalize::{GROUND_SENTINEL, normalize};
use serde::Deserialize;
use serde_json::Value;
use tracklog_core::dataset::Observation;

// ─── Public types
// ─────────────────────────────────────────────────────────────

/// One decoded snapshot file. Transient: consumed by normalisation and then
/// dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
  /// Capture time of the file (`now`), in epoch seconds.
  pub base_time: Option<f64>,
  pub entries:   Vec<RawEntry>,
}

impl Snapshot {
  /// Normalise every entry against this snapshot's base time, skipping
  /// entries without an identifier.
  pub fn into_observations(self) -> impl Iterator<Item = Observation> {
    let base_time = self.base_time;
    self
      .entries
      .into_iter()
      .filter_map(move |entry| normalize(entry, base_time))
  }
}

/// One per-aircraft entry exactly as found in the file.
///
/// Fields are kept as untyped JSON so that a malformed value degrades during
/// normalisation instead of failing the whole file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawEntry {
  pub hex:           Option<Value>,
  #[serde(rename = "r")]
  pub registration:  Option<Value>,
  #[serde(rename = "t")]
  pub aircraft_type: Option<Value>,
  pub lat:           Option<Value>,
  pub lon:           Option<Value>,
  pub alt_baro:      Option<Value>,
  pub gs:            Option<Value>,
  /// Seconds between the last position update and the snapshot's `now`.
  pub seen_pos:      Option<Value>,
  pub emergency:     Option<Value>,
}

// ─── Public API
// ───────────────────────────────────────────────────────────────

/// Decode one snapshot file.
///
/// Gzip is tried first; bytes that are not a gzip stream are read as plain
/// JSON. Fails when the bytes decode to neither, or when the document has no
/// `aircraft` list.
pub fn parse(bytes: &[u8]) -> Result<Snapshot> { parse::parse_snapshot(bytes) }
