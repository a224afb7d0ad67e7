//! Snapshot file decoder.
//!
//! Pipeline:
//!   raw bytes
//!     └─ decode()        → JSON document (gunzipped if needed)
//!          └─ from_document() → Snapshot { base_time, entries }

use std::io::Read as _;

use flate2::read::GzDecoder;
use serde_json::Value;

use crate::{
  RawEntry, Snapshot,
  error::{Error, Result},
};

/// The two leading bytes of every gzip member (RFC 1952 §2.3.1).
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

pub(crate) fn parse_snapshot(bytes: &[u8]) -> Result<Snapshot> {
  from_document(decode(bytes)?)
}

/// Without the gzip magic the bytes cannot be a gzip stream, so they are read
/// as plain JSON. With it, a decompression failure is a corrupt file.
fn decode(bytes: &[u8]) -> Result<Value> {
  if !bytes.starts_with(&GZIP_MAGIC) {
    return Ok(serde_json::from_slice(bytes)?);
  }

  let mut text = Vec::with_capacity(bytes.len() * 8);
  GzDecoder::new(bytes)
    .read_to_end(&mut text)
    .map_err(Error::Decompress)?;
  Ok(serde_json::from_slice(&text)?)
}

fn from_document(document: Value) -> Result<Snapshot> {
  let Value::Object(mut root) = document else {
    return Err(Error::MissingAircraft);
  };

  let entries = match root.remove("aircraft") {
    None | Some(Value::Null) => return Err(Error::MissingAircraft),
    Some(Value::Array(entries)) => entries,
    Some(other) => return Err(Error::AircraftNotAList(json_kind(&other))),
  };

  let base_time = root.get("now").and_then(Value::as_f64);

  Ok(Snapshot {
    base_time,
    entries: entries.into_iter().map(raw_entry).collect(),
  })
}

/// A non-object entry becomes an empty one, which normalises to nothing.
fn raw_entry(value: Value) -> RawEntry {
  serde_json::from_value(value).unwrap_or_default()
}

fn json_kind(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "boolean",
    Value::Number(_) => "number",
    Value::String(_) => "string",
    Value::Array(_) => "array",
    Value::Object(_) => "object",
  }
}
