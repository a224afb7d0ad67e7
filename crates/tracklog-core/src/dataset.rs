//! Reduction of normalised observations into the record sets of one run.
//!
//! Metadata is last-write-wins per `icao`; positions pass through untouched.
//! The outcome depends only on the order observations are pushed, so callers
//! must push them in a reproducible order (e.g. sorted by source file name).

use std::collections::BTreeMap;

use crate::aircraft::{AircraftMetadata, PositionRecord};

/// What one snapshot entry contributes once normalised.
///
/// An entry without a usable identifier contributes nothing at all and is
/// never turned into an `Observation`.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
  pub metadata: AircraftMetadata,
  /// Present only when the entry carried both latitude and longitude.
  pub position: Option<PositionRecord>,
}

/// The complete output of one ingestion run, ready for
/// [`RecordStore::replace_all`](crate::store::RecordStore::replace_all).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
  aircraft:  BTreeMap<String, AircraftMetadata>,
  positions: Vec<PositionRecord>,
}

impl Dataset {
  pub fn new() -> Self { Self::default() }

  /// Fold a stream of observations in order.
  pub fn reduce<I>(observations: I) -> Self
  where
    I: IntoIterator<Item = Observation>,
  {
    let mut dataset = Self::new();
    dataset.extend(observations);
    dataset
  }

  /// Merge one observation. A later metadata record for the same `icao`
  /// replaces the earlier one entirely.
  pub fn push(&mut self, observation: Observation) {
    let Observation { metadata, position } = observation;
    self.aircraft.insert(metadata.icao.clone(), metadata);
    if let Some(position) = position {
      self.positions.push(position);
    }
  }

  /// Deduplicated metadata, ordered by `icao`.
  pub fn aircraft(&self) -> impl ExactSizeIterator<Item = &AircraftMetadata> {
    self.aircraft.values()
  }

  /// Positions in arrival order.
  pub fn positions(&self) -> &[PositionRecord] { &self.positions }

  pub fn aircraft_count(&self) -> usize { self.aircraft.len() }

  pub fn position_count(&self) -> usize { self.positions.len() }

  pub fn is_empty(&self) -> bool {
    self.aircraft.is_empty() && self.positions.is_empty()
  }

  /// Split into the two record sets.
  pub fn into_parts(self) -> (Vec<AircraftMetadata>, Vec<PositionRecord>) {
    (self.aircraft.into_values().collect(), self.positions)
  }
}

impl Extend<Observation> for Dataset {
  fn extend<T: IntoIterator<Item = Observation>>(&mut self, iter: T) {
    for observation in iter {
      self.push(observation);
    }
  }
}
