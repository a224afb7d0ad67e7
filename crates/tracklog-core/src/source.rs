//! Where raw snapshot files come from and where they are kept.
//!
//! Snapshots are published one file per hour of a day, named
//! `{HH}0000Z.json.gz`. A [`SnapshotSource`] fetches them by name; a
//! [`BlobStore`] keeps the raw bytes between download and prepare.

use std::future::Future;

/// Extension of every published snapshot file.
pub const SNAPSHOT_EXTENSION: &str = ".json.gz";

/// Number of snapshot files published per day.
pub const SNAPSHOTS_PER_DAY: u8 = 24;

/// Name of the snapshot captured at the top of `hour` (UTC).
pub fn snapshot_file_name(hour: u8) -> String {
  format!("{hour:02}0000Z{SNAPSHOT_EXTENSION}")
}

/// All snapshot names of one day in ascending hour order.
pub fn daily_snapshot_names() -> impl Iterator<Item = String> {
  (0..SNAPSHOTS_PER_DAY).map(snapshot_file_name)
}

/// Whether a blob key looks like a snapshot file (compressed or not).
pub fn is_snapshot_key(key: &str) -> bool {
  key.ends_with(SNAPSHOT_EXTENSION) || key.ends_with(".json")
}

// ─── Traits ──────────────────────────────────────────────────────────────────

/// A remote publisher of snapshot files.
pub trait SnapshotSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fetch the raw bytes of the snapshot called `name`.
  ///
  /// Any failure, including a non-success response, is an error; the caller
  /// decides whether it is fatal.
  fn fetch<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Vec<u8>, Self::Error>> + Send + 'a;
}

/// Flat key/value storage for raw files.
///
/// Keys are `/`-separated paths such as `raw/day=20231101/000000Z.json.gz`.
pub trait BlobStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Store `bytes` under `key`, replacing any previous value.
  fn put<'a>(
    &'a self,
    key: &'a str,
    bytes: Vec<u8>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  fn get<'a>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<Vec<u8>, Self::Error>> + Send + 'a;

  /// Remove `key`. Removing a missing key is not an error.
  fn delete<'a>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// All keys starting with `prefix`, sorted ascending.
  fn list<'a>(
    &'a self,
    prefix: &'a str,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + 'a;
}
