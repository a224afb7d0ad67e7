//! [`Ingestor`] — the download and prepare batch operations.

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use tracklog_core::{
  dataset::Dataset,
  source::{BlobStore, SnapshotSource, daily_snapshot_names, is_snapshot_key},
  store::RecordStore,
};
use tracklog_snapshot::Snapshot;

use crate::{Error, FileError, IngestConfig, Result};

// ─── Reports ─────────────────────────────────────────────────────────────────

/// Outcome of [`Ingestor::download`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadReport {
  pub downloaded: usize,
  /// Files the source could not deliver.
  pub skipped:    usize,
  /// Stale blobs from an earlier download that were removed.
  pub removed:    usize,
}

/// Outcome of [`Ingestor::prepare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrepareReport {
  pub files:     usize,
  /// Files that contributed to the dataset.
  pub parsed:    usize,
  pub aircraft:  usize,
  pub positions: usize,
}

// ─── Ingestor ────────────────────────────────────────────────────────────────

/// Runs ingestion for one configured day against a record store, a blob store
/// and a snapshot source.
pub struct Ingestor<S, B, F> {
  store:  Arc<S>,
  blobs:  Arc<B>,
  source: F,
  config: IngestConfig,
}

impl<S, B, F> Ingestor<S, B, F>
where
  S: RecordStore,
  B: BlobStore + 'static,
  F: SnapshotSource,
{
  pub fn new(store: Arc<S>, blobs: Arc<B>, source: F, config: IngestConfig) -> Self {
    Self { store, blobs, source, config }
  }

  pub fn store(&self) -> &Arc<S> { &self.store }

  pub fn blobs(&self) -> &Arc<B> { &self.blobs }

  pub fn config(&self) -> &IngestConfig { &self.config }

  /// Fetch up to `file_limit` of the day's snapshots, in hour order, into the
  /// blob store.
  ///
  /// Files the source cannot deliver are skipped and do not count towards the
  /// limit. Afterwards the day's prefix holds exactly the files written by
  /// this call.
  pub async fn download(&self, file_limit: usize) -> Result<DownloadReport> {
    let prefix = self.config.raw_prefix();
    let mut written: Vec<String> = Vec::new();
    let mut skipped = 0;

    for name in daily_snapshot_names() {
      if written.len() >= file_limit {
        break;
      }

      let bytes = match self.source.fetch(&name).await {
        Ok(bytes) => bytes,
        Err(e) => {
          warn!(file = %name, error = %e, "skipping snapshot");
          skipped += 1;
          continue;
        }
      };

      let key = format!("{prefix}{name}");
      debug!(%key, size = bytes.len(), "storing snapshot");
      self.blobs.put(&key, bytes).await.map_err(Error::blob)?;
      written.push(key);
    }

    let mut removed = 0;
    for key in self.blobs.list(&prefix).await.map_err(Error::blob)? {
      if !written.contains(&key) {
        self.blobs.delete(&key).await.map_err(Error::blob)?;
        removed += 1;
      }
    }

    let report = DownloadReport { downloaded: written.len(), skipped, removed };
    info!(
      downloaded = report.downloaded,
      skipped = report.skipped,
      removed = report.removed,
      "download finished"
    );
    Ok(report)
  }

  /// Parse every stored snapshot of the day and replace the record store's
  /// contents with the result.
  ///
  /// Files are loaded concurrently but reduced in key order, so the outcome
  /// does not depend on scheduling.
  pub async fn prepare(&self) -> Result<PrepareReport> {
    let prefix = self.config.raw_prefix();
    let keys: Vec<String> = self
      .blobs
      .list(&prefix)
      .await
      .map_err(Error::blob)?
      .into_iter()
      .filter(|key| is_snapshot_key(key))
      .collect();

    let mut tasks = JoinSet::new();
    for (index, key) in keys.iter().cloned().enumerate() {
      let blobs = Arc::clone(&self.blobs);
      tasks.spawn(async move { (index, load_snapshot(&*blobs, &key).await) });
    }

    let mut snapshots: Vec<Option<Snapshot>> = Vec::new();
    snapshots.resize_with(keys.len(), || None);
    while let Some(joined) = tasks.join_next().await {
      match joined {
        Ok((index, Ok(snapshot))) => snapshots[index] = Some(snapshot),
        Ok((index, Err(e))) => warn!(key = %keys[index], error = %e, "skipping snapshot"),
        Err(e) => warn!(error = %e, "snapshot task failed"),
      }
    }

    let parsed = snapshots.iter().filter(|s| s.is_some()).count();
    let dataset = Dataset::reduce(
      snapshots
        .into_iter()
        .flatten()
        .flat_map(Snapshot::into_observations),
    );

    let report = PrepareReport {
      files: keys.len(),
      parsed,
      aircraft: dataset.aircraft_count(),
      positions: dataset.position_count(),
    };

    self.store.replace_all(dataset).await.map_err(Error::store)?;

    info!(
      files = report.files,
      parsed = report.parsed,
      aircraft = report.aircraft,
      positions = report.positions,
      "prepare finished"
    );
    Ok(report)
  }
}

/// Fetch and decode one blob. Decoding runs on the blocking pool since
/// decompression and JSON parsing are CPU-bound.
async fn load_snapshot<B: BlobStore>(
  blobs: &B,
  key: &str,
) -> Result<Snapshot, FileError> {
  let bytes = blobs
    .get(key)
    .await
    .map_err(|e| FileError::Fetch(Box::new(e)))?;
  let snapshot = tokio::task::spawn_blocking(move || tracklog_snapshot::parse(&bytes)).await??;
  Ok(snapshot)
}
