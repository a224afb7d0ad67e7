//! [`BlobStore`] implementations: a local directory and an in-memory map.

use std::{
  collections::BTreeMap,
  io,
  path::{Path, PathBuf},
};

use thiserror::Error;
use tokio::sync::RwLock;
use tracklog_core::source::BlobStore;

/// Suffix of files being written; never listed.
const PARTIAL_SUFFIX: &str = ".partial";

// ─── Filesystem ──────────────────────────────────────────────────────────────

/// Blobs stored as files below a root directory, one file per key.
///
/// Writes go to a sibling `.partial` file that is renamed into place, so a
/// reader never sees a half-written blob. Listing does not descend into
/// subdirectories of the prefix's directory.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
  root: PathBuf,
}

impl FsBlobStore {
  pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

  pub fn root(&self) -> &Path { &self.root }

  fn path(&self, key: &str) -> PathBuf { self.root.join(key) }
}

impl BlobStore for FsBlobStore {
  type Error = io::Error;

  async fn put(&self, key: &str, bytes: Vec<u8>) -> io::Result<()> {
    let path = self.path(key);
    if let Some(parent) = path.parent() {
      tokio::fs::create_dir_all(parent).await?;
    }

    let mut partial = path.clone().into_os_string();
    partial.push(PARTIAL_SUFFIX);
    tokio::fs::write(&partial, bytes).await?;
    tokio::fs::rename(&partial, &path).await
  }

  async fn get(&self, key: &str) -> io::Result<Vec<u8>> {
    tokio::fs::read(self.path(key)).await
  }

  async fn delete(&self, key: &str) -> io::Result<()> {
    match tokio::fs::remove_file(self.path(key)).await {
      Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
      other => other,
    }
  }

  async fn list(&self, prefix: &str) -> io::Result<Vec<String>> {
    let (dir, name_prefix) = match prefix.rfind('/') {
      Some(i) => prefix.split_at(i + 1),
      None => ("", prefix),
    };

    let mut entries = match tokio::fs::read_dir(self.root.join(dir)).await {
      Ok(entries) => entries,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
      Err(e) => return Err(e),
    };

    let mut keys = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
      if !entry.file_type().await?.is_file() {
        continue;
      }
      let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
        continue;
      };
      if name.starts_with(name_prefix) && !name.ends_with(PARTIAL_SUFFIX) {
        keys.push(format!("{dir}{name}"));
      }
    }
    keys.sort();
    Ok(keys)
  }
}

// ─── In-memory ───────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
#[error("no blob stored at {0}")]
pub struct MissingBlob(pub String);

/// Blobs held in a sorted map; useful for testing.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
  blobs: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
  pub fn new() -> Self { Self::default() }
}

impl BlobStore for MemoryBlobStore {
  type Error = MissingBlob;

  async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), MissingBlob> {
    self.blobs.write().await.insert(key.to_owned(), bytes);
    Ok(())
  }

  async fn get(&self, key: &str) -> Result<Vec<u8>, MissingBlob> {
    self
      .blobs
      .read()
      .await
      .get(key)
      .cloned()
      .ok_or_else(|| MissingBlob(key.to_owned()))
  }

  async fn delete(&self, key: &str) -> Result<(), MissingBlob> {
    self.blobs.write().await.remove(key);
    Ok(())
  }

  async fn list(&self, prefix: &str) -> Result<Vec<String>, MissingBlob> {
    Ok(
      self
        .blobs
        .read()
        .await
        .range(prefix.to_owned()..)
        .map(|(key, _)| key)
        .take_while(|key| key.starts_with(prefix))
        .cloned()
        .collect(),
    )
  }
}
