//! Wiring for the `tracklog` binary: configuration, component construction
//! and the top-level HTTP application.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use axum::Router;
use chrono::NaiveDate;
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracklog_ingest::{IngestConfig, Ingestor, blob::FsBlobStore, http::HttpSource};
use tracklog_store_sqlite::SqliteStore;

/// The ingestor used in production: SQLite records, raw files on disk and the
/// HTTP snapshot archive.
pub type AppIngestor = Ingestor<SqliteStore, FsBlobStore, HttpSource>;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime configuration, deserialised from `tracklog.toml` and `TRACKLOG_*`
/// environment variables. Every field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  /// SQLite file holding the record store.
  pub store_path: PathBuf,
  /// Root directory of the raw snapshot blobs.
  pub raw_dir:    PathBuf,
  /// Root of the snapshot archive.
  pub source_url: String,
  /// The day downloaded and prepared.
  pub day:        NaiveDate,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       "127.0.0.1".into(),
      port:       8080,
      store_path: PathBuf::from("data/tracklog.sqlite"),
      raw_dir:    PathBuf::from("data"),
      source_url: "https://samples.adsbexchange.com/readsb-hist".into(),
      day:        NaiveDate::from_ymd_opt(2023, 11, 1).unwrap_or_default(),
    }
  }
}

impl ServerConfig {
  /// Layer the optional TOML file at `path` with `TRACKLOG_*` variables.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("TRACKLOG"))
      .build()?
      .try_deserialize()
  }

  pub fn ingest_config(&self) -> IngestConfig {
    IngestConfig { source_url: self.source_url.clone(), day: self.day }
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Construction ────────────────────────────────────────────────────────────

/// Open the record store, create the blob directory's handle and the HTTP
/// source described by `config`.
pub async fn build_ingestor(config: &ServerConfig) -> anyhow::Result<AppIngestor> {
  let store_path = expand_tilde(&config.store_path);
  if let Some(parent) = store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    tokio::fs::create_dir_all(parent)
      .await
      .with_context(|| format!("failed to create {parent:?}"))?;
  }

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let ingest = config.ingest_config();
  let source = HttpSource::for_day(&ingest).context("failed to build HTTP client")?;
  let blobs = FsBlobStore::new(expand_tilde(&config.raw_dir));

  Ok(Ingestor::new(Arc::new(store), Arc::new(blobs), source, ingest))
}

/// The full HTTP application: the API under `/api` with request tracing.
pub fn app(ingestor: Arc<AppIngestor>) -> Router {
  Router::new()
    .nest("/api", tracklog_api::api_router(ingestor))
    .layer(TraceLayer::new_for_http())
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
