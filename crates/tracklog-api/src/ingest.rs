//! Handlers that trigger ingestion runs.
//!
//! Both respond with `"OK"` on success. Per-file problems only show up in the
//! logs; a run-level failure is a 500.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State, rejection::QueryRejection},
};
use serde::Deserialize;
use tracklog_core::{
  source::{BlobStore, SnapshotSource},
  store::RecordStore,
};
use tracklog_ingest::Ingestor;

use crate::error::ApiError;

const DEFAULT_FILE_LIMIT: usize = 100;

#[derive(Debug, Default, Deserialize)]
pub struct DownloadParams {
  pub file_limit: Option<usize>,
}

/// `POST /aircraft/download[?file_limit=<n>]`
pub async fn download<S, B, F>(
  State(ingestor): State<Arc<Ingestor<S, B, F>>>,
  params: Result<Query<DownloadParams>, QueryRejection>,
) -> Result<Json<&'static str>, ApiError>
where
  S: RecordStore + 'static,
  B: BlobStore + 'static,
  F: SnapshotSource + 'static,
{
  let Query(params) = params?;
  ingestor
    .download(params.file_limit.unwrap_or(DEFAULT_FILE_LIMIT))
    .await?;
  Ok(Json("OK"))
}

/// `POST /aircraft/prepare`
pub async fn prepare<S, B, F>(
  State(ingestor): State<Arc<Ingestor<S, B, F>>>,
) -> Result<Json<&'static str>, ApiError>
where
  S: RecordStore + 'static,
  B: BlobStore + 'static,
  F: SnapshotSource + 'static,
{
  ingestor.prepare().await?;
  Ok(Json("OK"))
}
