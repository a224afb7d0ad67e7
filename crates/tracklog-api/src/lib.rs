//! JSON REST API for tracklog.
//!
//! Exposes an axum [`Router`] over an [`Ingestor`]: read endpoints query its
//! [`RecordStore`], ingestion endpoints run its batch operations. Transport and
//! tracing layers are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", tracklog_api::api_router(ingestor.clone()))
//! ```

pub mod aircraft;
pub mod error;
pub mod ingest;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use tracklog_core::{
  source::{BlobStore, SnapshotSource},
  store::RecordStore,
};
use tracklog_ingest::Ingestor;

pub use error::ApiError;

/// Build the API router for `ingestor`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, B, F>(ingestor: Arc<Ingestor<S, B, F>>) -> Router<()>
where
  S: RecordStore + 'static,
  B: BlobStore + 'static,
  F: SnapshotSource + 'static,
{
  Router::new()
    // Queries
    .route("/aircraft/", get(aircraft::list::<S, B, F>))
    .route("/aircraft/types", get(aircraft::types::<S, B, F>))
    .route("/aircraft/{icao}/positions", get(aircraft::positions::<S, B, F>))
    .route("/aircraft/{icao}/stats", get(aircraft::stats::<S, B, F>))
    .route("/aircraft/{icao}/latest", get(aircraft::latest::<S, B, F>))
    // Ingestion
    .route("/aircraft/download", post(ingest::download::<S, B, F>))
    .route("/aircraft/prepare", post(ingest::prepare::<S, B, F>))
    .with_state(ingestor)
}
