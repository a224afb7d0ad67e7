//! Ingestion pipeline for tracklog.
//!
//! Two batch operations, both driven by an [`Ingestor`]:
//!
//! - **download** fetches the day's hourly snapshot files from a
//!   [`SnapshotSource`](tracklog_core::source::SnapshotSource) into a
//!   [`BlobStore`](tracklog_core::source::BlobStore);
//! - **prepare** parses every stored snapshot, reduces them into one
//!   [`Dataset`](tracklog_core::dataset::Dataset) and replaces the contents of
//!   the [`RecordStore`](tracklog_core::store::RecordStore).
//!
//! A file that cannot be fetched or parsed is logged and skipped; only blob
//! or record store failures abort a run.

pub mod blob;
pub mod config;
pub mod error;
pub mod http;
mod pipeline;

pub use config::IngestConfig;
pub use error::{Error, FileError, Result};
pub use pipeline::{DownloadReport, Ingestor, PrepareReport};
