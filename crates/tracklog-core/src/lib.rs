//! Core types and trait definitions for tracklog.
//!
//! This crate is deliberately free of HTTP, compression and database
//! dependencies. All other crates depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod aircraft;
pub mod dataset;
pub mod error;
pub mod source;
pub mod store;

pub use error::{Error, Result};
