//! Artsync Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, storage, and error handling for the Artsync ingestion workspace.
//!
//! # Overview
//!
//! This crate provides the functionality every provider script relies on:
//!
//! - **Error Handling**: Custom error types and result types
//! - **Logging**: Tracing subscriber setup driven by `LOG_*` variables
//! - **Storage**: The `ImageSink` contract and the TSV-backed `ImageStore`
//!
//! # Example
//!
//! ```no_run
//! use artsync_common::storage::{ImageSink, ImageStore};
//! use artsync_common::Result;
//!
//! fn finish(store: &mut ImageStore) -> Result<()> {
//!     let total = store.commit()?;
//!     tracing::info!(total, "Images written");
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod logging;
pub mod storage;

// Re-export commonly used types
pub use error::{ArtsyncError, Result};
pub use storage::{ImageRecord, ImageSink, ImageStore};
