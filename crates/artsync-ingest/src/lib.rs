//! Artsync Ingest Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Provider scripts that pull openly licensed artwork metadata from museum
//! APIs and hand normalized image records to the shared image store.
//!
//! # Supported Providers
//!
//! - **Cleveland Museum of Art**: CC0 artworks from the open-access API
//!
//! # Example
//!
//! ```no_run
//! use artsync_ingest::cleveland;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let summary = cleveland::ingest("./output").await?;
//!     tracing::info!(total = summary.total_committed, "Cleveland run finished");
//!     Ok(())
//! }
//! ```

pub mod cleveland;
pub mod requester;

pub use requester::DelayedRequester;
