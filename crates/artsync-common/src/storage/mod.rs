//! Storage sink for normalized image records
//!
//! Provider scripts hand every accepted record to an [`ImageSink`]. The sink
//! owns deduplication and batching; callers only see a running count and a
//! single final `commit`.

pub mod image;

pub use image::{ImageStore, DEFAULT_BUFFER_LENGTH, NULL_MARKER};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One normalized image ready for persistence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Provider's unique id, the dedup key
    pub foreign_identifier: String,

    /// Page describing the work on the provider's site
    pub foreign_landing_url: Option<String>,

    pub image_url: String,

    /// Lower-cased license slug (e.g., "cc0")
    pub license: String,

    pub license_version: String,

    pub width: Option<u32>,

    pub height: Option<u32>,

    pub title: Option<String>,

    /// Empty when the provider names no creator
    pub creator: String,

    /// Provider-specific descriptive fields
    pub meta_data: BTreeMap<String, String>,

    /// Provider identifier the record came from
    pub source: String,
}

/// Accumulate-and-commit destination for image records
///
/// `add_item` returns the running number of records the sink has accepted,
/// which is unchanged when a record is rejected or deduplicated.
pub trait ImageSink {
    /// Accept one record and return the running total
    fn add_item(&mut self, record: ImageRecord) -> crate::Result<usize>;

    /// Flush everything still buffered and return the final total
    fn commit(&mut self) -> crate::Result<usize>;

    /// Records accepted so far
    fn total(&self) -> usize;
}
