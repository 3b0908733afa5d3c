// Cleveland Museum of Art Ingestion Module
//
// Pulls CC0 artworks from the museum's open-access API
// (https://openaccess-api.clevelandart.org/) and writes one image record per
// qualifying artwork to the image store.
//
// Flow:
// - Fetcher: pages through /api/artworks/ with skip/limit, retrying bad pages
// - RecordProcessor: license filter, image variant selection, field extraction
// - Pipeline: wires both to a sink and guarantees the final commit

pub mod config;
pub mod fetcher;
pub mod models;
pub mod pipeline;
pub mod processor;

pub use config::ClevelandConfig;
pub use fetcher::{Fetcher, PageOutcome, RunSummary, StopReason};
pub use models::{Creator, ImageSet, ImageVariant, RawArtwork};
pub use pipeline::{ingest, ClevelandPipeline};
pub use processor::{ProcessStats, RecordProcessor, Rejection};

use artsync_common::ArtsyncError;

/// Open-access artworks endpoint
pub const ENDPOINT: &str = "https://openaccess-api.clevelandart.org/api/artworks/";

/// Provider identifier written to every record
pub const PROVIDER: &str = "clevelandmuseum";

/// Records requested per page
pub const LIMIT: u32 = 100;

/// Seconds between consecutive requests
pub const DELAY_SECS: f64 = 5.0;

/// Extra attempts after the first failed request for a page
pub const RETRIES: u32 = 3;

/// The only license accepted from this provider
pub const ACCEPTED_LICENSE: &str = "cc0";

pub const LICENSE_VERSION: &str = "1.0";

/// Image variants in order of preference
pub const IMAGE_VARIANTS: [&str; 3] = ["web", "print", "full"];

/// Result type for Cleveland ingestion
pub type Result<T> = std::result::Result<T, IngestError>;

/// Error types for Cleveland ingestion
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed JSON from {endpoint} at offset {offset}: {source}")]
    Parse {
        endpoint: String,
        offset: u64,
        #[source]
        source: serde_json::Error,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] ArtsyncError),

    #[error("Validation error: {0}")]
    Validation(String),
}
