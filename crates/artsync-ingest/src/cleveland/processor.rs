// Cleveland Museum of Art Record Processing
//
// Turns one page of raw artworks into image records. A record reaches the
// sink only when its license is CC0 and one of the web/print/full renditions
// has a URL; everything else is counted and dropped.

use crate::cleveland::models::{ImageSet, RawArtwork};
use crate::cleveland::{Result, ACCEPTED_LICENSE, IMAGE_VARIANTS, LICENSE_VERSION};
use artsync_common::storage::{ImageRecord, ImageSink};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Why a raw record produced no image record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Lower-cased license that was not CC0 (empty when absent)
    License(String),
    /// No web/print/full rendition carried a URL
    NoImage,
    /// Undecodable record or missing id
    Malformed(String),
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::License(license) => write!(f, "unsupported license '{}'", license),
            Rejection::NoImage => write!(f, "no usable image variant"),
            Rejection::Malformed(reason) => write!(f, "malformed record: {}", reason),
        }
    }
}

/// Counters across every page processed in a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessStats {
    pub records_seen: usize,
    pub emitted: usize,
    pub rejected_license: usize,
    pub rejected_no_image: usize,
    pub rejected_malformed: usize,
}

impl ProcessStats {
    fn record(&mut self, rejection: &Rejection) {
        match rejection {
            Rejection::License(_) => self.rejected_license += 1,
            Rejection::NoImage => self.rejected_no_image += 1,
            Rejection::Malformed(_) => self.rejected_malformed += 1,
        }
    }
}

/// Rendition chosen for a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedImage {
    pub variant: &'static str,
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Normalizes raw artworks and forwards the acceptable ones to a sink
pub struct RecordProcessor<S> {
    sink: S,
    provider: String,
    running_total: usize,
    stats: ProcessStats,
}

impl<S: ImageSink> RecordProcessor<S> {
    pub fn new(sink: S, provider: impl Into<String>) -> Self {
        let running_total = sink.total();
        Self {
            sink,
            provider: provider.into(),
            running_total,
            stats: ProcessStats::default(),
        }
    }

    /// Process one page in order and return the sink's running total
    ///
    /// The total spans every page handled so far, not just this one.
    pub fn process_page(&mut self, records: Vec<Value>) -> Result<usize> {
        for value in records {
            self.stats.records_seen += 1;

            match normalize(value, &self.provider) {
                Ok(record) => {
                    debug!(foreign_id = %record.foreign_identifier, "Emitting image record");
                    self.running_total = self.sink.add_item(record)?;
                    self.stats.emitted += 1;
                },
                Err(rejection) => {
                    match &rejection {
                        Rejection::Malformed(_) => warn!(reason = %rejection, "Skipping record"),
                        _ => debug!(reason = %rejection, "Skipping record"),
                    }
                    self.stats.record(&rejection);
                },
            }
        }

        Ok(self.running_total)
    }

    /// Flush the sink; returns the final total it reports
    pub fn commit(&mut self) -> Result<usize> {
        let total = self.sink.commit()?;
        self.running_total = total;
        Ok(total)
    }

    pub fn running_total(&self) -> usize {
        self.running_total
    }

    pub fn stats(&self) -> &ProcessStats {
        &self.stats
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

/// Build an image record from one raw artwork, or say why not
pub fn normalize(value: Value, provider: &str) -> std::result::Result<ImageRecord, Rejection> {
    let artwork =
        RawArtwork::from_value(value).map_err(|e| Rejection::Malformed(e.to_string()))?;

    let license = artwork
        .share_license_status
        .as_deref()
        .unwrap_or_default()
        .to_lowercase();
    if license != ACCEPTED_LICENSE {
        return Err(Rejection::License(license));
    }

    let foreign_identifier = artwork
        .id
        .clone()
        .ok_or_else(|| Rejection::Malformed("missing id".to_string()))?;

    let image = artwork
        .images
        .as_ref()
        .and_then(select_image)
        .ok_or(Rejection::NoImage)?;

    Ok(ImageRecord {
        foreign_identifier,
        foreign_landing_url: artwork.url.clone(),
        image_url: image.url,
        license,
        license_version: LICENSE_VERSION.to_string(),
        width: image.width,
        height: image.height,
        title: artwork.title.clone(),
        creator: creator_name(&artwork),
        meta_data: extract_metadata(&artwork),
        source: provider.to_string(),
    })
}

/// First of web, print, full whose URL is present
pub fn select_image(images: &ImageSet) -> Option<SelectedImage> {
    IMAGE_VARIANTS.iter().find_map(|&name| {
        let variant = images.variant(name)?;
        let url = variant.url.as_deref().filter(|u| !u.trim().is_empty())?;

        Some(SelectedImage {
            variant: name,
            url: url.to_string(),
            width: variant.width,
            height: variant.height,
        })
    })
}

/// Description of the first listed creator, or empty
pub fn creator_name(artwork: &RawArtwork) -> String {
    artwork
        .creators
        .as_deref()
        .and_then(|creators| creators.first())
        .and_then(|creator| creator.description.clone())
        .unwrap_or_default()
}

/// The seven descriptive fields kept for every record, empty when absent
pub fn extract_metadata(artwork: &RawArtwork) -> BTreeMap<String, String> {
    let text = |field: &Option<String>| field.clone().unwrap_or_default();
    let culture = artwork
        .culture
        .as_deref()
        .map(|cultures| cultures.join(","))
        .unwrap_or_default();

    BTreeMap::from([
        ("accession_number".to_string(), text(&artwork.accession_number)),
        ("technique".to_string(), text(&artwork.technique)),
        ("date".to_string(), text(&artwork.creation_date)),
        ("credit_line".to_string(), text(&artwork.creditline)),
        ("classification".to_string(), text(&artwork.classification)),
        ("tombstone".to_string(), text(&artwork.tombstone)),
        ("culture".to_string(), culture),
    ])
}
