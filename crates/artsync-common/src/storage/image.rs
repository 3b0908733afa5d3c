//! TSV-backed image store
//!
//! Records are deduplicated on `foreign_identifier`, buffered in memory, and
//! appended to `<output_dir>/<provider>_<timestamp>.tsv` whenever the buffer
//! fills. `commit` writes whatever is left.

use crate::error::{ArtsyncError, Result};
use crate::storage::{ImageRecord, ImageSink};
use chrono::Utc;
use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use url::Url;

/// Records held in memory before they are appended to disk
pub const DEFAULT_BUFFER_LENGTH: usize = 100;

/// Written in place of absent values
pub const NULL_MARKER: &str = "\\N";

/// Deduplicating, buffered TSV writer
pub struct ImageStore {
    provider: String,
    output_path: PathBuf,
    buffer: Vec<ImageRecord>,
    buffer_length: usize,
    seen: HashSet<String>,
    total: usize,
}

impl ImageStore {
    /// Create a store writing a timestamped file under `output_dir`
    pub fn new(provider: impl Into<String>, output_dir: impl AsRef<Path>) -> Result<Self> {
        let provider = provider.into();
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)?;

        let file_name = format!("{}_{}.tsv", provider, Utc::now().format("%Y%m%d%H%M%S"));
        let output_path = output_dir.join(file_name);

        info!(provider = %provider, path = %output_path.display(), "Image store ready");

        Ok(Self::with_output_path(provider, output_path))
    }

    /// Create a store writing to an exact file path
    pub fn with_output_path(provider: impl Into<String>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            provider: provider.into(),
            output_path: output_path.into(),
            buffer: Vec::with_capacity(DEFAULT_BUFFER_LENGTH),
            buffer_length: DEFAULT_BUFFER_LENGTH,
            seen: HashSet::new(),
            total: 0,
        }
    }

    /// Override how many records are buffered between disk writes
    pub fn buffer_length(mut self, length: usize) -> Self {
        self.buffer_length = length.max(1);
        self
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Records buffered but not yet on disk
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    fn validate(record: &mut ImageRecord) -> Result<()> {
        if record.foreign_identifier.trim().is_empty() {
            return Err(ArtsyncError::invalid_record("missing foreign identifier"));
        }

        if record.license.trim().is_empty() {
            return Err(ArtsyncError::invalid_record(format!(
                "missing license for {}",
                record.foreign_identifier
            )));
        }

        if !is_web_url(&record.image_url) {
            return Err(ArtsyncError::invalid_record(format!(
                "image url '{}' is not an http(s) url",
                record.image_url
            )));
        }

        if let Some(landing) = record.foreign_landing_url.as_deref() {
            if !is_web_url(landing) {
                debug!(
                    foreign_id = %record.foreign_identifier,
                    url = landing,
                    "Dropping invalid landing url"
                );
                record.foreign_landing_url = None;
            }
        }

        Ok(())
    }

    /// Append the buffer to disk as a single write
    ///
    /// On failure the file is truncated back to its previous length and the
    /// buffer is kept, so a later flush cannot duplicate rows.
    fn flush(&mut self) -> Result<usize> {
        if self.buffer.is_empty() {
            return Ok(0);
        }

        let batch = encode_rows(&self.provider, &self.buffer)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.output_path)?;
        let original_len = file.metadata()?.len();

        if let Err(e) = file.write_all(&batch).and_then(|()| file.flush()) {
            if let Err(rollback) = file.set_len(original_len) {
                warn!(
                    error = %rollback,
                    path = %self.output_path.display(),
                    "Could not roll back partial write"
                );
            }
            return Err(e.into());
        }

        let written = self.buffer.len();
        self.buffer.clear();

        debug!(written, path = %self.output_path.display(), "Flushed image buffer");
        Ok(written)
    }
}

impl ImageSink for ImageStore {
    fn add_item(&mut self, mut record: ImageRecord) -> Result<usize> {
        if let Err(e) = Self::validate(&mut record) {
            warn!(error = %e, "Image store rejected record");
            return Ok(self.total);
        }

        if !self.seen.insert(record.foreign_identifier.clone()) {
            debug!(foreign_id = %record.foreign_identifier, "Duplicate record ignored");
            return Ok(self.total);
        }

        self.buffer.push(record);
        self.total += 1;

        if self.buffer.len() >= self.buffer_length {
            self.flush()?;
        }

        Ok(self.total)
    }

    fn commit(&mut self) -> Result<usize> {
        self.flush()?;
        info!(
            provider = %self.provider,
            total = self.total,
            path = %self.output_path.display(),
            "Image store committed"
        );
        Ok(self.total)
    }

    fn total(&self) -> usize {
        self.total
    }
}

fn is_web_url(candidate: &str) -> bool {
    match Url::parse(candidate) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.has_host(),
        Err(_) => false,
    }
}

fn encode_rows(provider: &str, records: &[ImageRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(Vec::new());

    for record in records {
        writer.write_record(to_row(provider, record)?)?;
    }

    writer
        .into_inner()
        .map_err(|e| ArtsyncError::Io(e.into_error()))
}

fn or_null(value: Option<String>) -> String {
    value.unwrap_or_else(|| NULL_MARKER.to_string())
}

fn to_row(provider: &str, record: &ImageRecord) -> Result<Vec<String>> {
    Ok(vec![
        record.foreign_identifier.clone(),
        or_null(record.foreign_landing_url.clone()),
        record.image_url.clone(),
        or_null(record.width.map(|w| w.to_string())),
        or_null(record.height.map(|h| h.to_string())),
        record.license.clone(),
        record.license_version.clone(),
        record.creator.clone(),
        or_null(record.title.clone()),
        serde_json::to_string(&record.meta_data)?,
        provider.to_string(),
        record.source.clone(),
    ])
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn record(id: &str) -> ImageRecord {
        let mut meta_data = BTreeMap::new();
        meta_data.insert("culture".to_string(), "Greek,Roman".to_string());

        ImageRecord {
            foreign_identifier: id.to_string(),
            foreign_landing_url: Some(format!("https://example.org/art/{}", id)),
            image_url: format!("https://example.org/img/{}.jpg", id),
            license: "cc0".to_string(),
            license_version: "1.0".to_string(),
            width: Some(640),
            height: None,
            title: Some("Amphora".to_string()),
            creator: String::new(),
            meta_data,
            source: "clevelandmuseum".to_string(),
        }
    }

    fn read_rows(path: &Path) -> Vec<Vec<String>> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .from_path(path)
            .unwrap();
        reader
            .records()
            .map(|r| r.unwrap().iter().map(String::from).collect())
            .collect()
    }

    #[test]
    fn test_new_creates_timestamped_file_name() {
        let dir = TempDir::new().unwrap();
        let store = ImageStore::new("clevelandmuseum", dir.path().join("out")).unwrap();

        let name = store.output_path().file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("clevelandmuseum_"));
        assert!(name.ends_with(".tsv"));
        assert!(dir.path().join("out").is_dir());
    }

    #[test]
    fn test_duplicates_are_counted_once() {
        let dir = TempDir::new().unwrap();
        let mut store = ImageStore::with_output_path("p", dir.path().join("p.tsv"));

        assert_eq!(store.add_item(record("1")).unwrap(), 1);
        assert_eq!(store.add_item(record("2")).unwrap(), 2);
        assert_eq!(store.add_item(record("1")).unwrap(), 2);
        assert_eq!(store.commit().unwrap(), 2);
        assert_eq!(read_rows(store.output_path()).len(), 2);
    }

    #[test]
    fn test_invalid_image_url_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut store = ImageStore::with_output_path("p", dir.path().join("p.tsv"));

        let mut bad = record("1");
        bad.image_url = "not a url".to_string();
        assert_eq!(store.add_item(bad).unwrap(), 0);

        let mut ftp = record("2");
        ftp.image_url = "ftp://example.org/a.jpg".to_string();
        assert_eq!(store.add_item(ftp).unwrap(), 0);

        assert_eq!(store.total(), 0);
    }

    #[test]
    fn test_invalid_landing_url_is_dropped_not_rejected() {
        let dir = TempDir::new().unwrap();
        let mut store = ImageStore::with_output_path("p", dir.path().join("p.tsv"));

        let mut rec = record("1");
        rec.foreign_landing_url = Some("javascript:void(0)".to_string());
        assert_eq!(store.add_item(rec).unwrap(), 1);
        store.commit().unwrap();

        let rows = read_rows(store.output_path());
        assert_eq!(rows[0][1], NULL_MARKER);
    }

    #[test]
    fn test_buffer_flushes_when_full() {
        let dir = TempDir::new().unwrap();
        let mut store =
            ImageStore::with_output_path("p", dir.path().join("p.tsv")).buffer_length(2);

        store.add_item(record("1")).unwrap();
        assert_eq!(store.pending(), 1);
        assert!(!store.output_path().exists());

        store.add_item(record("2")).unwrap();
        assert_eq!(store.pending(), 0);
        assert_eq!(read_rows(store.output_path()).len(), 2);

        store.add_item(record("3")).unwrap();
        assert_eq!(store.commit().unwrap(), 3);
        assert_eq!(read_rows(store.output_path()).len(), 3);
    }

    #[test]
    fn test_row_layout() {
        let dir = TempDir::new().unwrap();
        let mut store = ImageStore::with_output_path("clevelandmuseum", dir.path().join("p.tsv"));
        store.add_item(record("42")).unwrap();
        store.commit().unwrap();

        let rows = read_rows(store.output_path());
        let row = &rows[0];
        assert_eq!(row.len(), 12);
        assert_eq!(row[0], "42");
        assert_eq!(row[2], "https://example.org/img/42.jpg");
        assert_eq!(row[3], "640");
        assert_eq!(row[4], NULL_MARKER);
        assert_eq!(row[5], "cc0");
        assert_eq!(row[6], "1.0");
        assert_eq!(row[7], "");
        assert_eq!(row[8], "Amphora");
        assert_eq!(row[9], r#"{"culture":"Greek,Roman"}"#);
        assert_eq!(row[10], "clevelandmuseum");
    }

    #[test]
    fn test_failed_flush_keeps_batch_buffered() {
        // Every write to /dev/full fails with "no space left on device"
        let full = Path::new("/dev/full");
        if !full.exists() {
            return;
        }

        let mut store = ImageStore::with_output_path("p", full);
        store.add_item(record("1")).unwrap();
        store.add_item(record("2")).unwrap();

        assert!(matches!(store.commit(), Err(ArtsyncError::Io(_))));
        assert_eq!(store.pending(), 2);
        assert_eq!(store.total(), 2);
    }

    #[test]
    fn test_successive_flushes_append_each_batch_once() {
        let dir = TempDir::new().unwrap();
        let mut store = ImageStore::with_output_path("p", dir.path().join("p.tsv"));

        store.add_item(record("1")).unwrap();
        store.commit().unwrap();
        store.add_item(record("2")).unwrap();
        store.commit().unwrap();
        store.commit().unwrap();

        let ids: Vec<String> = read_rows(store.output_path()).into_iter().map(|r| r[0].clone()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_encoded_batch_is_one_line_per_record() {
        let bytes = encode_rows("p", &[record("1"), record("2")]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().all(|line| line.split('\t').count() == 12));
    }

    proptest! {
        #[test]
        fn prop_total_counts_distinct_ids(ids in proptest::collection::vec(0u8..20, 0..60)) {
            let dir = TempDir::new().unwrap();
            let mut store =
                ImageStore::with_output_path("p", dir.path().join("p.tsv")).buffer_length(7);

            for id in &ids {
                store.add_item(record(&id.to_string())).unwrap();
            }
            let distinct: HashSet<u8> = ids.iter().copied().collect();

            prop_assert_eq!(store.commit().unwrap(), distinct.len());
            if !distinct.is_empty() {
                prop_assert_eq!(read_rows(store.output_path()).len(), distinct.len());
            }
        }
    }

    #[test]
    fn test_commit_with_nothing_buffered() {
        let dir = TempDir::new().unwrap();
        let mut store = ImageStore::with_output_path("p", dir.path().join("p.tsv"));
        assert_eq!(store.commit().unwrap(), 0);
        assert!(!store.output_path().exists());
    }
}
