// Cleveland Museum of Art Pipeline Orchestration
//
// Owns the fetcher and the processor for one run. The sink is passed in so
// tests can substitute their own; `ingest` wires the production TSV store.

use crate::cleveland::{ClevelandConfig, Fetcher, RecordProcessor, Result, RunSummary};
use artsync_common::storage::{ImageSink, ImageStore};
use std::path::Path;
use tracing::info;

/// One Cleveland ingestion run
pub struct ClevelandPipeline<S> {
    fetcher: Fetcher,
    processor: RecordProcessor<S>,
}

impl<S: ImageSink> ClevelandPipeline<S> {
    pub fn new(config: ClevelandConfig, sink: S) -> Result<Self> {
        let processor = RecordProcessor::new(sink, config.provider.clone());
        let fetcher = Fetcher::new(config)?;

        Ok(Self { fetcher, processor })
    }

    /// Fetch every page, process it, and commit the sink once
    pub async fn run(&mut self) -> Result<RunSummary> {
        self.fetcher.fetch_all(&mut self.processor).await
    }

    pub fn processor(&self) -> &RecordProcessor<S> {
        &self.processor
    }

    pub fn into_sink(self) -> S {
        self.processor.into_sink()
    }
}

/// Run the production pipeline, writing records under `output_dir`
pub async fn ingest(output_dir: impl AsRef<Path>) -> Result<RunSummary> {
    let config = ClevelandConfig::default();
    let store = ImageStore::new(config.provider.clone(), output_dir)?;
    info!(path = %store.output_path().display(), "Writing Cleveland records");

    let mut pipeline = ClevelandPipeline::new(config, store)?;
    pipeline.run().await
}
