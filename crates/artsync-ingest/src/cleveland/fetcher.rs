// Cleveland Museum of Art Paginated Fetcher

use crate::cleveland::processor::{ProcessStats, RecordProcessor};
use crate::cleveland::{ClevelandConfig, IngestError, Result};
use crate::requester::DelayedRequester;
use artsync_common::storage::ImageSink;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Why pagination stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The last attempt returned a well-formed body without records
    EndOfData,
    /// The last attempt failed (bad status, `error` field, or transport error)
    RetriesExhausted,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::EndOfData => write!(f, "end of data"),
            StopReason::RetriesExhausted => write!(f, "retries exhausted"),
        }
    }
}

/// Result of fetching one page, retries included
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    Records(Vec<Value>),
    Empty(StopReason),
}

/// What a run did, returned after the final commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Pages that returned records
    pub pages: usize,
    /// Offset of the page that ended the run
    pub final_offset: u64,
    pub stats: ProcessStats,
    /// Count reported by the sink's commit
    pub total_committed: usize,
    pub stop_reason: StopReason,
}

enum Attempt {
    Records(Vec<Value>),
    NoData,
    Failed(String),
}

/// Drives skip/limit pagination against the artworks endpoint
pub struct Fetcher {
    config: ClevelandConfig,
    requester: DelayedRequester,
    offset: u64,
}

impl Fetcher {
    /// Create a fetcher with its own rate-limited HTTP client
    pub fn new(config: ClevelandConfig) -> Result<Self> {
        config.validate().map_err(IngestError::Validation)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        let requester = DelayedRequester::new(client, config.delay);

        Ok(Self::with_requester(config, requester))
    }

    pub fn with_requester(config: ClevelandConfig, requester: DelayedRequester) -> Self {
        Self {
            config,
            requester,
            offset: 0,
        }
    }

    /// Offset of the next page to request
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn config(&self) -> &ClevelandConfig {
        &self.config
    }

    /// Page through the endpoint, feeding every page to `processor`
    ///
    /// The processor is committed exactly once when the loop ends, including
    /// when it ends with an error; that error is returned after the commit.
    pub async fn fetch_all<S: ImageSink>(
        &mut self,
        processor: &mut RecordProcessor<S>,
    ) -> Result<RunSummary> {
        info!(endpoint = %self.config.endpoint, "Begin: Cleveland Museum API requests");

        let paginated = self.paginate(processor).await;
        let committed = processor.commit();

        match (paginated, committed) {
            (Ok((pages, stop_reason)), Ok(total)) => {
                info!(total, pages, %stop_reason, "Total number of images received");
                Ok(RunSummary {
                    pages,
                    final_offset: self.offset,
                    stats: processor.stats().clone(),
                    total_committed: total,
                    stop_reason,
                })
            },
            (Ok((pages, _)), Err(commit_error)) => {
                error!(error = %commit_error, pages, offset = self.offset, "Commit failed after run");
                Err(commit_error)
            },
            (Err(run_error), Ok(total)) => {
                error!(error = %run_error, total, offset = self.offset, "Run aborted after commit");
                Err(run_error)
            },
            (Err(run_error), Err(commit_error)) => {
                error!(error = %commit_error, "Commit failed after aborted run");
                Err(run_error)
            },
        }
    }

    async fn paginate<S: ImageSink>(
        &mut self,
        processor: &mut RecordProcessor<S>,
    ) -> Result<(usize, StopReason)> {
        let mut pages = 0;

        loop {
            match self.fetch_page(self.offset).await? {
                PageOutcome::Records(records) => {
                    let count = records.len();
                    let total = processor.process_page(records)?;
                    pages += 1;
                    info!(offset = self.offset, records = count, total, "Total images till now");
                    self.offset += u64::from(self.config.limit);
                },
                PageOutcome::Empty(reason) => {
                    info!(offset = self.offset, %reason, "No more images to process");
                    return Ok((pages, reason));
                },
            }
        }
    }

    /// Fetch the page at `offset`, retrying up to `config.retries` extra times
    ///
    /// Only a 200 response whose body is not valid JSON is an error; every
    /// other failure is retried and eventually reported as `Empty`.
    pub async fn fetch_page(&mut self, offset: u64) -> Result<PageOutcome> {
        let params = self.config.query_params(offset);
        let attempts = self.config.retries + 1;
        let mut reason = StopReason::EndOfData;

        for attempt in 1..=attempts {
            match self.attempt(&params, offset).await? {
                Attempt::Records(records) => {
                    debug!(offset, attempt, records = records.len(), "Successful response");
                    return Ok(PageOutcome::Records(records));
                },
                Attempt::NoData => {
                    debug!(offset, attempt, attempts, "Response carried no records");
                    reason = StopReason::EndOfData;
                },
                Attempt::Failed(why) => {
                    warn!(offset, attempt, attempts, reason = %why, "Bad response");
                    reason = StopReason::RetriesExhausted;
                },
            }

            if attempt < attempts {
                info!(endpoint = %self.config.endpoint, offset, "Retrying");
            }
        }

        if reason == StopReason::RetriesExhausted {
            error!(offset, attempts, "Max retries exceeded");
        }

        Ok(PageOutcome::Empty(reason))
    }

    async fn attempt(&mut self, params: &[(&str, String)], offset: u64) -> Result<Attempt> {
        let response = match self.requester.get(&self.config.endpoint, params).await {
            Ok(response) => response,
            Err(e) => return Ok(Attempt::Failed(format!("request failed: {}", e))),
        };

        let status = response.status();
        if status != StatusCode::OK {
            return Ok(Attempt::Failed(format!("HTTP status {}", status)));
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return Ok(Attempt::Failed(format!("failed to read body: {}", e))),
        };

        let json: Value = serde_json::from_str(&body).map_err(|source| IngestError::Parse {
            endpoint: self.config.endpoint.clone(),
            offset,
            source,
        })?;

        Ok(classify(json))
    }
}

fn classify(body: Value) -> Attempt {
    if let Some(api_error) = body.get("error").filter(|e| !e.is_null()) {
        return Attempt::Failed(format!("API error: {}", api_error));
    }

    match body {
        Value::Object(mut fields) => match fields.remove("data") {
            Some(Value::Array(records)) if !records.is_empty() => Attempt::Records(records),
            _ => Attempt::NoData,
        },
        _ => Attempt::NoData,
    }
}
