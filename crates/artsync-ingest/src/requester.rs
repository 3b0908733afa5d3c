//! Rate-limited HTTP GET
//!
//! Upstream catalogs ask for a pause between calls. [`DelayedRequester`]
//! guarantees at least `delay` between the start of one request and the
//! start of the next, whether the previous one succeeded or not.

use reqwest::{Client, Response};
use serde::Serialize;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::debug;

/// HTTP client that waits out a fixed gap before every request
pub struct DelayedRequester {
    client: Client,
    delay: Duration,
    last_request: Option<Instant>,
}

impl DelayedRequester {
    pub fn new(client: Client, delay: Duration) -> Self {
        Self {
            client,
            delay,
            last_request: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Sleep for whatever remains of the gap since the previous request
    pub async fn wait(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.delay {
                let remaining = self.delay - elapsed;
                debug!(wait_ms = remaining.as_millis() as u64, "Waiting before next request");
                sleep(remaining).await;
            }
        }
        self.last_request = Some(Instant::now());
    }

    /// Issue a GET with query parameters once the gap has elapsed
    pub async fn get<Q>(&mut self, url: &str, query: &Q) -> reqwest::Result<Response>
    where
        Q: Serialize + ?Sized,
    {
        self.wait().await;
        self.client.get(url).query(query).send().await
    }
}
