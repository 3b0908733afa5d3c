// Cleveland Museum of Art API Configuration

use crate::cleveland::{DELAY_SECS, ENDPOINT, LIMIT, PROVIDER, RETRIES};
use std::time::Duration;

/// Settings for one Cleveland ingestion run
///
/// `Default` carries the fixed production values. The builder exists so tests
/// can aim the fetcher at a mock server without the production delay.
#[derive(Debug, Clone)]
pub struct ClevelandConfig {
    /// Artworks endpoint
    pub endpoint: String,

    /// Records per page, also the offset step
    pub limit: u32,

    /// Minimum gap between request starts
    pub delay: Duration,

    /// Additional attempts per page after the first failure
    pub retries: u32,

    /// HTTP timeout in seconds
    pub timeout_secs: u64,

    pub user_agent: String,

    /// Provider identifier stamped on every record
    pub provider: String,
}

impl Default for ClevelandConfig {
    fn default() -> Self {
        ClevelandConfig {
            endpoint: ENDPOINT.to_string(),
            limit: LIMIT,
            delay: Duration::from_secs_f64(DELAY_SECS),
            retries: RETRIES,
            timeout_secs: 60,
            user_agent: concat!("Artsync-Cleveland-Ingester/", env!("CARGO_PKG_VERSION"))
                .to_string(),
            provider: PROVIDER.to_string(),
        }
    }
}

impl ClevelandConfig {
    pub fn builder() -> ClevelandConfigBuilder {
        ClevelandConfigBuilder::default()
    }

    /// Query parameters for the page starting at `offset`
    ///
    /// The filter is fixed: CC-licensed works that have an image.
    pub fn query_params(&self, offset: u64) -> Vec<(&'static str, String)> {
        vec![
            ("cc", "1".to_string()),
            ("has_image", "1".to_string()),
            ("limit", self.limit.to_string()),
            ("skip", offset.to_string()),
        ]
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.endpoint.is_empty() {
            return Err("Endpoint cannot be empty".to_string());
        }

        if self.limit == 0 {
            return Err("Page limit must be greater than 0".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }

        if self.provider.is_empty() {
            return Err("Provider cannot be empty".to_string());
        }

        Ok(())
    }
}

/// Builder for ClevelandConfig
#[derive(Debug, Default)]
pub struct ClevelandConfigBuilder {
    endpoint: Option<String>,
    limit: Option<u32>,
    delay: Option<Duration>,
    retries: Option<u32>,
    timeout_secs: Option<u64>,
}

impl ClevelandConfigBuilder {
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = Some(retries);
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn build(self) -> ClevelandConfig {
        let default = ClevelandConfig::default();

        ClevelandConfig {
            endpoint: self.endpoint.unwrap_or(default.endpoint),
            limit: self.limit.unwrap_or(default.limit),
            delay: self.delay.unwrap_or(default.delay),
            retries: self.retries.unwrap_or(default.retries),
            timeout_secs: self.timeout_secs.unwrap_or(default.timeout_secs),
            user_agent: default.user_agent,
            provider: default.provider,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
