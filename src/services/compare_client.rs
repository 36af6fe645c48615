//! Comparison API client
//!
//! Fetches per-store quotes from `GET {api_url}/api/compare?query=<text>`.
//! Transport errors, non-2xx statuses and malformed bodies all surface as
//! `PriceCompareError::Network`.

use std::time::Duration;

use tracing::debug;

use crate::types::{ComparisonResult, PriceCompareError, Result};

/// Comparison endpoint path
const COMPARE_PATH: &str = "/api/compare";

/// HTTP request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Fetch collaborator: resolves or fails exactly once per call
pub trait PriceFetcher {
    fn fetch_prices(&self, query: &str) -> Result<ComparisonResult>;
}

/// Blocking HTTP fetcher for the comparison API
#[derive(Debug, Clone)]
pub struct HttpPriceFetcher {
    client: reqwest::blocking::Client,
    api_url: String,
}

impl HttpPriceFetcher {
    /// Create a fetcher for `api_url` (scheme + host, optional path prefix)
    pub fn new(api_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PriceCompareError::Config(format!("HTTP client error: {}", e)))?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Full endpoint URL without the query string
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.api_url, COMPARE_PATH)
    }
}

impl PriceFetcher for HttpPriceFetcher {
    fn fetch_prices(&self, query: &str) -> Result<ComparisonResult> {
        debug!(endpoint = %self.endpoint(), query, "fetching comparison");

        let response = self
            .client
            .get(self.endpoint())
            .query(&[("query", query)])
            .send()
            .map_err(|e| PriceCompareError::Network(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PriceCompareError::Network(format!(
                "Failed to fetch data: HTTP {}",
                status
            )));
        }

        response
            .json::<ComparisonResult>()
            .map_err(|e| PriceCompareError::Network(format!("JSON parse error: {}", e)))
    }
}
