// src/services/feeds.rs

//! Feed retrieval service.
//!
//! Downloads the current and historical CSV documents. Transport errors and
//! non-2xx responses fail the whole feed; retry policy is left to the
//! refresh trigger.

use std::time::Duration;

use crate::config::Config;
use crate::error::Result;

/// Downloads the two upstream CSV feeds with one configured client.
pub struct FeedFetcher {
    client: reqwest::Client,
    current_url: String,
    historical_url: String,
}

impl FeedFetcher {
    /// Create a fetcher from the fetch and feed configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.fetch.user_agent)
            .timeout(Duration::from_secs(config.fetch.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            current_url: config.feeds.current_url.clone(),
            historical_url: config.feeds.historical_url.clone(),
        })
    }

    /// Download both feeds concurrently. Returns (historical, current) CSV
    /// text; either failing fails the pair.
    pub async fn fetch_both(&self) -> Result<(String, String)> {
        futures::try_join!(
            self.fetch_csv(&self.historical_url),
            self.fetch_csv(&self.current_url),
        )
    }

    async fn fetch_csv(&self, url: &str) -> Result<String> {
        let text = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(text)
    }
}
