//! Feed fetcher with resource limits.
//!
//! Downloads RSS/Atom documents over HTTP and turns them into [`RawEntry`]
//! values. One fetcher is shared by every source of a run.

use std::time::Duration;

use feed_rs::parser;
use reqwest::Client;
use tracing::debug;

use crate::config::FetchConfig;
use crate::error::{DigestError, Result};
use crate::feed::types::RawEntry;

/// HTTP feed fetcher.
#[derive(Debug, Clone)]
pub struct FeedFetcher {
    client: Client,
    max_feed_size: u64,
}

impl FeedFetcher {
    /// Create a new fetcher from the fetch settings.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .read_timeout(Duration::from_secs(config.read_timeout_secs))
            .timeout(Duration::from_secs(config.total_timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| DigestError::Feed(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            max_feed_size: config.max_feed_size,
        })
    }

    /// Fetch and parse a feed from the given URL.
    pub async fn fetch(&self, url: &str) -> Result<Vec<RawEntry>> {
        validate_url(url)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DigestError::Feed(format!("failed to fetch feed: {}", e)))?;

        if !response.status().is_success() {
            return Err(DigestError::Feed(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        if let Some(content_length) = response.content_length() {
            if content_length > self.max_feed_size {
                return Err(DigestError::Feed(format!(
                    "feed too large: {} bytes (max {} bytes)",
                    content_length, self.max_feed_size
                )));
            }
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DigestError::Feed(format!("failed to read response: {}", e)))?;

        if bytes.len() as u64 > self.max_feed_size {
            return Err(DigestError::Feed(format!(
                "feed too large: {} bytes (max {} bytes)",
                bytes.len(),
                self.max_feed_size
            )));
        }

        let entries = parse_feed(&bytes)?;
        debug!(url, entries = entries.len(), "Fetched feed");
        Ok(entries)
    }
}

/// Validate a feed URL.
///
/// Only absolute http(s) URLs with a host are accepted.
pub fn validate_url(url: &str) -> Result<()> {
    let parsed =
        url::Url::parse(url).map_err(|e| DigestError::Feed(format!("invalid URL: {}", e)))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(DigestError::Feed(format!(
                "unsupported URL scheme: {}",
                scheme
            )));
        }
    }

    if parsed.host().is_none() {
        return Err(DigestError::Feed("URL has no host".to_string()));
    }

    Ok(())
}

/// Parse feed bytes into raw entries, in document order.
pub fn parse_feed(bytes: &[u8]) -> Result<Vec<RawEntry>> {
    let feed = parser::parse(bytes)
        .map_err(|e| DigestError::Feed(format!("failed to parse feed: {}", e)))?;

    let entries = feed
        .entries
        .into_iter()
        .map(|entry| RawEntry {
            title: entry.title.map(|t| t.content),
            link: entry.links.first().map(|l| l.href.clone()),
            published: entry.published.or(entry.updated),
            summary: entry
                .summary
                .map(|t| t.content)
                .or(entry.content.and_then(|c| c.body)),
        })
        .collect();

    Ok(entries)
}
