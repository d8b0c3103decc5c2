//! Press-release feed collection for pressdigest.
//!
//! This module provides:
//! - Feed fetching with timeouts and size limits
//! - Summary markup cleanup
//! - Normalization of entries into [`NewsItem`] values

pub mod clean;
pub mod fetcher;
pub mod normalize;
pub mod types;

pub use clean::clean_summary;
pub use fetcher::{parse_feed, validate_url, FeedFetcher};
pub use normalize::{fetch_and_normalize, normalize_entry, normalize_feed};
pub use types::{default_sources, FeedSource, NewsItem, RawEntry, MAX_FEED_SIZE};
