//! Feed types for pressdigest.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Maximum feed size in bytes (5MB).
pub const MAX_FEED_SIZE: u64 = 5 * 1024 * 1024;

/// Department press-release feeds published on korea.kr.
const DEFAULT_SOURCES: [(&str, &str); 6] = [
    ("금융위원회", "https://www.korea.kr/rss/dept_fsc.xml"),
    ("기획재정부", "https://www.korea.kr/rss/dept_moef.xml"),
    ("산업통상자원부", "https://www.korea.kr/rss/dept_motie.xml"),
    ("과학기술정보통신부", "https://www.korea.kr/rss/dept_msit.xml"),
    ("중소벤처기업부", "https://www.korea.kr/rss/dept_mss.xml"),
    ("탄소중립녹색성장 위원회", "https://www.korea.kr/rss/dept_cnc.xml"),
];

/// A named feed endpoint to poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSource {
    /// Name the source's items are grouped under (e.g. a department).
    pub name: String,
    /// Feed URL.
    pub url: String,
}

impl FeedSource {
    /// Create a new feed source.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// The built-in set of government department feeds.
pub fn default_sources() -> Vec<FeedSource> {
    DEFAULT_SOURCES
        .iter()
        .map(|(name, url)| FeedSource::new(*name, *url))
        .collect()
}

/// An entry as it comes out of the feed parser, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEntry {
    /// Entry title.
    pub title: Option<String>,
    /// First link of the entry.
    pub link: Option<String>,
    /// Publication instant (falls back to the update instant).
    pub published: Option<DateTime<Utc>>,
    /// Summary, possibly containing markup.
    pub summary: Option<String>,
}

/// One normalized press-release entry.
#[derive(Debug, Clone, PartialEq)]
pub struct NewsItem {
    /// Name of the originating feed source.
    pub source_name: String,
    /// Entry title, never empty.
    pub title: String,
    /// Entry URL.
    pub link: String,
    /// Publication instant in the reference timezone.
    pub published_at: DateTime<Tz>,
    /// Summary as published, possibly with markup.
    pub summary_raw: Option<String>,
    /// Plain-text summary; empty when there was none.
    pub summary_clean: String,
}
