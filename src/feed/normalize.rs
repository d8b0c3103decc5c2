//! Feed normalization.
//!
//! Fetches every configured source in order and converts entries into
//! [`NewsItem`] values in the reference timezone.

use chrono_tz::Tz;
use tracing::{debug, info, warn};

use crate::feed::clean::clean_summary;
use crate::feed::fetcher::FeedFetcher;
use crate::feed::types::{FeedSource, NewsItem, RawEntry};

/// Fetch all sources one after another and normalize their entries.
///
/// A source that cannot be fetched or parsed contributes nothing and is
/// logged; the remaining sources are still processed. The result keeps the
/// source order and, within a source, the feed's own entry order.
pub async fn fetch_and_normalize(
    fetcher: &FeedFetcher,
    sources: &[FeedSource],
    tz: Tz,
) -> Vec<NewsItem> {
    let mut items = Vec::new();

    for source in sources {
        match fetcher.fetch(&source.url).await {
            Ok(entries) => {
                let before = items.len();
                items.extend(normalize_feed(&source.name, entries, tz));
                info!(
                    source = %source.name,
                    items = items.len() - before,
                    "Collected feed items"
                );
            }
            Err(e) => {
                warn!(source = %source.name, url = %source.url, "Failed to fetch feed: {}", e);
            }
        }
    }

    items
}

/// Normalize every usable entry of one feed.
pub fn normalize_feed(
    source_name: &str,
    entries: Vec<RawEntry>,
    tz: Tz,
) -> impl Iterator<Item = NewsItem> + '_ {
    entries
        .into_iter()
        .filter_map(move |entry| normalize_entry(source_name, entry, tz))
}

/// Convert one raw entry into a [`NewsItem`].
///
/// Returns `None` when the title, link or timestamp is missing.
pub fn normalize_entry(source_name: &str, entry: RawEntry, tz: Tz) -> Option<NewsItem> {
    let title = entry
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string);
    let link = entry
        .link
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string);

    let (Some(title), Some(link), Some(published)) = (title, link, entry.published) else {
        debug!(
            source = source_name,
            title = ?entry.title,
            "Skipping entry without title, link or timestamp"
        );
        return None;
    };

    let summary_clean = entry
        .summary
        .as_deref()
        .map(clean_summary)
        .unwrap_or_default();

    Some(NewsItem {
        source_name: source_name.to_string(),
        title,
        link,
        published_at: published.with_timezone(&tz),
        summary_raw: entry.summary,
        summary_clean,
    })
}
