//! Markdown rendering of grouped press releases.

use std::fmt::Write as _;

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::digest::group::GroupedNews;
use crate::feed::NewsItem;

/// Fixed literals used in the rendered document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labels {
    /// Suffix after the date range in the top heading.
    pub title_suffix: String,
    /// Text of the link label.
    pub link_label: String,
    /// Suffix after the two-digit hour.
    pub hour_suffix: String,
    /// Body line used when an item has no summary.
    pub no_summary: String,
}

impl Labels {
    /// Korean labels.
    pub fn korean() -> Self {
        Self {
            title_suffix: "보도자료".to_string(),
            link_label: "링크".to_string(),
            hour_suffix: "시".to_string(),
            no_summary: "요약 정보 없음".to_string(),
        }
    }

    /// English labels.
    pub fn english() -> Self {
        Self {
            title_suffix: "press releases".to_string(),
            link_label: "link".to_string(),
            hour_suffix: "h".to_string(),
            no_summary: "No summary available".to_string(),
        }
    }

    /// Labels for a locale code. Unknown codes fall back to Korean.
    pub fn for_locale(locale: &str) -> Self {
        match locale.to_lowercase().as_str() {
            "en" | "english" => Self::english(),
            _ => Self::korean(),
        }
    }
}

impl Default for Labels {
    fn default() -> Self {
        Self::korean()
    }
}

/// Optional capability that rewrites an item summary.
pub trait Summarizer: Send + Sync {
    /// Summarize `text` following `prompt`. `None` keeps the original text.
    fn summarize(&self, text: &str, prompt: &str) -> Option<String>;
}

/// A summarizer together with the prompt to drive it.
#[derive(Clone, Copy)]
pub struct SummaryHook<'a> {
    pub summarizer: &'a dyn Summarizer,
    pub prompt: &'a str,
}

/// Output artifact of a digest run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedDocument {
    /// Text of the top-level heading.
    pub title: String,
    /// Full markdown body, heading included.
    pub body: String,
}

/// Render grouped items as a markdown digest.
///
/// Pure text assembly; identical inputs produce byte-identical output.
pub fn render(
    grouped: &GroupedNews,
    window_start_date: NaiveDate,
    rendered_at: DateTime<Tz>,
    labels: &Labels,
    hook: Option<SummaryHook<'_>>,
) -> RenderedDocument {
    let title = format!(
        "{}~{} {}",
        window_start_date.format("%y%m%d"),
        rendered_at.date_naive().format("%y%m%d"),
        labels.title_suffix
    );

    let mut body = format!("# {}\n\n", title);
    for group in grouped.groups() {
        let _ = writeln!(body, "## {}", group.source_name);
        for item in &group.items {
            render_item(&mut body, item, labels, hook);
        }
    }

    RenderedDocument { title, body }
}

fn render_item(out: &mut String, item: &NewsItem, labels: &Labels, hook: Option<SummaryHook<'_>>) {
    let _ = write!(
        out,
        "- **{}** [[{}]]({})  \n",
        item.title, labels.link_label, item.link
    );
    let _ = write!(
        out,
        "  <sub>({}{})</sub>\n\n",
        item.published_at.format("%Y-%m-%d %H"),
        labels.hour_suffix
    );

    let summary = summary_text(item, hook);
    if summary.is_empty() {
        let _ = write!(out, "  {}\n\n", labels.no_summary);
    } else {
        let _ = write!(out, "  {}\n\n", summary);
    }
}

fn summary_text(item: &NewsItem, hook: Option<SummaryHook<'_>>) -> String {
    let clean = item.summary_clean.as_str();
    match hook {
        Some(hook) if !clean.is_empty() && !hook.prompt.trim().is_empty() => hook
            .summarizer
            .summarize(clean, hook.prompt)
            .unwrap_or_else(|| clean.to_string()),
        _ => clean.to_string(),
    }
}

/// Subject of the published wiki page for a run on `date`.
pub fn page_subject(prefix: &str, date: NaiveDate) -> String {
    format!("{} {}", prefix, date.format("%Y-%m-%d"))
}
