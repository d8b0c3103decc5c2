//! Digest assembly for pressdigest.
//!
//! Filters normalized items against the window cutoff, groups them by
//! source and renders the markdown document.

pub mod group;
pub mod render;

pub use group::{filter_and_group, GroupedNews, NewsGroup};
pub use render::{page_subject, render, Labels, RenderedDocument, Summarizer, SummaryHook};
