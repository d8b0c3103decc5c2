//! pressdigest - business-day press release digests for Dooray! wiki pages.
//!
//! Government press-release feeds are fetched, filtered to everything
//! published since the previous business day's cutoff, rendered as a
//! grouped markdown digest and published as a wiki page.

pub mod calendar;
pub mod config;
pub mod digest;
pub mod error;
pub mod feed;
pub mod logging;
pub mod pipeline;
pub mod publish;
pub mod scheduler;
pub mod task;
pub mod web;

pub use calendar::{resolve_window, DateWindow, HolidayCalendar, KoreanHolidays, WindowPolicy};
pub use config::Config;
pub use digest::{filter_and_group, render, GroupedNews, Labels, RenderedDocument, Summarizer};
pub use error::{DigestError, Result};
pub use feed::{clean_summary, fetch_and_normalize, FeedFetcher, FeedSource, NewsItem};
pub use pipeline::{DigestPipeline, FailedAt, RunOutcome, RunStage, NO_NEWS_MESSAGE};
pub use publish::{DoorayClient, PublishSink, PublishTarget};
pub use scheduler::{start_scheduler, DigestScheduler};
pub use task::{CredentialStore, TaskSetting, TaskStore};
