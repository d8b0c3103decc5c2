//! Digest pipeline.
//!
//! One run goes through these stages in order, stopping at the first
//! failure:
//!
//! ```text
//! window resolved -> fetched -> filtered -> rendered -> published | returned document
//! ```
//!
//! Every entry point (CLI, scheduler, web API) drives the same
//! [`DigestPipeline`]. Whole-run failures are reported through
//! [`RunOutcome`]; nothing here panics or returns an error to the caller.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::calendar::{resolve_window, DateWindow, HolidayCalendar, WindowPolicy};
use crate::config::Config;
use crate::digest::{
    filter_and_group, page_subject, render, Labels, RenderedDocument, Summarizer, SummaryHook,
};
use crate::error::Result;
use crate::feed::{fetch_and_normalize, FeedFetcher, FeedSource, NewsItem};
use crate::publish::{DoorayClient, PublishReceipt, PublishSink, PublishTarget, WikiPageDraft};
use crate::task::{CredentialStore, TaskSetting};

/// Message returned when no source yielded any item.
pub const NO_NEWS_MESSAGE: &str = "no news collected";

/// Stage at which a run stopped unsuccessfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailedAt {
    /// No business day could be resolved.
    Window,
    /// Every source came back empty or failed.
    Fetched,
    /// Nothing was published at or after the cutoff.
    Filtered,
    /// The target user has no usable token.
    Credential,
    /// The wiki rejected the page or was unreachable.
    Publish,
}

/// Terminal stage of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "stage", content = "at")]
pub enum RunStage {
    /// The document was published to the wiki.
    Published,
    /// No complete target; the document is handed back to the caller.
    ReturnedDocument,
    /// The run stopped early.
    Failed(FailedAt),
}

/// Result of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    /// Whether the run reached a successful terminal stage.
    pub success: bool,
    /// Human-readable status. Holds the markdown body for [`RunStage::ReturnedDocument`].
    pub message: String,
    /// Terminal stage.
    pub stage: RunStage,
    /// Rendered document, when rendering was reached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<RenderedDocument>,
    /// Id of the created wiki page, when the wiki reported one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_id: Option<String>,
}

impl RunOutcome {
    fn failed(at: FailedAt, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            stage: RunStage::Failed(at),
            document: None,
            page_id: None,
        }
    }
}

/// Source of the current instant.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// The shared digest pipeline.
pub struct DigestPipeline {
    fetcher: FeedFetcher,
    sources: Vec<FeedSource>,
    tz: Tz,
    policy: WindowPolicy,
    holidays: Arc<dyn HolidayCalendar>,
    labels: Labels,
    page_title_prefix: String,
    credentials: Arc<CredentialStore>,
    sink: Arc<dyn PublishSink>,
    summarizer: Option<Arc<dyn Summarizer>>,
    clock: Clock,
}

impl fmt::Debug for DigestPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigestPipeline")
            .field("sources", &self.sources)
            .field("tz", &self.tz)
            .field("policy", &self.policy)
            .field("labels", &self.labels)
            .field("page_title_prefix", &self.page_title_prefix)
            .field("summarizer", &self.summarizer.is_some())
            .finish()
    }
}

impl DigestPipeline {
    /// Create a pipeline with default window policy, Korean holidays and labels.
    pub fn new(
        fetcher: FeedFetcher,
        sources: Vec<FeedSource>,
        tz: Tz,
        credentials: Arc<CredentialStore>,
        sink: Arc<dyn PublishSink>,
    ) -> Self {
        Self {
            fetcher,
            sources,
            tz,
            policy: WindowPolicy::default(),
            holidays: Arc::new(crate::calendar::KoreanHolidays::new()),
            labels: Labels::default(),
            page_title_prefix: "뉴스 업데이트".to_string(),
            credentials,
            sink,
            summarizer: None,
            clock: Arc::new(Utc::now),
        }
    }

    /// Build the pipeline described by `config`, publishing through Dooray.
    pub fn from_config(config: &Config, credentials: Arc<CredentialStore>) -> Result<Self> {
        let fetcher = FeedFetcher::new(&config.fetch)?;
        let sink = Arc::new(DoorayClient::new(&config.dooray)?);

        Ok(Self::new(
            fetcher,
            config.feeds.clone(),
            config.digest.tz()?,
            credentials,
            sink,
        )
        .with_policy(config.digest.window_policy()?)
        .with_holidays(Arc::new(config.calendar.holidays()))
        .with_labels(config.digest.labels())
        .with_page_title_prefix(config.digest.page_title_prefix.clone()))
    }

    /// Set the window policy.
    pub fn with_policy(mut self, policy: WindowPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the holiday calendar.
    pub fn with_holidays(mut self, holidays: Arc<dyn HolidayCalendar>) -> Self {
        self.holidays = holidays;
        self
    }

    /// Set the document labels.
    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    /// Set the published page subject prefix.
    pub fn with_page_title_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.page_title_prefix = prefix.into();
        self
    }

    /// Install a summarizer. It is only used for tasks that ask for it.
    pub fn with_summarizer(mut self, summarizer: Arc<dyn Summarizer>) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    /// Replace the wall clock behind [`DigestPipeline::now`].
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Reference timezone.
    pub fn tz(&self) -> Tz {
        self.tz
    }

    /// Configured feed sources.
    pub fn sources(&self) -> &[FeedSource] {
        &self.sources
    }

    /// Credential store used for publishing.
    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Current instant in the reference timezone.
    pub fn now(&self) -> DateTime<Tz> {
        (self.clock)().with_timezone(&self.tz)
    }

    /// Resolve the digest window for `now`.
    pub fn resolve_window(&self, now: DateTime<Tz>) -> Result<DateWindow> {
        resolve_window(now, self.holidays.as_ref(), &self.policy)
    }

    /// Fetch and normalize every source, one after another.
    pub async fn collect(&self) -> Vec<NewsItem> {
        fetch_and_normalize(&self.fetcher, &self.sources, self.tz).await
    }

    /// Run the whole pipeline for `task` at `now`.
    ///
    /// With no task, or a task without a complete target, the rendered
    /// markdown is returned as the message.
    pub async fn run(&self, now: DateTime<Tz>, task: Option<&TaskSetting>) -> RunOutcome {
        let window = match self.resolve_window(now) {
            Ok(window) => window,
            Err(e) => {
                error!("Failed to resolve digest window: {}", e);
                return RunOutcome::failed(FailedAt::Window, e.to_string());
            }
        };

        let items = self.collect().await;
        self.finish(now, window, items, task).await
    }

    /// Run every stage after fetching on already collected items.
    ///
    /// The scheduler fetches once per cycle and calls this for each task.
    pub async fn run_with_items(
        &self,
        now: DateTime<Tz>,
        items: &[NewsItem],
        task: Option<&TaskSetting>,
    ) -> RunOutcome {
        let window = match self.resolve_window(now) {
            Ok(window) => window,
            Err(e) => {
                error!("Failed to resolve digest window: {}", e);
                return RunOutcome::failed(FailedAt::Window, e.to_string());
            }
        };

        self.finish(now, window, items.to_vec(), task).await
    }

    async fn finish(
        &self,
        now: DateTime<Tz>,
        window: DateWindow,
        items: Vec<NewsItem>,
        task: Option<&TaskSetting>,
    ) -> RunOutcome {
        if items.is_empty() {
            warn!("No items collected from any source");
            return RunOutcome::failed(FailedAt::Fetched, NO_NEWS_MESSAGE);
        }
        let collected = items.len();

        let grouped = filter_and_group(items, window.start_cutoff);
        if grouped.is_empty() {
            info!(collected, cutoff = %window.start_cutoff, "No items after cutoff");
            return RunOutcome::failed(
                FailedAt::Filtered,
                format!("no news published since {}", window.start_cutoff),
            );
        }
        info!(
            collected,
            kept = grouped.item_count(),
            sources = grouped.groups().len(),
            "Filtered items"
        );

        let hook = match (task, self.summarizer.as_deref()) {
            (Some(task), Some(summarizer)) if task.wants_summary() => Some(SummaryHook {
                summarizer,
                prompt: task.gpt_prompt.as_str(),
            }),
            _ => None,
        };
        let document = render(&grouped, window.start_date, now, &self.labels, hook);

        let target = task.map(TaskSetting::publish_target);
        let target = match target {
            Some(target) if target.is_complete() => target,
            _ => {
                return RunOutcome {
                    success: true,
                    message: document.body.clone(),
                    stage: RunStage::ReturnedDocument,
                    document: Some(document),
                    page_id: None,
                };
            }
        };

        let subject = page_subject(&self.page_title_prefix, now.date_naive());
        match self.publish(&target, &subject, &document.body).await {
            Ok(receipt) => {
                info!(
                    wiki_id = %target.wiki_id,
                    page_id = ?receipt.page_id,
                    subject = %subject,
                    "Published digest"
                );
                RunOutcome {
                    success: true,
                    message: format!("published '{}'", subject),
                    stage: RunStage::Published,
                    document: Some(document),
                    page_id: receipt.page_id,
                }
            }
            Err(e) => {
                error!(user = %target.user_name, "Failed to publish digest: {}", e);
                let at = match e {
                    crate::DigestError::Credential(_) => FailedAt::Credential,
                    _ => FailedAt::Publish,
                };
                RunOutcome {
                    document: Some(document),
                    ..RunOutcome::failed(at, e.to_string())
                }
            }
        }
    }

    /// Publish arbitrary markdown under `target` with the user's token.
    ///
    /// Fails with a credential error before any request is made when the
    /// user has no token.
    pub async fn publish(
        &self,
        target: &PublishTarget,
        subject: &str,
        content: &str,
    ) -> Result<PublishReceipt> {
        let token = self.credentials.token_for(&target.user_name)?;
        let draft = WikiPageDraft {
            wiki_id: target.wiki_id.clone(),
            parent_page_id: target.parent_page_id.clone(),
            subject: subject.to_string(),
            content: content.to_string(),
        };
        self.sink.create_page(token, &draft).await
    }
}
