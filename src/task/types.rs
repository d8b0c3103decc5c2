//! Task setting type.

use serde::{Deserialize, Serialize};

use crate::publish::PublishTarget;

/// One saved digest task: which wiki page to publish under, and how.
///
/// The setting name is not part of the stored JSON; it comes from the
/// file name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSetting {
    /// Name of the task (file stem without the `_data` suffix).
    #[serde(skip)]
    pub setting_name: String,
    /// Credential owner used to publish.
    #[serde(default)]
    pub user_name: String,
    /// Target wiki id.
    #[serde(default)]
    pub wiki_id: String,
    /// Parent page id.
    #[serde(default)]
    pub page_id: String,
    /// Display title of the parent page.
    #[serde(default)]
    pub page_title: String,
    /// Saved news search expression. Stored and returned, not used by the digest.
    #[serde(default)]
    pub naver_news_search_term: String,
    /// Whether item summaries should go through the summarizer.
    #[serde(default)]
    pub use_gpt: bool,
    /// Prompt handed to the summarizer.
    #[serde(default)]
    pub gpt_prompt: String,
}

impl TaskSetting {
    /// Publish target described by this setting.
    pub fn publish_target(&self) -> PublishTarget {
        PublishTarget {
            user_name: self.user_name.clone(),
            wiki_id: self.wiki_id.clone(),
            parent_page_id: self.page_id.clone(),
        }
    }

    /// Whether the summarizer should be used for this task.
    pub fn wants_summary(&self) -> bool {
        self.use_gpt && !self.gpt_prompt.trim().is_empty()
    }
}
