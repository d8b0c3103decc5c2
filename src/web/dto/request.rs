//! Request DTOs for the admin API.

use serde::Deserialize;
use validator::Validate;

use super::validation::{no_control_chars, not_empty_trimmed, required_text};
use crate::task::TaskSetting;

/// Create or replace a task setting.
#[derive(Debug, Deserialize, Validate)]
pub struct TaskRequest {
    /// Credential owner.
    #[validate(custom(function = "required_text"))]
    pub user_name: String,
    /// Target wiki id.
    #[validate(custom(function = "required_text"))]
    pub wiki_id: String,
    /// Parent page id.
    #[validate(custom(function = "required_text"))]
    pub page_id: String,
    /// Display title of the parent page.
    #[serde(default)]
    #[validate(custom(function = "no_control_chars"))]
    pub page_title: String,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub naver_news_search_term: String,
    /// Run item summaries through the summarizer.
    #[serde(default)]
    pub use_gpt: bool,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub gpt_prompt: String,
}

impl TaskRequest {
    /// Convert into a stored setting named `name`.
    pub fn into_setting(self, name: &str) -> TaskSetting {
        TaskSetting {
            setting_name: name.to_string(),
            user_name: self.user_name.trim().to_string(),
            wiki_id: self.wiki_id.trim().to_string(),
            page_id: self.page_id.trim().to_string(),
            page_title: self.page_title,
            naver_news_search_term: self.naver_news_search_term,
            use_gpt: self.use_gpt,
            gpt_prompt: self.gpt_prompt,
        }
    }
}

/// Manual send of an arbitrary markdown page.
#[derive(Debug, Deserialize, Validate)]
pub struct SendRequest {
    /// Page subject.
    #[validate(length(max = 200), custom(function = "required_text"))]
    pub subject: String,
    /// Markdown body.
    #[validate(custom(function = "not_empty_trimmed"))]
    pub content: String,
}
