//! Response DTOs for the admin API.

use serde::Serialize;

use crate::publish::WikiPageSummary;
use crate::task::TaskSetting;

/// Generic API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// A stored task with its name.
#[derive(Debug, Serialize)]
pub struct TaskResponse {
    /// Task name.
    pub name: String,
    /// Stored fields.
    #[serde(flatten)]
    pub setting: TaskSetting,
}

impl From<TaskSetting> for TaskResponse {
    fn from(setting: TaskSetting) -> Self {
        Self {
            name: setting.setting_name.clone(),
            setting,
        }
    }
}

/// The single top page of a wiki and the pages directly under it.
#[derive(Debug, Serialize)]
pub struct PageTreeResponse {
    pub top: WikiPageSummary,
    pub children: Vec<WikiPageSummary>,
}

/// Result of a manual send.
#[derive(Debug, Serialize)]
pub struct SendResponse {
    /// Subject of the created page.
    pub subject: String,
    /// Id of the created page, when the wiki reported one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_response_flattens_setting() {
        let setting = TaskSetting {
            setting_name: "daily".to_string(),
            user_name: "kim".to_string(),
            wiki_id: "w1".to_string(),
            page_id: "p1".to_string(),
            ..TaskSetting::default()
        };
        let json = serde_json::to_value(ApiResponse::new(TaskResponse::from(setting))).unwrap();

        assert_eq!(json["data"]["name"], "daily");
        assert_eq!(json["data"]["wiki_id"], "w1");
        assert_eq!(json["data"]["use_gpt"], false);
        assert!(json["data"].get("setting_name").is_none());
    }
}
