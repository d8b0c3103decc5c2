//! Wiki publishing for pressdigest.

pub mod dooray;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use dooray::{DoorayClient, WikiPageSummary, WikiSummary};

/// Where a digest should be published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishTarget {
    /// Credential owner.
    pub user_name: String,
    /// Target wiki (workspace) id.
    pub wiki_id: String,
    /// Parent page the new page is created under.
    pub parent_page_id: String,
}

impl PublishTarget {
    /// Whether every field needed to publish is filled in.
    pub fn is_complete(&self) -> bool {
        !self.wiki_id.trim().is_empty() && !self.parent_page_id.trim().is_empty()
    }
}

/// A page about to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiPageDraft {
    pub wiki_id: String,
    pub parent_page_id: String,
    pub subject: String,
    /// Markdown content.
    pub content: String,
}

/// Result of a successful publish call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishReceipt {
    /// Id of the created page, when the sink reports one.
    pub page_id: Option<String>,
}

/// External collaborator that creates wiki pages.
#[async_trait]
pub trait PublishSink: Send + Sync {
    /// Create `draft` on behalf of the holder of `token`.
    async fn create_page(&self, token: &str, draft: &WikiPageDraft) -> Result<PublishReceipt>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(wiki: &str, page: &str) -> PublishTarget {
        PublishTarget {
            user_name: "kim".to_string(),
            wiki_id: wiki.to_string(),
            parent_page_id: page.to_string(),
        }
    }

    #[test]
    fn test_target_complete() {
        assert!(target("w1", "p1").is_complete());
    }

    #[test]
    fn test_target_incomplete() {
        assert!(!target("", "p1").is_complete());
        assert!(!target("w1", " ").is_complete());
    }
}
