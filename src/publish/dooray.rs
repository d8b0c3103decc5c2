//! Dooray wiki API client.
//!
//! Every response is wrapped in an envelope whose `header.isSuccessful`
//! flag has to be checked in addition to the HTTP status.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::config::DoorayConfig;
use crate::error::{DigestError, Result};
use crate::publish::{PublishReceipt, PublishSink, WikiPageDraft};

/// Markdown mime type accepted by the wiki API.
const MARKDOWN_MIME_TYPE: &str = "text/x-markdown";

/// Request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseHeader {
    is_successful: bool,
    #[serde(default)]
    result_code: i64,
    #[serde(default)]
    result_message: String,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    header: ResponseHeader,
    result: Option<T>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreatePageRequest<'a> {
    parent_page_id: &'a str,
    subject: &'a str,
    body: PageBody<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PageBody<'a> {
    mime_type: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreatedPage {
    id: Option<String>,
}

/// A wiki visible to the token holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WikiSummary {
    pub id: String,
    pub name: String,
}

/// A wiki page as listed by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WikiPageSummary {
    pub id: String,
    pub subject: String,
    #[serde(default)]
    pub parent_page_id: Option<String>,
}

/// HTTP client for the Dooray wiki API.
#[derive(Debug, Clone)]
pub struct DoorayClient {
    client: Client,
    api_base: Url,
}

impl DoorayClient {
    /// Create a client for the configured API base URL.
    pub fn new(config: &DoorayConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| DigestError::Publish(format!("failed to create HTTP client: {}", e)))?;

        let api_base = Url::parse(&config.api_base)
            .map_err(|e| DigestError::Config(format!("invalid Dooray API base: {}", e)))?;
        if api_base.cannot_be_a_base() {
            return Err(DigestError::Config(format!(
                "invalid Dooray API base: {}",
                config.api_base
            )));
        }

        Ok(Self { client, api_base })
    }

    /// URL of `segments` under the API base. Each segment is percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| DigestError::Config("invalid Dooray API base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// List the wikis the token holder can see.
    pub async fn list_wikis(&self, token: &str) -> Result<Vec<WikiSummary>> {
        let url = self.endpoint(&["wiki", "v1", "wikis"])?;
        let wikis: Option<Vec<WikiSummary>> = self.send(self.client.get(url), token).await?;
        Ok(wikis.unwrap_or_default())
    }

    /// List pages of a wiki: its top-level pages, or the children of `parent_page_id`.
    pub async fn list_pages(
        &self,
        token: &str,
        wiki_id: &str,
        parent_page_id: Option<&str>,
    ) -> Result<Vec<WikiPageSummary>> {
        let url = self.endpoint(&["wiki", "v1", "wikis", wiki_id, "pages"])?;
        let mut request = self.client.get(url);
        if let Some(parent) = parent_page_id {
            request = request.query(&[("parentPageId", parent)]);
        }
        let pages: Option<Vec<WikiPageSummary>> = self.send(request, token).await?;
        Ok(pages.unwrap_or_default())
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        token: &str,
    ) -> Result<Option<T>> {
        let response = request
            .header(reqwest::header::AUTHORIZATION, format!("dooray-api {}", token))
            .send()
            .await
            .map_err(|e| DigestError::Publish(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DigestError::Publish(format!("HTTP error: {}", status)));
        }

        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| DigestError::Publish(format!("invalid response: {}", e)))?;

        if !envelope.header.is_successful {
            return Err(DigestError::Publish(format!(
                "API error {}: {}",
                envelope.header.result_code, envelope.header.result_message
            )));
        }

        Ok(envelope.result)
    }
}

#[async_trait]
impl PublishSink for DoorayClient {
    async fn create_page(&self, token: &str, draft: &WikiPageDraft) -> Result<PublishReceipt> {
        let url = self.endpoint(&["wiki", "v1", "wikis", &draft.wiki_id, "pages"])?;
        let body = CreatePageRequest {
            parent_page_id: &draft.parent_page_id,
            subject: &draft.subject,
            body: PageBody {
                mime_type: MARKDOWN_MIME_TYPE,
                content: &draft.content,
            },
        };

        debug!(wiki_id = %draft.wiki_id, subject = %draft.subject, "Creating wiki page");
        let created: Option<CreatedPage> = self
            .send(self.client.post(url).json(&body), token)
            .await?;
        let page_id = created.and_then(|page| page.id);
        info!(wiki_id = %draft.wiki_id, page_id = ?page_id, "Created wiki page");

        Ok(PublishReceipt { page_id })
    }
}
