//! Test helpers for integration tests.
//!
//! Starts a local axum server that serves fixture feeds and a fake Dooray
//! wiki API, so nothing in the tests touches the network.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, TimeZone};
use chrono_tz::Asia::Seoul;
use chrono_tz::Tz;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use pressdigest::config::{DoorayConfig, FetchConfig};
use pressdigest::{CredentialStore, DigestPipeline, DoorayClient, FeedFetcher, FeedSource};

/// Token the fake wiki API accepts.
pub const KIM_TOKEN: &str = "tok-kim";

/// RSS feed with one entry before and one after the Tuesday cutoff.
pub const RSS_FSC: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>금융위원회</title>
    <link>https://www.korea.kr</link>
    <description>보도자료</description>
    <item>
      <title>가계부채 점검회의 개최</title>
      <link>https://www.korea.kr/briefing/1</link>
      <pubDate>Tue, 15 Jul 2025 18:00:00 +0900</pubDate>
      <description>&lt;div&gt;&lt;img src="x.png"&gt;&lt;a href="y"&gt;Click&lt;/a&gt; 가계부채 &amp;nbsp; 현황 점검&lt;/div&gt;</description>
    </item>
    <item>
      <title>지난 회의 결과</title>
      <link>https://www.korea.kr/briefing/0</link>
      <pubDate>Tue, 15 Jul 2025 09:00:00 +0900</pubDate>
      <description>이전 자료</description>
    </item>
  </channel>
</rss>"#;

/// Atom feed with one entry after the cutoff and no summary.
pub const ATOM_MOEF: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>기획재정부</title>
  <id>urn:moef</id>
  <updated>2025-07-15T10:00:00Z</updated>
  <entry>
    <title>하반기 경제정책방향</title>
    <id>urn:moef:1</id>
    <link href="https://www.korea.kr/briefing/2"/>
    <updated>2025-07-15T10:00:00Z</updated>
  </entry>
</feed>"#;

/// A page creation request received by the fake wiki API.
#[derive(Debug, Clone)]
pub struct RecordedPage {
    pub authorization: String,
    pub wiki_id: String,
    pub body: Value,
}

/// Running fixture server.
#[derive(Clone)]
pub struct Fixture {
    pub addr: SocketAddr,
    pub created: Arc<Mutex<Vec<RecordedPage>>>,
}

impl Fixture {
    /// URL of a path on the fixture server.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Feed sources served by the fixture, in fetch order.
    pub fn sources(&self) -> Vec<FeedSource> {
        vec![
            FeedSource::new("금융위원회", self.url("/feeds/fsc.xml")),
            FeedSource::new("기획재정부", self.url("/feeds/moef.xml")),
        ]
    }

    /// Sources that all fail: one 404, one malformed.
    pub fn failing_sources(&self) -> Vec<FeedSource> {
        vec![
            FeedSource::new("없음", self.url("/feeds/missing.xml")),
            FeedSource::new("깨짐", self.url("/feeds/broken.xml")),
        ]
    }

    /// Dooray client pointed at the fake wiki API.
    pub fn dooray(&self) -> DoorayClient {
        DoorayClient::new(&DoorayConfig {
            api_base: format!("http://{}/", self.addr),
        })
        .unwrap()
    }

    /// Pages created so far.
    pub fn created_pages(&self) -> Vec<RecordedPage> {
        self.created.lock().unwrap().clone()
    }
}

/// Start the fixture server on an ephemeral port.
pub async fn start_fixture() -> Fixture {
    let created = Arc::new(Mutex::new(Vec::new()));

    let router = Router::new()
        .route("/feeds/fsc.xml", get(|| async { rss(RSS_FSC) }))
        .route("/feeds/moef.xml", get(|| async { rss(ATOM_MOEF) }))
        .route("/feeds/broken.xml", get(|| async { rss("this is not a feed") }))
        .route("/wiki/v1/wikis", get(list_wikis))
        .route(
            "/wiki/v1/wikis/:wiki_id/pages",
            get(list_pages).post(create_page),
        )
        .with_state(created.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    Fixture { addr, created }
}

/// Fixed "now": Wednesday 2025-07-16 10:30 in Seoul.
///
/// The resolved cutoff is Tuesday 2025-07-15 17:30.
pub fn now() -> DateTime<Tz> {
    Seoul.with_ymd_and_hms(2025, 7, 16, 10, 30, 0).unwrap()
}

/// Credentials with one usable user and one without a token.
pub fn credentials() -> Arc<CredentialStore> {
    Arc::new(CredentialStore::from_pairs([("김철수", KIM_TOKEN), ("이영희", "")]))
}

/// Pipeline fetching from `sources` and publishing to the fake wiki API.
pub fn pipeline(fixture: &Fixture, sources: Vec<FeedSource>) -> DigestPipeline {
    let fetcher = FeedFetcher::new(&FetchConfig::default()).unwrap();
    DigestPipeline::new(
        fetcher,
        sources,
        Seoul,
        credentials(),
        Arc::new(fixture.dooray()),
    )
}

fn rss(body: &'static str) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/xml")], body)
}

fn envelope(result: Value) -> Json<Value> {
    Json(json!({
        "header": {"isSuccessful": true, "resultCode": 0, "resultMessage": ""},
        "result": result
    }))
}

fn rejected(code: i64, message: &str) -> Json<Value> {
    Json(json!({
        "header": {"isSuccessful": false, "resultCode": code, "resultMessage": message},
        "result": null
    }))
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("dooray-api {}", KIM_TOKEN))
        .unwrap_or(false)
}

async fn list_wikis(headers: HeaderMap) -> Json<Value> {
    if !authorized(&headers) {
        return rejected(-401, "unauthorized");
    }
    envelope(json!([
        {"id": "w-news", "name": "뉴스"},
        {"id": "w-flat", "name": "평면 위키"}
    ]))
}

async fn list_pages(
    headers: HeaderMap,
    Path(wiki_id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    if !authorized(&headers) {
        return rejected(-401, "unauthorized");
    }
    match (wiki_id.as_str(), query.get("parentPageId")) {
        ("w-news", None) => envelope(json!([
            {"id": "top", "subject": "Home", "parentPageId": null}
        ])),
        ("w-news", Some(parent)) if parent == "top" => envelope(json!([
            {"id": "c1", "subject": "보도자료", "parentPageId": "top"},
            {"id": "c2", "subject": "주간 동향", "parentPageId": "top"}
        ])),
        ("w-flat", None) => envelope(json!([
            {"id": "a", "subject": "A"},
            {"id": "b", "subject": "B"}
        ])),
        _ => envelope(json!([])),
    }
}

async fn create_page(
    State(created): State<Arc<Mutex<Vec<RecordedPage>>>>,
    headers: HeaderMap,
    Path(wiki_id): Path<String>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    if wiki_id == "w-broken" {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({}))).into_response();
    }
    if wiki_id == "w-denied" {
        return rejected(-403, "no permission").into_response();
    }

    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let mut created = created.lock().unwrap();
    created.push(RecordedPage {
        authorization,
        wiki_id,
        body,
    });
    let id = format!("page-{}", created.len());

    envelope(json!({"id": id})).into_response()
}
