//! Admin API tests.
//!
//! The router runs in-process through axum-test; wiki calls and feeds go
//! to the local fixture server.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::{Asia::Seoul, Tz};
use common::{now, pipeline, start_fixture, Fixture};
use pressdigest::web::{create_router, AppState};
use pressdigest::TaskStore;
use serde_json::{json, Value};
use tempfile::TempDir;

struct TestApp {
    server: TestServer,
    fixture: Fixture,
    store: TaskStore,
    _dir: TempDir,
}

async fn create_test_app() -> TestApp {
    create_test_app_at(now()).await
}

/// App whose pipeline clock is frozen at `at`.
async fn create_test_app_at(at: DateTime<Tz>) -> TestApp {
    let fixture = start_fixture().await;
    let dir = TempDir::new().unwrap();
    let store = TaskStore::new(dir.path().join("task_list"));

    let frozen = at.with_timezone(&Utc);
    let digest = pipeline(&fixture, fixture.sources()).with_clock(Arc::new(move || frozen));
    let app_state = Arc::new(AppState::new(
        Arc::new(digest),
        store.clone(),
        fixture.dooray(),
    ));
    let server = TestServer::new(create_router(app_state)).unwrap();

    TestApp {
        server,
        fixture,
        store,
        _dir: dir,
    }
}

fn task_body() -> Value {
    json!({
        "user_name": "김철수",
        "wiki_id": "w-news",
        "page_id": "c1",
        "page_title": "Home > 보도자료",
        "naver_news_search_term": "금리 | 환율",
        "use_gpt": false,
        "gpt_prompt": ""
    })
}

// ============================================================================
// Users and wikis
// ============================================================================

#[tokio::test]
async fn test_list_users_never_exposes_tokens() {
    let app = create_test_app().await;

    let response = app.server.get("/api/users").await;
    response.assert_status_ok();
    let body: Value = response.json();

    assert_eq!(body["data"], json!(["김철수", "이영희"]));
    assert!(!response.text().contains("tok-kim"));
}

#[tokio::test]
async fn test_list_wikis() {
    let app = create_test_app().await;

    let response = app.server.get("/api/users/김철수/wikis").await;
    response.assert_status_ok();
    let body: Value = response.json();

    assert_eq!(body["data"][0]["id"], "w-news");
    assert_eq!(body["data"][0]["name"], "뉴스");
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_list_wikis_without_token() {
    let app = create_test_app().await;

    for user in ["이영희", "unknown"] {
        let response = app.server.get(&format!("/api/users/{}/wikis", user)).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }
}

#[tokio::test]
async fn test_page_tree() {
    let app = create_test_app().await;

    let response = app.server.get("/api/users/김철수/wikis/w-news/pages").await;
    response.assert_status_ok();
    let body: Value = response.json();

    assert_eq!(body["data"]["top"]["id"], "top");
    assert_eq!(body["data"]["top"]["subject"], "Home");
    let children = body["data"]["children"].as_array().unwrap();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0]["subject"], "보도자료");
    assert_eq!(children[0]["parentPageId"], "top");
}

#[tokio::test]
async fn test_page_tree_requires_single_top_page() {
    let app = create_test_app().await;

    for wiki in ["w-flat", "w-empty"] {
        let response = app
            .server
            .get(&format!("/api/users/김철수/wikis/{}/pages", wiki))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }
}

// ============================================================================
// Task settings
// ============================================================================

#[tokio::test]
async fn test_task_crud_flow() {
    let app = create_test_app().await;

    // Empty to start with
    let response = app.server.get("/api/tasks").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"], json!([]));

    // Create
    let response = app.server.put("/api/tasks/daily").json(&task_body()).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["name"], "daily");
    assert_eq!(body["data"]["wiki_id"], "w-news");

    // Stored on disk in the task file format
    let stored = app.store.load("daily").unwrap();
    assert_eq!(stored.user_name, "김철수");
    assert_eq!(stored.naver_news_search_term, "금리 | 환율");

    // Read back
    let response = app.server.get("/api/tasks/daily").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["page_title"], "Home > 보도자료");

    // Replace
    let mut updated = task_body();
    updated["page_id"] = json!("c2");
    app.server
        .put("/api/tasks/daily")
        .json(&updated)
        .await
        .assert_status_ok();
    assert_eq!(app.store.load("daily").unwrap().page_id, "c2");

    // List
    let body: Value = app.server.get("/api/tasks").await.json();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // Delete
    app.server.delete("/api/tasks/daily").await.assert_status_ok();
    app.server
        .get("/api/tasks/daily")
        .await
        .assert_status(StatusCode::NOT_FOUND);
    app.server
        .delete("/api/tasks/daily")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_put_task_validation() {
    let app = create_test_app().await;

    let mut body = task_body();
    body["wiki_id"] = json!("  ");
    let response = app.server.put("/api/tasks/daily").json(&body).await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["details"]["wiki_id"].is_array());

    assert!(app.store.names().unwrap().is_empty());
}

#[tokio::test]
async fn test_put_task_bad_name() {
    let app = create_test_app().await;

    let name = "a".repeat(101);
    let response = app
        .server
        .put(&format!("/api/tasks/{}", name))
        .json(&task_body())
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_put_task_invalid_json() {
    let app = create_test_app().await;

    let response = app
        .server
        .put("/api/tasks/daily")
        .json(&json!({"user_name": "김철수"}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

// ============================================================================
// Runs, previews and manual sends
// ============================================================================

#[tokio::test]
async fn test_preview() {
    let app = create_test_app().await;

    let response = app.server.get("/api/preview").await;
    response.assert_status_ok();
    let body: Value = response.json();

    assert_eq!(body["data"]["success"], true);
    assert_eq!(body["data"]["stage"]["stage"], "returned_document");
    assert_eq!(body["data"]["document"]["title"], "250715~250716 보도자료");
    let markdown = body["data"]["message"].as_str().unwrap();
    assert!(markdown.starts_with("# 250715~250716 보도자료\n\n## 금융위원회\n"));
    assert!(markdown.contains("**하반기 경제정책방향**"));
    assert_eq!(body["data"]["document"]["body"], markdown);
    assert!(app.fixture.created_pages().is_empty());
}

#[tokio::test]
async fn test_preview_after_quiet_day() {
    // Friday 2025-07-18: the window starts Thursday 17:30, after every fixture item
    let app = create_test_app_at(Seoul.with_ymd_and_hms(2025, 7, 18, 10, 30, 0).unwrap()).await;

    let response = app.server.get("/api/preview").await;
    response.assert_status_ok();
    let body: Value = response.json();

    assert_eq!(body["data"]["success"], false);
    assert_eq!(body["data"]["stage"]["stage"], "failed");
    assert_eq!(body["data"]["stage"]["at"], "filtered");
    assert!(body["data"]["message"]
        .as_str()
        .unwrap()
        .starts_with("no news published since"));
}

#[tokio::test]
async fn test_run_task_publishes_page() {
    let app = create_test_app().await;
    app.server
        .put("/api/tasks/daily")
        .json(&task_body())
        .await
        .assert_status_ok();

    let response = app.server.post("/api/tasks/daily/run").await;
    response.assert_status_ok();
    let body: Value = response.json();

    assert_eq!(body["data"]["success"], true, "{}", body["data"]["message"]);
    assert_eq!(body["data"]["stage"]["stage"], "published");
    assert_eq!(body["data"]["page_id"], "page-1");

    let pages = app.fixture.created_pages();
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].wiki_id, "w-news");
    assert_eq!(pages[0].body["parentPageId"], "c1");
    assert_eq!(pages[0].body["subject"], "뉴스 업데이트 2025-07-16");
    assert_eq!(
        pages[0].body["body"]["content"],
        body["data"]["document"]["body"]
    );
}

#[tokio::test]
async fn test_run_missing_task() {
    let app = create_test_app().await;
    app.server
        .post("/api/tasks/nope/run")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_manual_send() {
    let app = create_test_app().await;
    app.server
        .put("/api/tasks/daily")
        .json(&task_body())
        .await
        .assert_status_ok();

    let response = app
        .server
        .post("/api/tasks/daily/send")
        .json(&json!({"subject": "수기 전송", "content": "# 제목\n내용을 입력하세요."}))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["subject"], "수기 전송");
    assert_eq!(body["data"]["page_id"], "page-1");

    let pages = app.fixture.created_pages();
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].body["parentPageId"], "c1");
    assert_eq!(pages[0].body["body"]["content"], "# 제목\n내용을 입력하세요.");
}

#[tokio::test]
async fn test_manual_send_rejected_by_wiki() {
    let app = create_test_app().await;
    let mut body = task_body();
    body["wiki_id"] = json!("w-denied");
    app.server
        .put("/api/tasks/daily")
        .json(&body)
        .await
        .assert_status_ok();

    let response = app
        .server
        .post("/api/tasks/daily/send")
        .json(&json!({"subject": "수기 전송", "content": "본문"}))
        .await;
    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("no permission"));
}

#[tokio::test]
async fn test_manual_send_without_token() {
    let app = create_test_app().await;
    let mut body = task_body();
    body["user_name"] = json!("이영희");
    app.server
        .put("/api/tasks/daily")
        .json(&body)
        .await
        .assert_status_ok();

    let response = app
        .server
        .post("/api/tasks/daily/send")
        .json(&json!({"subject": "수기 전송", "content": "본문"}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(app.fixture.created_pages().is_empty());
}

#[tokio::test]
async fn test_manual_send_empty_content() {
    let app = create_test_app().await;
    app.server
        .put("/api/tasks/daily")
        .json(&task_body())
        .await
        .assert_status_ok();

    let response = app
        .server
        .post("/api/tasks/daily/send")
        .json(&json!({"subject": "수기 전송", "content": "   "}))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}
