//! Router configuration for the admin API.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    delete_task, get_task, list_pages, list_tasks, list_users, list_wikis, preview, put_task,
    run_task, send_page, AppState,
};

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let user_routes = Router::new()
        .route("/", get(list_users))
        .route("/:user/wikis", get(list_wikis))
        .route("/:user/wikis/:wiki_id/pages", get(list_pages));

    let task_routes = Router::new()
        .route("/", get(list_tasks))
        .route("/:name", get(get_task).put(put_task).delete(delete_task))
        .route("/:name/run", post(run_task))
        .route("/:name/send", post(send_page));

    let api_routes = Router::new()
        .nest("/users", user_routes)
        .nest("/tasks", task_routes)
        .route("/preview", get(preview));

    Router::new()
        .nest("/api", api_routes)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
