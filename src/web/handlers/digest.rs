//! Digest run, preview and manual send handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::pipeline::RunOutcome;
use crate::web::dto::{ApiResponse, SendRequest, SendResponse, ValidatedJson};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// POST /api/tasks/:name/run - Run the digest for one task now.
///
/// Pipeline failures are part of the outcome, not HTTP errors.
pub async fn run_task(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<RunOutcome>>, ApiError> {
    let task = state.store.load(&name)?;
    let now = state.pipeline.now();
    let outcome = state.pipeline.run(now, Some(&task)).await;
    tracing::info!(task = %name, success = outcome.success, "Manual digest run finished");

    Ok(Json(ApiResponse::new(outcome)))
}

/// GET /api/preview - Render the digest without publishing.
pub async fn preview(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<RunOutcome>>, ApiError> {
    let now = state.pipeline.now();
    let outcome = state.pipeline.run(now, None).await;

    Ok(Json(ApiResponse::new(outcome)))
}

/// POST /api/tasks/:name/send - Publish arbitrary markdown under a task's page.
pub async fn send_page(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    ValidatedJson(req): ValidatedJson<SendRequest>,
) -> Result<Json<ApiResponse<SendResponse>>, ApiError> {
    let task = state.store.load(&name)?;
    let target = task.publish_target();
    if !target.is_complete() {
        return Err(ApiError::unprocessable(format!(
            "task '{}' has no wiki page configured",
            name
        )));
    }

    let receipt = state
        .pipeline
        .publish(&target, &req.subject, &req.content)
        .await?;
    tracing::info!(task = %name, subject = %req.subject, "Manual page sent");

    Ok(Json(ApiResponse::new(SendResponse {
        subject: req.subject,
        page_id: receipt.page_id,
    })))
}
