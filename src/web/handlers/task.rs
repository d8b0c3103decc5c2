//! Task setting handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::web::dto::{ApiResponse, TaskRequest, TaskResponse, ValidatedJson};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// GET /api/tasks - List stored tasks in name order.
pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<TaskResponse>>>, ApiError> {
    let tasks = state.store.list()?;
    let responses = tasks.into_iter().map(TaskResponse::from).collect();

    Ok(Json(ApiResponse::new(responses)))
}

/// GET /api/tasks/:name - Get one task.
pub async fn get_task(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<TaskResponse>>, ApiError> {
    let task = state.store.load(&name)?;

    Ok(Json(ApiResponse::new(task.into())))
}

/// PUT /api/tasks/:name - Create or replace a task.
pub async fn put_task(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    ValidatedJson(req): ValidatedJson<TaskRequest>,
) -> Result<Json<ApiResponse<TaskResponse>>, ApiError> {
    let setting = req.into_setting(&name);
    let path = state.store.save(&name, &setting)?;
    tracing::info!(task = %name, path = %path.display(), "Task setting saved");

    Ok(Json(ApiResponse::new(setting.into())))
}

/// DELETE /api/tasks/:name - Delete a task.
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if !state.store.delete(&name)? {
        return Err(ApiError::not_found(format!("task '{}' not found", name)));
    }
    tracing::info!(task = %name, "Task setting deleted");

    Ok(Json(ApiResponse::new(())))
}
