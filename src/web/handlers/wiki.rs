//! User and wiki browsing handlers.
//!
//! These back the task form: pick a user, one of their wikis, then the
//! parent page new digests are created under.

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::publish::WikiSummary;
use crate::web::dto::{ApiResponse, PageTreeResponse};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// GET /api/users - List user names from the credential store.
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<String>>>, ApiError> {
    let names = state
        .pipeline
        .credentials()
        .user_names()
        .into_iter()
        .map(str::to_string)
        .collect();

    Ok(Json(ApiResponse::new(names)))
}

/// GET /api/users/:user/wikis - List the wikis a user can see.
pub async fn list_wikis(
    State(state): State<Arc<AppState>>,
    Path(user): Path<String>,
) -> Result<Json<ApiResponse<Vec<WikiSummary>>>, ApiError> {
    let token = state.pipeline.credentials().token_for(&user)?;
    let wikis = state.dooray.list_wikis(token).await?;

    Ok(Json(ApiResponse::new(wikis)))
}

/// GET /api/users/:user/wikis/:wiki_id/pages - Top page and its children.
///
/// A wiki must have exactly one top page; anything else is reported as
/// unprocessable.
pub async fn list_pages(
    State(state): State<Arc<AppState>>,
    Path((user, wiki_id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<PageTreeResponse>>, ApiError> {
    let token = state.pipeline.credentials().token_for(&user)?;

    let mut top_pages = state.dooray.list_pages(token, &wiki_id, None).await?;
    if top_pages.len() != 1 {
        return Err(ApiError::unprocessable(format!(
            "wiki '{}' has {} top pages, expected exactly one",
            wiki_id,
            top_pages.len()
        )));
    }
    let top = top_pages.remove(0);

    let children = state
        .dooray
        .list_pages(token, &wiki_id, Some(&top.id))
        .await?;

    Ok(Json(ApiResponse::new(PageTreeResponse { top, children })))
}
