use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use confidant_assistants::Thread;
use crate::{error::ApiResult, state::AppState};

/// Get a remote thread by ID
#[utoipa::path(
    get,
    path = "/thread/{thread_id}",
    params(
        ("thread_id" = String, Path, description = "Thread ID")
    ),
    responses(
        (status = 200, description = "Thread resource as returned by the assistant service"),
        (status = 404, description = "Thread not found"),
        (status = 502, description = "Remote API failed")
    ),
    tag = "threads"
)]
pub async fn get_thread(
    State(state): State<Arc<AppState>>,
    Path(thread_id): Path<String>,
) -> ApiResult<Json<Thread>> {
    let thread = state.chat.thread(&thread_id).await?;
    Ok(Json(thread))
}
