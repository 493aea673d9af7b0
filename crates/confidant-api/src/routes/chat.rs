use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{
    conversation::Conversation,
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChatRequest {
    pub user_text: Option<String>,
    /// Thread returned by a previous call; a new thread is created when absent
    #[serde(default)]
    pub thread_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChatResponse {
    /// Message texts grouped by role, e.g. {"user": [...], "assistant": [...]}
    #[schema(value_type = Object)]
    pub response: Conversation,
    pub thread_id: String,
}

/// Send a message to the assistant and return the thread history
#[utoipa::path(
    post,
    path = "/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Assistant replied", body = ChatResponse),
        (status = 400, description = "Missing 'user_text' in request"),
        (status = 404, description = "Thread not found"),
        (status = 500, description = "Thread creation failed"),
        (status = 502, description = "Remote API failed or run did not complete"),
        (status = 504, description = "Run did not finish in time")
    ),
    tag = "chat"
)]
pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<Json<ChatResponse>> {
    let Json(req) = payload.map_err(|rejection| {
        tracing::debug!("Rejected chat payload: {}", rejection);
        ApiError::missing_user_text()
    })?;

    let user_text = req
        .user_text
        .filter(|text| !text.is_empty())
        .ok_or_else(ApiError::missing_user_text)?;

    let turn = state.chat.chat(req.thread_id.as_deref(), &user_text).await?;

    Ok(Json(ChatResponse {
        response: turn.conversation,
        thread_id: turn.thread_id,
    }))
}
