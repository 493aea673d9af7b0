use axum::Json;
use utoipa::OpenApi;

use super::{chat, health, threads};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::liveness,
        health::health_check,
        chat::chat,
        threads::get_thread,
    ),
    components(schemas(chat::ChatRequest, chat::ChatResponse, health::HealthResponse)),
    tags(
        (name = "health", description = "Liveness and readiness"),
        (name = "chat", description = "Chat with the assistant"),
        (name = "threads", description = "Remote conversation threads")
    )
)]
pub struct ApiDoc;

/// OpenAPI document for this service
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
