use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::time::Duration;

use crate::error::ApiError;

/// Request deadline middleware
///
/// Answers with a JSON 504 once `limit` has passed instead of leaving the
/// client with an empty body.
pub async fn enforce_deadline(State(limit): State<Duration>, req: Request, next: Next) -> Response {
    match tokio::time::timeout(limit, next.run(req)).await {
        Ok(response) => response,
        Err(_) => ApiError::RequestTimedOut(limit.as_secs()).into_response(),
    }
}
