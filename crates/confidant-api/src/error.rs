use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use confidant_assistants::{AssistantsError, RunStatus};

pub const MISSING_USER_TEXT: &str = "Missing 'user_text' in request";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Thread not found: {0}")]
    ThreadNotFound(String),

    /// Creating a fresh thread failed; the message is passed through verbatim
    #[error("{0}")]
    ThreadCreation(String),

    #[error("Upstream error: {0}")]
    Upstream(#[source] AssistantsError),

    #[error("Assistant run {run_id} ended with status '{status}'")]
    RunIncomplete {
        run_id: String,
        status: RunStatus,
        reason: Option<String>,
    },

    #[error("Assistant run {run_id} did not finish after {attempts} status checks")]
    RunTimedOut { run_id: String, attempts: u32 },

    #[error("Request did not finish within {0} seconds")]
    RequestTimedOut(u64),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    pub fn missing_user_text() -> Self {
        ApiError::BadRequest(MISSING_USER_TEXT.to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ThreadNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::ThreadCreation(_) | ApiError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Upstream(_) | ApiError::RunIncomplete { .. } => StatusCode::BAD_GATEWAY,
            ApiError::RunTimedOut { .. } | ApiError::RequestTimedOut(_) => {
                StatusCode::GATEWAY_TIMEOUT
            }
        }
    }
}

impl From<AssistantsError> for ApiError {
    fn from(err: AssistantsError) -> Self {
        match err {
            AssistantsError::RunIncomplete {
                run_id,
                status,
                reason,
            } => ApiError::RunIncomplete {
                run_id,
                status,
                reason,
            },
            AssistantsError::RunTimedOut { run_id, attempts } => {
                ApiError::RunTimedOut { run_id, attempts }
            }
            AssistantsError::Config(msg) => ApiError::Config(msg),
            other => ApiError::Upstream(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match &self {
            ApiError::BadRequest(_) | ApiError::ThreadNotFound(_) => json!({
                "error": self.to_string()
            }),
            ApiError::ThreadCreation(msg) => {
                tracing::error!("Thread creation failed: {}", msg);
                json!({ "error": msg })
            }
            ApiError::Upstream(e) => {
                tracing::error!("Upstream error: {}", e);
                json!({ "error": self.to_string() })
            }
            ApiError::RunIncomplete {
                run_id,
                status: run_status,
                reason,
            } => {
                tracing::error!(run_id = %run_id, status = %run_status, "Run incomplete: {:?}", reason);
                json!({
                    "error": self.to_string(),
                    "status": run_status,
                    "reason": reason,
                })
            }
            ApiError::RunTimedOut { .. } => {
                tracing::error!("Run timed out: {}", self);
                json!({ "error": self.to_string() })
            }
            ApiError::RequestTimedOut(_) => {
                tracing::error!("{}", self);
                json!({ "error": self.to_string() })
            }
            ApiError::Config(msg) => {
                tracing::error!("Config error: {}", msg);
                json!({ "error": "Configuration error" })
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
