use thiserror::Error;

use crate::types::RunStatus;

#[derive(Error, Debug)]
pub enum AssistantsError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OpenAI API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Run {run_id} finished with status '{status}'")]
    RunIncomplete {
        run_id: String,
        status: RunStatus,
        reason: Option<String>,
    },

    #[error("Run {run_id} still pending after {attempts} status checks")]
    RunTimedOut { run_id: String, attempts: u32 },

    #[error("Invalid client configuration: {0}")]
    Config(String),
}

impl AssistantsError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, AssistantsError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, AssistantsError>;
