use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::Result;
use crate::openai::{OpenAIAssistantsClient, DEFAULT_REQUEST_TIMEOUT};

/// Connection settings for the Assistants API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIConfig {
    pub api_key: String,
    /// Base URL for the API (optional, defaults to https://api.openai.com/v1)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Limit for a single HTTP call, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT.as_secs()
}

impl OpenAIConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Build a client from this configuration
    pub fn build_client(self) -> Result<OpenAIAssistantsClient> {
        let client = OpenAIAssistantsClient::with_timeout(
            self.api_key,
            Duration::from_secs(self.timeout_secs),
        )?;
        Ok(match self.base_url {
            Some(base_url) => client.with_base_url(base_url),
            None => client,
        })
    }
}
