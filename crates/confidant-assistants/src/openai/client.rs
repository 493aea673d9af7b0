// OpenAI-specific client implementation

use crate::error::{AssistantsError, Result};
use crate::traits::AssistantsClient;
use crate::types::{
    CreateMessageRequest, CreateRunRequest, ListMessagesQuery, Page, Run, Thread, ThreadMessage,
};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const OPENAI_BETA_HEADER: &str = "openai-beta";
const ASSISTANTS_V2: &str = "assistants=v2";
/// Per-call limit applied when none is configured
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Assistants API client (HTTP direct, no SDK)
pub struct OpenAIAssistantsClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl OpenAIAssistantsClient {
    /// Create new client with API key
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_timeout(api_key, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create new client whose every HTTP call fails after `timeout`
    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let api_key = api_key.into();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|_| AssistantsError::Config("Invalid API key format".to_string()))?,
        );
        headers.insert(
            HeaderName::from_static(OPENAI_BETA_HEADER),
            HeaderValue::from_static(ASSISTANTS_V2),
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: OPENAI_API_BASE.to_string(),
        })
    }

    /// Point the client at a different API root (proxies, test servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and decode a JSON body, mapping non-success statuses
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(AssistantsError::NotFound(error_message(&body)));
        }

        if !status.is_success() {
            return Err(AssistantsError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Extract `error.message` from an API error body, falling back to the raw text
fn error_message(body: &[u8]) -> String {
    match serde_json::from_slice::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) => String::from_utf8_lossy(body).trim().to_string(),
    }
}

// ============================================================================
// TRAIT IMPLEMENTATION
// ============================================================================

#[async_trait]
impl AssistantsClient for OpenAIAssistantsClient {
    async fn create_thread(&self) -> Result<Thread> {
        let thread: Thread = self
            .send(
                self.http_client
                    .post(self.url("/threads"))
                    .json(&serde_json::json!({})),
            )
            .await?;

        tracing::debug!(thread_id = %thread.id, "Created thread");
        Ok(thread)
    }

    async fn retrieve_thread(&self, thread_id: &str) -> Result<Thread> {
        self.send(
            self.http_client
                .get(self.url(&format!("/threads/{}", thread_id))),
        )
        .await
    }

    async fn create_message(
        &self,
        thread_id: &str,
        request: CreateMessageRequest,
    ) -> Result<ThreadMessage> {
        let message: ThreadMessage = self
            .send(
                self.http_client
                    .post(self.url(&format!("/threads/{}/messages", thread_id)))
                    .json(&request),
            )
            .await?;

        tracing::debug!(thread_id, message_id = %message.id, "Created message");
        Ok(message)
    }

    async fn list_messages(
        &self,
        thread_id: &str,
        query: &ListMessagesQuery,
    ) -> Result<Page<ThreadMessage>> {
        self.send(
            self.http_client
                .get(self.url(&format!("/threads/{}/messages", thread_id)))
                .query(query),
        )
        .await
    }

    async fn create_run(&self, thread_id: &str, request: CreateRunRequest) -> Result<Run> {
        let run: Run = self
            .send(
                self.http_client
                    .post(self.url(&format!("/threads/{}/runs", thread_id)))
                    .json(&request),
            )
            .await?;

        tracing::debug!(thread_id, run_id = %run.id, status = %run.status, "Created run");
        Ok(run)
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        self.send(
            self.http_client
                .get(self.url(&format!("/threads/{}/runs/{}", thread_id, run_id))),
        )
        .await
    }

    async fn cancel_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        self.send(
            self.http_client
                .post(self.url(&format!("/threads/{}/runs/{}/cancel", thread_id, run_id))),
        )
        .await
    }
}
