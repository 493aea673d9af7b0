use std::sync::Arc;

use confidant_assistants::{
    ensure_completed, list_all_messages, wait_on_run, AssistantsClient, AssistantsError,
    CreateMessageRequest, CreateRunRequest, PollConfig, Thread, ThreadMessage,
};

use crate::config::Config;
use crate::conversation::{messages_after, Conversation};
use crate::error::{ApiError, ApiResult};

/// Run parameters fixed at startup
#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub assistant_id: Option<String>,
    pub instructions: String,
    pub poll: PollConfig,
    pub history_page_size: u32,
}

impl ChatSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            assistant_id: config.assistant_id.clone(),
            instructions: config.assistants.instructions.clone(),
            poll: config.poll_config(),
            history_page_size: config.assistants.history_page_size,
        }
    }
}

/// Result of one chat turn
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub thread_id: String,
    pub conversation: Conversation,
}

/// Orchestrates threads, messages and runs on the remote assistant service
#[derive(Clone)]
pub struct ChatService {
    client: Arc<dyn AssistantsClient>,
    settings: ChatSettings,
}

impl ChatService {
    pub fn new(client: Arc<dyn AssistantsClient>, settings: ChatSettings) -> Self {
        Self { client, settings }
    }

    pub fn settings(&self) -> &ChatSettings {
        &self.settings
    }

    /// Send one user message and return the whole thread grouped by role
    pub async fn chat(&self, thread_id: Option<&str>, user_text: &str) -> ApiResult<ChatTurn> {
        let thread_id = self.resolve_thread(thread_id).await?;
        let watermark = self.submit_turn(&thread_id, user_text).await?;

        let history = self.history(&thread_id).await?;
        if let Some(reply) = messages_after(&history, &watermark.id)
            .iter()
            .rev()
            .find_map(|m| m.first_text())
        {
            tracing::debug!(thread_id = %thread_id, reply_len = reply.len(), "Assistant replied");
        }

        Ok(ChatTurn {
            conversation: Conversation::from_messages(&history),
            thread_id,
        })
    }

    /// Use the given thread id as-is, or create a fresh thread when absent
    pub async fn resolve_thread(&self, thread_id: Option<&str>) -> ApiResult<String> {
        match thread_id.filter(|id| !id.is_empty()) {
            Some(id) => Ok(id.to_string()),
            None => {
                let thread = self
                    .client
                    .create_thread()
                    .await
                    .map_err(|e| ApiError::ThreadCreation(e.to_string()))?;
                tracing::info!(
                    thread_id = %thread.id,
                    created_at = ?thread.created_at_utc(),
                    "Created new thread"
                );
                Ok(thread.id)
            }
        }
    }

    /// Post the user message, start a run and wait for it to complete
    ///
    /// Returns the posted message, whose id marks where this turn began.
    pub async fn submit_turn(&self, thread_id: &str, user_text: &str) -> ApiResult<ThreadMessage> {
        let thread = self.thread(thread_id).await?;

        let message = self
            .client
            .create_message(&thread.id, CreateMessageRequest::user(user_text))
            .await
            .map_err(|e| not_found_as_thread(e, &thread.id))?;

        let assistant_id = self
            .settings
            .assistant_id
            .as_deref()
            .ok_or_else(|| ApiError::Config("OPENAI_ASSISTANT_ID is not set".to_string()))?;

        let run = self
            .client
            .create_run(
                &thread.id,
                CreateRunRequest::new(assistant_id)
                    .with_instructions(self.settings.instructions.as_str()),
            )
            .await?;
        tracing::debug!(thread_id = %thread.id, run_id = %run.id, message_id = %message.id, "Run started");

        let run = wait_on_run(self.client.as_ref(), run, &self.settings.poll).await?;
        ensure_completed(run)?;

        Ok(message)
    }

    /// Full thread history, oldest first
    pub async fn history(&self, thread_id: &str) -> ApiResult<Vec<ThreadMessage>> {
        list_all_messages(
            self.client.as_ref(),
            thread_id,
            self.settings.history_page_size,
        )
        .await
        .map_err(|e| not_found_as_thread(e, thread_id))
    }

    pub async fn thread(&self, thread_id: &str) -> ApiResult<Thread> {
        self.client
            .retrieve_thread(thread_id)
            .await
            .map_err(|e| not_found_as_thread(e, thread_id))
    }
}

fn not_found_as_thread(err: AssistantsError, thread_id: &str) -> ApiError {
    if err.is_not_found() {
        ApiError::ThreadNotFound(thread_id.to_string())
    } else {
        err.into()
    }
}
