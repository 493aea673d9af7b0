use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    CreateMessageRequest, CreateRunRequest, ListMessagesQuery, Page, Run, Thread, ThreadMessage,
};

/// Remote capabilities of a hosted assistant service
///
/// Threads and messages are owned by the remote side; implementations only
/// request creation, retrieval and listing. Runs are asynchronous jobs that
/// callers poll with [`AssistantsClient::retrieve_run`].
#[async_trait]
pub trait AssistantsClient: Send + Sync {
    /// Create an empty thread
    async fn create_thread(&self) -> Result<Thread>;

    /// Fetch a thread by id
    async fn retrieve_thread(&self, thread_id: &str) -> Result<Thread>;

    /// Append a message to a thread
    async fn create_message(
        &self,
        thread_id: &str,
        request: CreateMessageRequest,
    ) -> Result<ThreadMessage>;

    /// List one page of a thread's messages
    async fn list_messages(
        &self,
        thread_id: &str,
        query: &ListMessagesQuery,
    ) -> Result<Page<ThreadMessage>>;

    /// Start a run against a thread
    async fn create_run(&self, thread_id: &str, request: CreateRunRequest) -> Result<Run>;

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run>;

    async fn cancel_run(&self, thread_id: &str, run_id: &str) -> Result<Run>;
}
