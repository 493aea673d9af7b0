pub mod config;
pub mod error;
pub mod history;
pub mod openai;
pub mod polling;
pub mod traits;
pub mod types;

pub use config::OpenAIConfig;
pub use error::{AssistantsError, Result};
pub use history::list_all_messages;
pub use openai::OpenAIAssistantsClient;
pub use polling::{ensure_completed, wait_on_run, PollConfig};
pub use traits::AssistantsClient;
pub use types::{
    CreateMessageRequest, CreateRunRequest, ListMessagesQuery, ListOrder, MessageContent,
    MessageRole, Page, Run, RunError, RunStatus, TextContent, Thread, ThreadMessage,
};
