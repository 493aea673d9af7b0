pub mod message;
pub mod page;
pub mod run;
pub mod thread;

pub use message::{CreateMessageRequest, MessageContent, MessageRole, TextContent, ThreadMessage};
pub use page::{ListMessagesQuery, ListOrder, Page};
pub use run::{CreateRunRequest, Run, RunError, RunStatus};
pub use thread::Thread;
