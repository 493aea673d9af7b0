use std::sync::Arc;

use confidant_assistants::AssistantsClient;

use crate::chat::{ChatService, ChatSettings};
use crate::config::Config;

/// Shared application state passed to all handlers
///
/// Built once at startup and read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub chat: ChatService,
}

impl AppState {
    pub fn new(config: Config, assistants: Arc<dyn AssistantsClient>) -> Self {
        let settings = ChatSettings::from_config(&config);
        Self {
            config: Arc::new(config),
            chat: ChatService::new(assistants, settings),
        }
    }
}
