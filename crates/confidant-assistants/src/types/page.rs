use serde::{Deserialize, Serialize};

/// Cursor-paginated list envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "default_object")]
    pub object: String,
    pub data: Vec<T>,
    #[serde(default)]
    pub first_id: Option<String>,
    #[serde(default)]
    pub last_id: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

fn default_object() -> String {
    "list".to_string()
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, has_more: bool) -> Self {
        Self {
            object: default_object(),
            data,
            first_id: None,
            last_id: None,
            has_more,
        }
    }

    pub fn with_cursors(mut self, first_id: Option<String>, last_id: Option<String>) -> Self {
        self.first_id = first_id;
        self.last_id = last_id;
        self
    }
}

/// Sort order by `created_at`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListOrder {
    Asc,
    Desc,
}

/// Query string of `GET /threads/{thread_id}/messages`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListMessagesQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<ListOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl ListMessagesQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn order(mut self, order: ListOrder) -> Self {
        self.order = Some(order);
        self
    }

    /// Only return messages strictly after this message id
    pub fn after(mut self, message_id: impl Into<String>) -> Self {
        self.after = Some(message_id.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}
