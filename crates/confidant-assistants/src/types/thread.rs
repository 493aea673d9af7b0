use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Remote conversation thread
///
/// The identifier is assigned by the API; its lifetime is controlled remotely.
/// Fields not modelled here are kept in `extra` so the resource can be relayed
/// unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thread {
    pub id: String,
    #[serde(default = "default_object")]
    pub object: String,
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_resources: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_object() -> String {
    "thread".to_string()
}

impl Thread {
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.created_at, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_deserialize_minimal() {
        let thread: Thread =
            serde_json::from_str(r#"{"id": "thread_abc", "created_at": 1699012949}"#).unwrap();

        assert_eq!(thread.id, "thread_abc");
        assert_eq!(thread.object, "thread");
        assert!(thread.metadata.is_none());
        assert_eq!(
            thread.created_at_utc().unwrap().to_rfc3339(),
            "2023-11-03T12:02:29+00:00"
        );
    }

    #[test]
    fn test_thread_accepts_null_metadata() {
        let thread: Thread = serde_json::from_str(
            r#"{"id": "thread_abc", "object": "thread", "created_at": 1, "metadata": null, "tool_resources": {}}"#,
        )
        .unwrap();

        assert!(thread.metadata.is_none());
        assert!(thread.tool_resources.is_some());
        assert!(thread.extra.is_empty());
    }

    #[test]
    fn test_thread_keeps_unmodelled_fields() {
        let raw = serde_json::json!({
            "id": "thread_abc",
            "object": "thread",
            "created_at": 1,
            "metadata": {"topic": "sleep"},
            "vector_store_hint": {"enabled": true}
        });

        let thread: Thread = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(thread.extra["vector_store_hint"]["enabled"], true);
        assert_eq!(serde_json::to_value(&thread).unwrap(), raw);
    }
}
