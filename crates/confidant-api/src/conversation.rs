use serde::ser::{Serialize, SerializeMap, Serializer};

use confidant_assistants::ThreadMessage;

/// Thread history grouped by speaker role
///
/// Roles keep the order in which they first spoke; each role's list keeps
/// that role's messages in chronological order. Interleaving between roles
/// is not preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversation {
    groups: Vec<(String, Vec<String>)>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group messages (given oldest first) by role
    ///
    /// Only the first content block counts. A message whose first block is not
    /// text contributes an empty string.
    pub fn from_messages<'a>(messages: impl IntoIterator<Item = &'a ThreadMessage>) -> Self {
        let mut conversation = Self::new();
        for message in messages {
            conversation.push(
                message.role.as_str(),
                message.first_text().unwrap_or_default(),
            );
        }
        conversation
    }

    pub fn push(&mut self, role: &str, text: impl Into<String>) {
        match self.groups.iter_mut().find(|(r, _)| r == role) {
            Some((_, texts)) => texts.push(text.into()),
            None => self.groups.push((role.to_string(), vec![text.into()])),
        }
    }

    pub fn get(&self, role: &str) -> Option<&[String]> {
        self.groups
            .iter()
            .find(|(r, _)| r == role)
            .map(|(_, texts)| texts.as_slice())
    }

    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(role, _)| role.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl Serialize for Conversation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for (role, texts) in &self.groups {
            map.serialize_entry(role, texts)?;
        }
        map.end()
    }
}

/// Messages strictly after the watermark message, or none if it is absent
pub fn messages_after<'a>(messages: &'a [ThreadMessage], watermark: &str) -> &'a [ThreadMessage] {
    match messages.iter().position(|m| m.id == watermark) {
        Some(index) => &messages[index + 1..],
        None => &[],
    }
}
