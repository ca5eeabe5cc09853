#[cfg(test)]
#[path = "message_test.rs"]
mod tests;
use serde_derive::Deserialize;
use serde_derive::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Local-only flag. Error messages are notices the engine itself injects into
/// a transcript, e.g. when a stream dies; they never travel over the wire.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MessageKind {
    #[default]
    Normal,
    Error,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub content: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default)]
    pub is_streaming: bool,
    #[serde(skip)]
    kind: MessageKind,
}

impl Message {
    pub fn new(role: Role, content: &str, session_id: &str) -> Message {
        return Message {
            content: content.to_string(),
            role,
            session_id: Some(session_id.to_string()),
            is_streaming: false,
            kind: MessageKind::Normal,
        };
    }

    /// An empty assistant message that accumulates a reply while its stream is
    /// live. Exactly one may exist per session at a time.
    pub fn streaming_placeholder(session_id: &str) -> Message {
        return Message {
            content: String::new(),
            role: Role::Assistant,
            session_id: Some(session_id.to_string()),
            is_streaming: true,
            kind: MessageKind::Normal,
        };
    }

    pub fn error(content: &str, session_id: &str) -> Message {
        return Message {
            content: content.to_string(),
            role: Role::System,
            session_id: Some(session_id.to_string()),
            is_streaming: false,
            kind: MessageKind::Error,
        };
    }

    pub fn kind(&self) -> MessageKind {
        return self.kind;
    }
}
