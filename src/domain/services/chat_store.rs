#[cfg(test)]
#[path = "chat_store_test.rs"]
mod tests;

use std::collections::HashMap;

use crate::domain::models::Message;
use crate::domain::models::RequestStatus;
use crate::domain::models::Role;

/// A transcript evicted by [`ChatStore::delete_session`], held so a failed
/// remote deletion can be rolled back.
pub struct DeletedSession {
    messages: Vec<Message>,
    was_current: bool,
}

/// In-memory chat state keyed by session id.
///
/// Every operation is a synchronous, total transition from current state to
/// next state; the store performs no I/O. Streaming-related operations take
/// the target session id explicitly, so a stream keeps writing to the session
/// it was opened for even if the user repoints `current_session_id`
/// mid-flight.
#[derive(Default)]
pub struct ChatStore {
    messages_by_session: HashMap<String, Vec<Message>>,
    current_session_id: Option<String>,
    status: RequestStatus,
    error: Option<String>,
}

impl ChatStore {
    pub fn new() -> ChatStore {
        return ChatStore::default();
    }

    /// Appends to the session's transcript, creating it if absent. Existing
    /// entries are never removed or reordered.
    pub fn append_message(&mut self, session_id: &str, message: Message) {
        self.messages_by_session
            .entry(session_id.to_string())
            .or_default()
            .push(message);
    }

    /// Replaces the content of the session's in-flight message with the
    /// cumulative text supplied by the caller. No-op unless the last message
    /// in the transcript is flagged streaming.
    pub fn update_streaming_content(&mut self, session_id: &str, text: &str) {
        if let Some(messages) = self.messages_by_session.get_mut(session_id) {
            if let Some(last) = messages.last_mut() {
                if last.is_streaming {
                    last.content = text.to_string();
                }
            }
        }
    }

    /// Swaps the session's streaming placeholder for one finalized assistant
    /// message. Idempotent: when no streaming message remains, nothing is
    /// appended.
    pub fn finalize_streaming(&mut self, session_id: &str, final_text: &str) {
        if let Some(messages) = self.messages_by_session.get_mut(session_id) {
            if !messages.iter().any(|message| return message.is_streaming) {
                return;
            }

            messages.retain(|message| return !message.is_streaming);
            messages.push(Message::new(Role::Assistant, final_text, session_id));
        }
    }

    /// Swaps the session's streaming placeholder for an error notice instead
    /// of leaving it dangling after a dead stream.
    pub fn fail_streaming(&mut self, session_id: &str, notice: &str) {
        if let Some(messages) = self.messages_by_session.get_mut(session_id) {
            if !messages.iter().any(|message| return message.is_streaming) {
                return;
            }

            messages.retain(|message| return !message.is_streaming);
            messages.push(Message::error(notice, session_id));
        }
    }

    pub fn set_current_session(&mut self, session_id: &str) {
        self.current_session_id = Some(session_id.to_string());
    }

    pub fn current_session_id(&self) -> Option<&str> {
        return self.current_session_id.as_deref();
    }

    /// Removes the session's transcript, unsetting the current-session pointer
    /// when it pointed there. The evicted state is returned for rollback.
    pub fn delete_session(&mut self, session_id: &str) -> Option<DeletedSession> {
        let messages = self.messages_by_session.remove(session_id)?;

        let was_current = self.current_session_id.as_deref() == Some(session_id);
        if was_current {
            self.current_session_id = None;
        }

        return Some(DeletedSession {
            messages,
            was_current,
        });
    }

    /// Reinstates a transcript evicted by [`ChatStore::delete_session`].
    pub fn restore_session(&mut self, session_id: &str, deleted: DeletedSession) {
        self.messages_by_session
            .insert(session_id.to_string(), deleted.messages);

        if deleted.was_current {
            self.current_session_id = Some(session_id.to_string());
        }
    }

    /// Groups incoming messages by session and appends each group to its
    /// transcript. This is an append, not a replace: merging overlapping data
    /// twice duplicates entries, because the wire format carries no stable
    /// per-message identity to deduplicate on. Messages without a session id
    /// are dropped.
    pub fn merge_history(&mut self, messages: Vec<Message>) {
        for message in messages {
            if let Some(session_id) = message.session_id.clone() {
                self.messages_by_session
                    .entry(session_id)
                    .or_default()
                    .push(message);
            }
        }
    }

    pub fn set_status(&mut self, status: RequestStatus) {
        self.status = status;
    }

    pub fn status(&self) -> RequestStatus {
        return self.status;
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    pub fn error(&self) -> Option<&str> {
        return self.error.as_deref();
    }

    /// Empties the current session's transcript and resets status and error.
    pub fn clear_chat(&mut self) {
        if let Some(session_id) = &self.current_session_id {
            if let Some(messages) = self.messages_by_session.get_mut(session_id) {
                messages.clear();
            }
        }

        self.status = RequestStatus::Idle;
        self.error = None;
    }

    pub fn messages(&self, session_id: &str) -> &[Message] {
        if let Some(messages) = self.messages_by_session.get(session_id) {
            return messages;
        }

        return &[];
    }

    pub fn session_ids(&self) -> Vec<&str> {
        return self
            .messages_by_session
            .keys()
            .map(|session_id| return session_id.as_str())
            .collect();
    }

    /// The last message of every session, which is what a session drawer
    /// renders as the per-conversation preview.
    pub fn last_messages(&self) -> Vec<&Message> {
        return self
            .messages_by_session
            .values()
            .filter_map(|messages| return messages.last())
            .collect();
    }
}
