#[cfg(test)]
#[path = "chat_service_test.rs"]
mod tests;

use tokio::sync::mpsc;
use uuid::Uuid;

use super::ChatStore;
use crate::domain::models::Message;
use crate::domain::models::RequestStatus;
use crate::domain::models::Role;
use crate::domain::models::StreamEvent;
use crate::domain::models::TransportBox;

const STREAM_FAILURE_NOTICE: &str = "Failed to connect to the chat service";
const HISTORY_FAILURE_NOTICE: &str = "Failed to fetch chat history";
const DELETE_FAILURE_NOTICE: &str = "Failed to delete chat history";

/// Coordinates the store and the transport.
///
/// Every method is one asynchronous unit of work running on a single logical
/// thread: store mutations only happen between suspension points, through the
/// store's discrete transition functions. Transport failures never escape;
/// they are converted into store status/error updates here, at the boundary.
pub struct ChatService {
    store: ChatStore,
    transport: TransportBox,
}

impl ChatService {
    pub fn new(transport: TransportBox) -> ChatService {
        return ChatService {
            store: ChatStore::new(),
            transport,
        };
    }

    pub fn store(&self) -> &ChatStore {
        return &self.store;
    }

    pub fn store_mut(&mut self) -> &mut ChatStore {
        return &mut self.store;
    }

    pub fn select_session(&mut self, session_id: &str) {
        self.store.set_current_session(session_id);
    }

    /// Returns the current session id, generating and installing a fresh one
    /// when none is set. Sessions are materialized lazily: the id exists
    /// before any message is stored under it.
    pub fn ensure_session(&mut self) -> String {
        if let Some(session_id) = self.store.current_session_id() {
            return session_id.to_string();
        }

        let session_id = Uuid::new_v4().to_string();
        self.store.set_current_session(&session_id);

        return session_id;
    }

    /// Sends one user message and streams the assistant reply into the store.
    ///
    /// The target session id is bound before the stream opens and threaded
    /// through every store call, so repointing the current session mid-stream
    /// cannot redirect chunks into the wrong transcript.
    pub async fn send_message(&mut self, input: &str) {
        let text = input.trim();
        if text.is_empty() {
            return;
        }

        let session_id = self.ensure_session();

        self.store
            .append_message(&session_id, Message::new(Role::User, text, &session_id));
        self.store
            .append_message(&session_id, Message::streaming_placeholder(&session_id));
        self.store.set_error(None);
        self.store.set_status(RequestStatus::Loading);

        let (tx, mut rx) = mpsc::unbounded_channel::<StreamEvent>();
        let transport = &self.transport;
        let store = &mut self.store;

        let stream_fut = transport.stream_chat(text, &session_id, tx);
        let apply_fut = async {
            let mut cumulative = String::new();
            while let Some(event) = rx.recv().await {
                if let StreamEvent::Chunk(fragment) = event {
                    cumulative.push_str(&fragment);
                    store.update_streaming_content(&session_id, &cumulative);
                }
            }

            return cumulative;
        };

        let (stream_res, cumulative) = tokio::join!(stream_fut, apply_fut);

        match stream_res {
            Ok(()) => {
                self.store.finalize_streaming(&session_id, &cumulative);
                self.store.set_status(RequestStatus::Succeeded);
            }
            Err(err) => {
                tracing::error!(error = %err, session_id = %session_id, "chat stream failed");
                self.store
                    .fail_streaming(&session_id, STREAM_FAILURE_NOTICE);
                self.store.set_error(Some(STREAM_FAILURE_NOTICE.to_string()));
                self.store.set_status(RequestStatus::Failed);
            }
        }
    }

    /// Fetches the server-side history and merges it into the store. Skipped
    /// entirely while another load or send is in flight, so concurrent
    /// triggers cannot double-fetch.
    pub async fn load_history(&mut self) {
        if self.store.status() == RequestStatus::Loading {
            return;
        }

        self.store.set_status(RequestStatus::Loading);

        match self.transport.fetch_history().await {
            Ok(messages) => {
                self.store.merge_history(messages);
                self.store.set_status(RequestStatus::Succeeded);
            }
            Err(err) => {
                tracing::error!(error = %err, "history fetch failed");
                self.store.set_error(Some(HISTORY_FAILURE_NOTICE.to_string()));
                self.store.set_status(RequestStatus::Failed);
            }
        }
    }

    /// Deletes a session locally first, then remotely. When the remote call
    /// fails the local deletion is rolled back and the error surfaced, rather
    /// than silently diverging from the server.
    pub async fn delete_session(&mut self, session_id: &str) {
        let deleted = self.store.delete_session(session_id);

        if let Err(err) = self.transport.delete_history(session_id).await {
            tracing::error!(error = %err, session_id = %session_id, "remote history deletion failed");

            if let Some(deleted) = deleted {
                self.store.restore_session(session_id, deleted);
            }
            self.store.set_error(Some(DELETE_FAILURE_NOTICE.to_string()));
        }
    }
}
