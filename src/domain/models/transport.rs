use async_trait::async_trait;
use tokio::sync::mpsc;

use super::Message;
use super::StreamError;
use super::TransportError;

/// Incremental output of one chat stream, delivered in arrival order.
pub enum StreamEvent {
    /// A raw text fragment. Fragments concatenate into the full reply.
    Chunk(String),
    /// The end-of-stream sentinel arrived; no further chunks will follow.
    Done,
}

pub type TransportBox = Box<dyn ChatTransport + Send + Sync>;

#[async_trait]
pub trait ChatTransport {
    /// Opens a server-push stream scoped to `(query, session_id)` and forwards
    /// every payload through `tx` until the end-of-stream sentinel.
    ///
    /// The sender is taken by value: dropping it when this call returns is the
    /// one and only close of the stream handle, on success and failure alike.
    /// No retries happen at this layer; any retry policy belongs to the
    /// caller, and today none exists.
    async fn stream_chat(
        &self,
        query: &str,
        session_id: &str,
        tx: mpsc::UnboundedSender<StreamEvent>,
    ) -> Result<(), StreamError>;

    /// Fetches the full message history across all sessions.
    async fn fetch_history(&self) -> Result<Vec<Message>, TransportError>;

    /// Deletes the server-side history of one session.
    async fn delete_history(&self, session_id: &str) -> Result<(), TransportError>;
}
