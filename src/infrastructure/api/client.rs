#[cfg(test)]
#[path = "client_test.rs"]
mod tests;

use async_trait::async_trait;
use futures::stream::TryStreamExt;
use reqwest::multipart;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;
use tokio_util::io::StreamReader;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::ChatTransport;
use crate::domain::models::DocumentKind;
use crate::domain::models::DocumentMetadata;
use crate::domain::models::Message;
use crate::domain::models::StreamError;
use crate::domain::models::StreamEvent;
use crate::domain::models::TransportError;
use crate::domain::models::UploadError;

const DONE_MARKER: &str = "[DONE]";

fn convert_err(err: reqwest::Error) -> std::io::Error {
    let err_msg = err.to_string();
    return std::io::Error::new(std::io::ErrorKind::Interrupted, err_msg);
}

/// Strips the SSE field prefix from a `data:` line. A single leading space is
/// part of the field separator, not the payload; anything past it is.
fn data_payload(line: &str) -> Option<&str> {
    let payload = line.strip_prefix("data:")?;

    return Some(payload.strip_prefix(' ').unwrap_or(payload));
}

/// HTTP client for the chat service. All endpoints resolve against the
/// process-wide configured base URL.
pub struct ApiClient {
    url: String,
}

impl Default for ApiClient {
    fn default() -> ApiClient {
        return ApiClient::new(&Config::get(ConfigKey::ApiBaseUrl));
    }
}

impl ApiClient {
    pub fn new(url: &str) -> ApiClient {
        return ApiClient {
            url: url.trim_end_matches('/').to_string(),
        };
    }

    /// Uploads a reference document for embedding. The document type is
    /// validated before any bytes leave the machine, and the service's
    /// response payload is returned to the caller untouched. Failures here
    /// never touch chat state.
    pub async fn upload_document(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<serde_json::Value, UploadError> {
        let kind = match DocumentKind::from_file_name(file_name) {
            Some(kind) => kind,
            None => {
                return Err(UploadError::UnsupportedType {
                    file_name: file_name.to_string(),
                });
            }
        };

        let metadata = DocumentMetadata::describe(file_name, kind, bytes.len());
        let metadata_json = serde_json::to_string(&metadata)?;

        let file_part = multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(kind.mime())
            .map_err(UploadError::Request)?;
        let metadata_part = multipart::Part::text(metadata_json)
            .mime_str("application/json")
            .map_err(UploadError::Request)?;
        let form = multipart::Form::new()
            .part("file", file_part)
            .part("metadata", metadata_part);

        let res = reqwest::Client::new()
            .post(format!("{url}/document-embedding/upload", url = self.url))
            .multipart(form)
            .send()
            .await
            .map_err(UploadError::Request)?;

        let status = res.status().as_u16();
        if status >= 400 {
            tracing::error!(status = status, file_name = file_name, "upload failed");
            return Err(UploadError::Status(status));
        }

        let payload = res
            .json::<serde_json::Value>()
            .await
            .map_err(UploadError::Request)?;

        return Ok(payload);
    }
}

#[async_trait]
impl ChatTransport for ApiClient {
    async fn stream_chat(
        &self,
        query: &str,
        session_id: &str,
        tx: mpsc::UnboundedSender<StreamEvent>,
    ) -> Result<(), StreamError> {
        let res = reqwest::Client::new()
            .get(format!("{url}/chat/stream", url = self.url))
            .query(&[("sessionId", session_id), ("query", query)])
            .send()
            .await
            .map_err(StreamError::Connect)?;

        let status = res.status().as_u16();
        if status >= 400 {
            tracing::error!(status = status, "failed to open the chat stream");
            return Err(StreamError::Status(status));
        }

        let stream = res.bytes_stream().map_err(convert_err);
        let mut lines_reader = StreamReader::new(stream).lines();

        while let Some(line) = lines_reader
            .next_line()
            .await
            .map_err(StreamError::Interrupted)?
        {
            let payload = match data_payload(&line) {
                Some(payload) => payload,
                None => continue,
            };
            if payload.is_empty() {
                continue;
            }

            if payload == DONE_MARKER {
                let _ = tx.send(StreamEvent::Done);
                return Ok(());
            }

            if tx.send(StreamEvent::Chunk(payload.to_string())).is_err() {
                // Receiver hung up; nobody is left to stream to.
                return Ok(());
            }
        }

        return Err(StreamError::MissingDone);
    }

    async fn fetch_history(&self) -> Result<Vec<Message>, TransportError> {
        let res = reqwest::Client::new()
            .get(format!("{url}/chat/history", url = self.url))
            .send()
            .await
            .map_err(|err| {
                return TransportError::Request {
                    endpoint: "/chat/history",
                    source: err,
                };
            })?;

        let status = res.status().as_u16();
        if status >= 400 {
            tracing::error!(status = status, "history fetch failed");
            return Err(TransportError::Status {
                endpoint: "/chat/history",
                status,
            });
        }

        let messages = res.json::<Vec<Message>>().await.map_err(|err| {
            return TransportError::Request {
                endpoint: "/chat/history",
                source: err,
            };
        })?;

        return Ok(messages);
    }

    async fn delete_history(&self, session_id: &str) -> Result<(), TransportError> {
        let res = reqwest::Client::new()
            .delete(format!(
                "{url}/chat/delete-history-by-session/{session_id}",
                url = self.url
            ))
            .send()
            .await
            .map_err(|err| {
                return TransportError::Request {
                    endpoint: "/chat/delete-history-by-session",
                    source: err,
                };
            })?;

        let status = res.status().as_u16();
        if status >= 400 {
            tracing::error!(
                status = status,
                session_id = session_id,
                "history deletion failed"
            );
            return Err(TransportError::Status {
                endpoint: "/chat/delete-history-by-session",
                status,
            });
        }

        return Ok(());
    }
}
