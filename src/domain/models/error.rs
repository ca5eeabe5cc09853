use thiserror::Error;

/// Failure of a one-shot request/response call.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("{endpoint} request failed: {source}")]
    Request {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} request returned status {status}")]
    Status { endpoint: &'static str, status: u16 },
}

/// Failure of the server-push chat stream. Connection-level failures are kept
/// distinct from payload-level ones so callers can tell them apart.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("failed to connect to the chat stream: {0}")]
    Connect(#[source] reqwest::Error),
    #[error("chat stream returned status {0}")]
    Status(u16),
    #[error("chat stream was interrupted: {0}")]
    Interrupted(#[source] std::io::Error),
    #[error("chat stream ended without a completion marker")]
    MissingDone,
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("unsupported document type for {file_name}, expected pdf, docx, or txt")]
    UnsupportedType { file_name: String },
    #[error("failed to encode upload metadata: {0}")]
    Metadata(#[from] serde_json::Error),
    #[error("upload request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("upload request returned status {0}")]
    Status(u16),
}
