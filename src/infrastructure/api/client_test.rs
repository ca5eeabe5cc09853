use anyhow::bail;
use anyhow::Result;
use mockito::Matcher;
use test_utils::sse_body;
use tokio::sync::mpsc;

use super::data_payload;
use super::ApiClient;
use crate::domain::models::ChatTransport;
use crate::domain::models::Role;
use crate::domain::models::StreamError;
use crate::domain::models::StreamEvent;
use crate::domain::models::TransportError;
use crate::domain::models::UploadError;

async fn collect_chunks(
    rx: &mut mpsc::UnboundedReceiver<StreamEvent>,
) -> Result<(Vec<String>, bool)> {
    let mut chunks: Vec<String> = vec![];
    let mut done = false;

    while let Some(event) = rx.recv().await {
        match event {
            StreamEvent::Chunk(fragment) => chunks.push(fragment),
            StreamEvent::Done => done = true,
        }
    }

    return Ok((chunks, done));
}

#[test]
fn it_extracts_data_payloads() {
    assert_eq!(data_payload("data: Hi"), Some("Hi"));
    assert_eq!(data_payload("data:  there"), Some(" there"));
    assert_eq!(data_payload("data:"), Some(""));
    assert_eq!(data_payload("event: message"), None);
    assert_eq!(data_payload(": keep-alive"), None);
}

#[tokio::test]
async fn it_streams_chat_chunks_in_order() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/chat/stream")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("sessionId".to_string(), "s1".to_string()),
            Matcher::UrlEncoded("query".to_string(), "how are you?".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(sse_body(&["Hi", " there"]))
        .create();

    let (tx, mut rx) = mpsc::unbounded_channel::<StreamEvent>();
    let client = ApiClient::new(&server.url());
    client.stream_chat("how are you?", "s1", tx).await?;

    mock.assert();

    let (chunks, done) = collect_chunks(&mut rx).await?;
    assert_eq!(chunks, vec!["Hi".to_string(), " there".to_string()]);
    assert!(done);

    return Ok(());
}

#[tokio::test]
async fn it_stops_reading_after_the_completion_marker() -> Result<()> {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/chat/stream")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("data: Hi\n\ndata: [DONE]\n\ndata: late\n\n")
        .create();

    let (tx, mut rx) = mpsc::unbounded_channel::<StreamEvent>();
    let client = ApiClient::new(&server.url());
    client.stream_chat("hello", "s1", tx).await?;

    let (chunks, done) = collect_chunks(&mut rx).await?;
    assert_eq!(chunks, vec!["Hi".to_string()]);
    assert!(done);

    return Ok(());
}

#[tokio::test]
async fn it_ignores_non_data_stream_lines() -> Result<()> {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/chat/stream")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(": keep-alive\n\nevent: message\ndata: Hi\n\ndata: [DONE]\n\n")
        .create();

    let (tx, mut rx) = mpsc::unbounded_channel::<StreamEvent>();
    let client = ApiClient::new(&server.url());
    client.stream_chat("hello", "s1", tx).await?;

    let (chunks, done) = collect_chunks(&mut rx).await?;
    assert_eq!(chunks, vec!["Hi".to_string()]);
    assert!(done);

    return Ok(());
}

#[tokio::test]
async fn it_fails_streaming_on_http_error() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/chat/stream")
        .match_query(Matcher::Any)
        .with_status(500)
        .create();

    let (tx, _rx) = mpsc::unbounded_channel::<StreamEvent>();
    let client = ApiClient::new(&server.url());
    let res = client.stream_chat("hello", "s1", tx).await;

    mock.assert();
    assert!(matches!(res, Err(StreamError::Status(500))));
}

#[tokio::test]
async fn it_fails_streaming_without_a_completion_marker() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/chat/stream")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("data: Hi\n\n")
        .create();

    let (tx, mut rx) = mpsc::unbounded_channel::<StreamEvent>();
    let client = ApiClient::new(&server.url());
    let res = client.stream_chat("hello", "s1", tx).await;

    assert!(matches!(res, Err(StreamError::MissingDone)));

    // Chunks that arrived before the cut are still delivered.
    let (chunks, done) = collect_chunks(&mut rx).await.unwrap();
    assert_eq!(chunks, vec!["Hi".to_string()]);
    assert!(!done);
}

#[tokio::test]
async fn it_fetches_history() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/chat/history")
        .with_status(200)
        .with_body(test_utils::history_fixture())
        .create();

    let client = ApiClient::new(&server.url());
    let messages = client.fetch_history().await?;

    mock.assert();

    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[0].content, "hello");
    assert_eq!(messages[0].session_id, Some("s1".to_string()));

    return Ok(());
}

#[tokio::test]
async fn it_fails_history_fetch_on_http_error() {
    let mut server = mockito::Server::new();
    server.mock("GET", "/chat/history").with_status(500).create();

    let client = ApiClient::new(&server.url());
    let res = client.fetch_history().await;

    match res {
        Err(TransportError::Status { endpoint, status }) => {
            assert_eq!(endpoint, "/chat/history");
            assert_eq!(status, 500);
        }
        _ => panic!("expected a status error"),
    }
}

#[tokio::test]
async fn it_deletes_history_for_a_session() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("DELETE", "/chat/delete-history-by-session/s1")
        .with_status(200)
        .create();

    let client = ApiClient::new(&server.url());
    client.delete_history("s1").await?;

    mock.assert();

    return Ok(());
}

#[tokio::test]
async fn it_fails_history_deletion_on_http_error() {
    let mut server = mockito::Server::new();
    server
        .mock("DELETE", "/chat/delete-history-by-session/s1")
        .with_status(404)
        .create();

    let client = ApiClient::new(&server.url());
    let res = client.delete_history("s1").await;

    assert!(matches!(
        res,
        Err(TransportError::Status { status: 404, .. })
    ));
}

#[tokio::test]
async fn it_uploads_a_document() -> Result<()> {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/document-embedding/upload")
        .match_header(
            "content-type",
            Matcher::Regex("multipart/form-data.*".to_string()),
        )
        .match_body(Matcher::Regex("notes.txt".to_string()))
        .with_status(200)
        .with_body(r#"{"documentId":"doc-1"}"#)
        .create();

    let client = ApiClient::new(&server.url());
    let payload = client
        .upload_document("notes.txt", b"some plain text".to_vec())
        .await;

    mock.assert();

    let payload = match payload {
        Ok(payload) => payload,
        Err(err) => bail!("upload failed: {err}"),
    };
    assert_eq!(payload["documentId"], "doc-1");

    return Ok(());
}

#[tokio::test]
async fn it_rejects_unsupported_documents_before_any_request() {
    let client = ApiClient::new("http://localhost:0");
    let res = client.upload_document("setup.exe", vec![0, 1, 2]).await;

    match res {
        Err(UploadError::UnsupportedType { file_name }) => {
            insta::assert_snapshot!(file_name, @"setup.exe");
        }
        _ => panic!("expected an unsupported type error"),
    }
}

#[tokio::test]
async fn it_fails_uploads_on_http_error() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/document-embedding/upload")
        .with_status(500)
        .create();

    let client = ApiClient::new(&server.url());
    let res = client.upload_document("notes.txt", b"text".to_vec()).await;

    assert!(matches!(res, Err(UploadError::Status(500))));
}
