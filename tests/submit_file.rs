use std::path::PathBuf;

use mockito::Matcher;
use transcribe_client::{Config, TranscribeClient, TranscribeError};

fn client_for(server: &mockito::Server) -> TranscribeClient {
    let config = Config {
        service_url: server.url(),
        ..Config::default()
    };
    TranscribeClient::new(&config).expect("client")
}

fn sample_file(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("sample.wav");
    std::fs::write(&path, b"RIFF\x00\x00\x00\x00WAVEfmt ").expect("write sample");
    path
}

#[tokio::test]
async fn accepted_upload_hits_endpoint_once() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/transcribe_file/")
        .match_header(
            "content-type",
            Matcher::Regex("multipart/form-data.*".to_string()),
        )
        .with_status(200)
        .with_body("[]")
        .expect(1)
        .create_async()
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let client = client_for(&server);
    let receipt = client
        .submit_file(&sample_file(&dir), "user@example.com", "small")
        .await
        .expect("upload accepted");

    assert_eq!(receipt.file_name, "sample.wav");
    mock.assert_async().await;
}

#[tokio::test]
async fn success_ignores_response_body_content() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/transcribe_file/")
        .with_status(200)
        .with_body("this is not json at all")
        .create_async()
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let client = client_for(&server);
    assert!(client
        .submit_file(&sample_file(&dir), "user@example.com", "small")
        .await
        .is_ok());
}

#[tokio::test]
async fn service_error_message_is_shown_verbatim() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/transcribe_file/")
        .with_status(500)
        .with_body(r#"{"error":"file too large"}"#)
        .create_async()
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let client = client_for(&server);
    let err = client
        .submit_file(&sample_file(&dir), "user@example.com", "small")
        .await
        .expect_err("upload rejected");

    match err {
        TranscribeError::Service { status, message } => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(message, "file too large");
        }
        other => panic!("expected service error, got {:?}", other),
    }
}

#[tokio::test]
async fn bad_request_envelope_is_surfaced() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/transcribe_file/")
        .with_status(400)
        .with_body(r#"{"error":"unsupported format"}"#)
        .create_async()
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let client = client_for(&server);
    let err = client
        .submit_file(&sample_file(&dir), "user@example.com", "small")
        .await
        .expect_err("upload rejected");

    match err {
        TranscribeError::Service { status, message } => {
            assert_eq!(status.as_u16(), 400);
            assert_eq!(message, "unsupported format");
        }
        other => panic!("expected service error, got {:?}", other),
    }
}

#[tokio::test]
async fn non_json_error_body_is_a_parse_failure() {
    // Legacy behavior: a malformed error body is its own failure mode, never
    // rewritten into a service message or a success.
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/transcribe_file/")
        .with_status(500)
        .with_body("internal error")
        .create_async()
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let client = client_for(&server);
    let err = client
        .submit_file(&sample_file(&dir), "user@example.com", "small")
        .await
        .expect_err("upload rejected");

    assert!(
        matches!(err, TranscribeError::ResponseParse { .. }),
        "expected parse failure, got {:?}",
        err
    );
}

#[tokio::test]
async fn missing_input_file_is_an_io_error() {
    let server = mockito::Server::new_async().await;
    let client = client_for(&server);

    let err = client
        .submit_file(
            std::path::Path::new("/nonexistent/sample.wav"),
            "user@example.com",
            "small",
        )
        .await
        .expect_err("missing file");

    assert!(matches!(err, TranscribeError::Io(_)));
}
