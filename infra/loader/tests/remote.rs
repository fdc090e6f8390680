use serde_json::json;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use trellis_loader::{DefaultLoader, Format, Loader};

/// Serves one connection with a canned HTTP response and returns the base URL.
async fn serve_once(response: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 1024];
        let _ = socket.read(&mut request).await;
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn test_http_document_is_fetched() {
    let base = serve_once(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 16\r\nConnection: close\r\n\r\n{ \"path\": \"/x\" }",
    )
    .await;
    let loader = DefaultLoader::builder().build().unwrap();

    let loaded = loader.load(json!(format!("{base}/router.json")), Format::Json).await.unwrap();

    assert_eq!(loaded, json!({ "path": "/x" }));
}

#[tokio::test]
async fn test_http_error_status_is_reported() {
    let base = serve_once("HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n").await;
    let loader = DefaultLoader::builder().build().unwrap();

    let err = loader.load(json!(format!("{base}/missing.json")), Format::Json).await.unwrap_err();

    assert_eq!(err.kind(), "Status");
    assert!(err.to_string().contains("404"));
}

#[tokio::test]
async fn test_silent_server_hits_the_timeout() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    // Accepts the connection and holds it open without ever answering.
    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
        drop(socket);
    });

    let loader = DefaultLoader::builder().timeout(Duration::from_millis(200)).build().unwrap();
    let reference = format!("http://{addr}/hung.json");

    let err = loader.load(json!(reference), Format::Json).await.unwrap_err();

    assert_eq!(err.kind(), "Timeout");
    assert!(err.to_string().contains("200ms"));
    server.abort();
}
