use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use toolhub_core::catalog::{CatalogError, CatalogSource, CatalogStore, HttpSource, SourceError};

const BODY: &str = r#"[{"id": "lint", "name": "Linter", "description": "Static checks", "category": "code_review", "url": "https://lint.example.com"}]"#;

/// Serves a single canned HTTP response on a loopback port.
async fn serve_once(status_line: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = vec![0u8; 8192];
        let _ = socket.read(&mut request).await;

        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
    });

    format!("http://{addr}/tools.json")
}

fn source(url: &str) -> HttpSource {
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    HttpSource::with_client(url, client)
}

#[tokio::test]
async fn http_source_loads_catalog() {
    let url = serve_once("200 OK", BODY).await;
    let store = CatalogStore::new(source(&url));

    let report = store.load().await.unwrap();

    assert!(report.committed);
    assert_eq!(store.snapshot().len(), 1);
    assert_eq!(store.snapshot().source(), url);
}

#[tokio::test]
async fn http_error_status_is_source_unavailable() {
    let url = serve_once("503 Service Unavailable", "{}").await;
    let store = CatalogStore::new(source(&url));

    let err = store.load().await.unwrap_err();

    assert!(matches!(
        err,
        CatalogError::SourceUnavailable(SourceError::Status { status: 503, .. })
    ));
    assert!(store.snapshot().is_empty());
}

#[tokio::test]
async fn refused_connection_is_source_unavailable() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let http = source(&format!("http://{addr}/tools.json"));
    assert_eq!(http.describe(), format!("http://{addr}/tools.json"));

    let store = CatalogStore::new(http);
    let err = store.load().await.unwrap_err();

    assert!(matches!(err, CatalogError::SourceUnavailable(SourceError::Http(_))));
}
