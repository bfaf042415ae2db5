//! Integration tests for the transport layer against a mock HTTP server.

use bytes::Bytes;
use glance_http::client::headers::encode_headers;
use glance_http::{
    ClientConfig, Error, HttpClient, RequestBody, ResponseBody, SessionClient, Transport,
};
use serde_json::json;

fn plain_client(url: &str) -> HttpClient {
    HttpClient::new(url, ClientConfig::default()).unwrap()
}

#[tokio::test]
async fn identity_headers_are_passed_unchanged() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/v1/images/my-image")
        .match_header("x-user-id", "user")
        .match_header("x-tenant-id", "tenant")
        .match_header("x-roles", "roles")
        .match_header("x-identity-status", "Confirmed")
        .match_header("x-service-catalog", "service_catalog")
        .with_body("Ok")
        .create_async()
        .await;

    let config = ClientConfig {
        identity_headers: encode_headers([
            ("X-User-Id", Some("user")),
            ("X-Tenant-Id", Some("tenant")),
            ("X-Roles", Some("roles")),
            ("X-Identity-Status", Some("Confirmed")),
            ("X-Service-Catalog", Some("service_catalog")),
        ])
        .unwrap(),
        ..ClientConfig::default()
    };
    let client = HttpClient::new(&server.url(), config).unwrap();

    let (meta, _body) = client.get("/v1/images/my-image", None).await.unwrap();
    assert_eq!(meta.status, 200);
    mock.assert_async().await;
}

#[tokio::test]
async fn token_is_injected_as_auth_header() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/v1/images/detail")
        .match_header("x-auth-token", "abc123")
        .with_body("Ok")
        .create_async()
        .await;

    let config = ClientConfig {
        token: Some("abc123".to_string()),
        ..ClientConfig::default()
    };
    let client = HttpClient::new(&server.url(), config).unwrap();

    client.get("/v1/images/detail", None).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn no_token_means_no_auth_header() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/v1/images/detail")
        .match_header("x-auth-token", mockito::Matcher::Missing)
        .with_body("Ok")
        .create_async()
        .await;

    let client = plain_client(&server.url());
    client.get("/v1/images/detail", None).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn connection_refused_names_host_and_port() {
    // Bind to grab a free port, then drop the listener so connects are
    // refused.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = plain_client(&format!("http://{}", addr));
    let err = client
        .get("/v1/images/detail?limit=20", None)
        .await
        .unwrap_err();

    match &err {
        Error::Communication { endpoint, .. } => assert_eq!(endpoint, &addr.to_string()),
        other => panic!("expected Communication error, got {:?}", other),
    }
    assert!(err.to_string().contains(&addr.to_string()));
}

#[tokio::test]
async fn buffered_text_response_is_returned() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/v1/images/detail")
        .with_header("content-type", "text/plain")
        .with_body("Ok")
        .create_async()
        .await;

    let client = plain_client(&server.url());
    let (meta, body) = client.get("/v1/images/detail", None).await.unwrap();
    assert_eq!(meta.content_type(), Some("text/plain"));
    assert_eq!(body.text(), Some("Ok"));
}

#[tokio::test]
async fn non_ascii_per_call_headers_are_sent() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/v1/images/detail")
        .with_header("content-type", "text/plain")
        .with_body("Ok")
        .create_async()
        .await;

    let client = plain_client(&server.url());
    let headers = encode_headers([("test", Some("ni\u{f1}o"))]).unwrap();
    let (_, body) = client
        .get("/v1/images/detail", Some(headers))
        .await
        .unwrap();
    assert_eq!(body.text(), Some("Ok"));
}

#[tokio::test]
async fn structured_body_is_json_encoded() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/images")
        .match_header("content-type", "application/json")
        .match_body(mockito::Matcher::Json(json!({"test": "json_request"})))
        .with_body("OK")
        .create_async()
        .await;

    let client = plain_client(&server.url());
    let (_, body) = client
        .post(
            "/v1/images",
            None,
            RequestBody::from(json!({"test": "json_request"})),
        )
        .await
        .unwrap();
    assert_eq!(body.text(), Some("OK"));
    mock.assert_async().await;
}

#[tokio::test]
async fn explicit_content_type_is_not_overridden() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/images")
        .match_header("content-type", "application/openstack-images-v2.1-json-patch")
        .with_body("OK")
        .create_async()
        .await;

    let client = plain_client(&server.url());
    let headers = encode_headers([(
        "Content-Type",
        Some("application/openstack-images-v2.1-json-patch"),
    )])
    .unwrap();
    client
        .post(
            "/v1/images",
            Some(headers),
            RequestBody::from(json!([{"op": "replace"}])),
        )
        .await
        .unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn chunked_request_body_is_streamed() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/images/")
        .match_body(mockito::Matcher::Exact("chunked_request".to_string()))
        .with_body("Ok")
        .create_async()
        .await;

    let client = plain_client(&server.url());
    let stream = futures::stream::iter(vec![
        Ok::<Bytes, std::io::Error>(Bytes::from("chunked_")),
        Ok(Bytes::from("request")),
    ]);
    let (_, body) = client
        .post("/v1/images/", None, RequestBody::from_stream(stream))
        .await
        .unwrap();
    assert_eq!(body.text(), Some("Ok"));
    mock.assert_async().await;
}

#[tokio::test]
async fn octet_stream_response_is_chunked_and_single_pass() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/v1/images/")
        .with_header("content-type", "application/octet-stream")
        .with_body("TEST")
        .create_async()
        .await;

    let client = plain_client(&server.url());
    let (meta, body) = client.get("/v1/images/", None).await.unwrap();
    assert_eq!(meta.content_type(), Some("application/octet-stream"));

    let ResponseBody::Chunks(mut chunks) = body else {
        panic!("expected a chunked body");
    };
    let mut collected = Vec::new();
    while let Some(chunk) = chunks.next().await {
        collected.extend_from_slice(&chunk.unwrap());
    }
    assert_eq!(collected, b"TEST");

    // Forward-only: exhaustion is terminal.
    assert!(chunks.is_exhausted());
    assert!(chunks.next().await.is_none());
}

#[tokio::test]
async fn chunks_are_reframed_to_the_configured_size() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/v1/images/")
        .with_header("content-type", "application/octet-stream")
        .with_body("ABCDE")
        .create_async()
        .await;

    let config = ClientConfig {
        chunk_size: 2,
        ..ClientConfig::default()
    };
    let client = HttpClient::new(&server.url(), config).unwrap();
    let (_, body) = client.get("/v1/images/", None).await.unwrap();

    let ResponseBody::Chunks(mut chunks) = body else {
        panic!("expected a chunked body");
    };
    let mut sizes = Vec::new();
    let mut collected = Vec::new();
    while let Some(chunk) = chunks.next().await {
        let chunk = chunk.unwrap();
        sizes.push(chunk.len());
        collected.extend_from_slice(&chunk);
    }
    assert_eq!(sizes, vec![2, 2, 1]);
    assert_eq!(collected, b"ABCDE");
}

#[tokio::test]
async fn zero_chunk_size_still_terminates() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/v1/images/")
        .with_header("content-type", "application/octet-stream")
        .with_body("TEST")
        .create_async()
        .await;

    let config = ClientConfig {
        chunk_size: 0,
        ..ClientConfig::default()
    };
    let client = HttpClient::new(&server.url(), config).unwrap();
    let (_, body) = client.get("/v1/images/", None).await.unwrap();

    let ResponseBody::Chunks(mut chunks) = body else {
        panic!("expected a chunked body");
    };
    let mut collected = Vec::new();
    while let Some(chunk) = chunks.next().await {
        let chunk = chunk.unwrap();
        assert!(!chunk.is_empty());
        collected.extend_from_slice(&chunk);
    }
    assert_eq!(collected, b"TEST");
    assert!(chunks.is_exhausted());
}

#[tokio::test]
async fn session_zero_chunk_size_still_terminates() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/v1/images/")
        .with_header("content-type", "application/octet-stream")
        .with_body("TEST")
        .create_async()
        .await;

    let client = SessionClient::new(reqwest::Client::new(), &server.url())
        .unwrap()
        .with_chunk_size(0);
    let (_, body) = client.get("/v1/images/", None).await.unwrap();
    assert_eq!(body.concat().await.unwrap(), Bytes::from("TEST"));
}

#[tokio::test]
async fn slow_download_outlasting_the_timeout_succeeds() {
    use std::io::Write as _;

    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/v1/images/")
        .with_header("content-type", "application/octet-stream")
        .with_chunked_body(|writer: &mut dyn std::io::Write| {
            for part in [b"AB", b"CD", b"EF"] {
                writer.write_all(part)?;
                writer.flush()?;
                std::thread::sleep(std::time::Duration::from_millis(500));
            }
            Ok(())
        })
        .create_async()
        .await;

    // Each read gap stays under the timeout; the download as a whole does
    // not. Per-read semantics must let it finish.
    let config = ClientConfig {
        timeout_secs: 1.0,
        ..ClientConfig::default()
    };
    let client = HttpClient::new(&server.url(), config).unwrap();
    let (_, body) = client.get("/v1/images/", None).await.unwrap();
    assert_eq!(body.concat().await.unwrap(), Bytes::from("ABCDEF"));
}

#[tokio::test]
async fn session_client_sends_token_over_shared_session() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/v1/images/detail")
        .match_header("x-auth-token", "abc123")
        .with_body("Ok")
        .create_async()
        .await;

    let session = reqwest::Client::new();
    let client = SessionClient::new(session, &server.url())
        .unwrap()
        .with_token("abc123");

    let (meta, body) = client.get("/v1/images/detail", None).await.unwrap();
    assert_eq!(meta.status, 200);
    assert_eq!(body.text(), Some("Ok"));
    mock.assert_async().await;
}

#[tokio::test]
async fn delete_and_head_have_no_body() {
    let mut server = mockito::Server::new_async().await;
    let delete = server
        .mock("DELETE", "/v1/images/abc")
        .with_status(204)
        .create_async()
        .await;
    let head = server
        .mock("HEAD", "/v1/images/abc")
        .with_status(200)
        .create_async()
        .await;

    let client = plain_client(&server.url());
    let (meta, _) = client.delete("/v1/images/abc", None).await.unwrap();
    assert_eq!(meta.status, 204);
    let (meta, _) = client.head("/v1/images/abc", None).await.unwrap();
    assert_eq!(meta.status, 200);
    delete.assert_async().await;
    head.assert_async().await;
}
