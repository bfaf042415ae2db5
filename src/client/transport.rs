//! The transport interface shared by both client variants.
//!
//! [`Transport`] is the "issue request, get response" seam:
//! [`HttpClient`](crate::HttpClient) (owns its connection pool) and
//! [`SessionClient`](crate::SessionClient) (borrows a shared pooled session)
//! both implement it, so callers can hold a `dyn Transport` and swap the
//! variant at construction.
//!
//! # Examples
//!
//! ```ignore
//! use glance_http::{RequestBody, Transport};
//!
//! async fn list_images(client: &dyn Transport) -> glance_http::Result<String> {
//!     let (_, body) = client.get("/v1/images/detail?limit=20", None).await?;
//!     Ok(body.text().unwrap_or_default().to_string())
//! }
//! ```

use crate::client::body::{self, RequestBody, ResponseBody};
use crate::client::{headers, log};
use crate::endpoint::Endpoint;
use crate::error::{Error, Result};
use async_trait::async_trait;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderValue, Method};
use std::collections::BTreeMap;

/// Response metadata: status code and headers.
///
/// Headers are exposed as a string map with lowercase names, the way the
/// HTTP layer canonicalizes them.
#[derive(Debug, Clone)]
pub struct ResponseMeta {
    /// HTTP status code.
    pub status: u16,
    /// Response headers (lowercase names).
    pub headers: BTreeMap<String, String>,
}

impl ResponseMeta {
    pub(crate) fn from_response(response: &reqwest::Response) -> Self {
        let mut headers = BTreeMap::new();
        for (name, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                headers.insert(name.as_str().to_string(), value.to_string());
            }
        }
        ResponseMeta {
            status: response.status().as_u16(),
            headers,
        }
    }

    /// The `Content-Type` header, if present.
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get("content-type").map(String::as_str)
    }

    /// Whether the status code is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    fn is_octet_stream(&self) -> bool {
        self.content_type()
            .map(|ct| ct.trim_start().starts_with("application/octet-stream"))
            .unwrap_or(false)
    }
}

/// The request interface implemented by both client variants.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a request and return response metadata plus body.
    ///
    /// The body is buffered text unless the response declares
    /// `Content-Type: application/octet-stream`, in which case it is a lazy
    /// single-pass chunk stream.
    async fn request(
        &self,
        method: Method,
        path: &str,
        headers: Option<HeaderMap>,
        body: RequestBody,
    ) -> Result<(ResponseMeta, ResponseBody)>;

    /// GET a resource.
    async fn get(
        &self,
        path: &str,
        headers: Option<HeaderMap>,
    ) -> Result<(ResponseMeta, ResponseBody)> {
        self.request(Method::GET, path, headers, RequestBody::Empty)
            .await
    }

    /// HEAD a resource.
    async fn head(
        &self,
        path: &str,
        headers: Option<HeaderMap>,
    ) -> Result<(ResponseMeta, ResponseBody)> {
        self.request(Method::HEAD, path, headers, RequestBody::Empty)
            .await
    }

    /// POST a body to a resource.
    async fn post(
        &self,
        path: &str,
        headers: Option<HeaderMap>,
        body: RequestBody,
    ) -> Result<(ResponseMeta, ResponseBody)> {
        self.request(Method::POST, path, headers, body).await
    }

    /// PUT a body to a resource.
    async fn put(
        &self,
        path: &str,
        headers: Option<HeaderMap>,
        body: RequestBody,
    ) -> Result<(ResponseMeta, ResponseBody)> {
        self.request(Method::PUT, path, headers, body).await
    }

    /// PATCH a resource.
    async fn patch(
        &self,
        path: &str,
        headers: Option<HeaderMap>,
        body: RequestBody,
    ) -> Result<(ResponseMeta, ResponseBody)> {
        self.request(Method::PATCH, path, headers, body).await
    }

    /// DELETE a resource.
    async fn delete(
        &self,
        path: &str,
        headers: Option<HeaderMap>,
    ) -> Result<(ResponseMeta, ResponseBody)> {
        self.request(Method::DELETE, path, headers, RequestBody::Empty)
            .await
    }
}

/// Shared request pipeline used by both client variants.
///
/// Composes the final headers, attaches the body (JSON-encoding structured
/// values, streaming chunked uploads), sends, translates transport failures
/// with the endpoint's host:port, and wraps the response body.
pub(crate) async fn send_request(
    client: &reqwest::Client,
    endpoint: &Endpoint,
    identity_headers: &HeaderMap,
    auth_token: Option<&str>,
    chunk_size: usize,
    method: Method,
    path: &str,
    headers: Option<HeaderMap>,
    body: RequestBody,
) -> Result<(ResponseMeta, ResponseBody)> {
    let url = endpoint.join(path);
    let mut final_headers = headers::compose(identity_headers, auth_token, headers.as_ref())?;

    let mut request_preview = None;
    let mut request = client.request(method.clone(), &url);
    match body {
        RequestBody::Empty => {}
        RequestBody::Buffered(bytes) => {
            request_preview = Some(log::preview(&bytes));
            request = request.body(bytes);
        }
        RequestBody::Json(value) => {
            let encoded = serde_json::to_vec(&value)?;
            if !final_headers.contains_key(CONTENT_TYPE) {
                final_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            }
            request_preview = Some(log::preview(&encoded));
            request = request.body(encoded);
        }
        RequestBody::Chunked(stream) => {
            // Unknown length: reqwest sends this with chunked transfer
            // encoding.
            request = request.body(reqwest::Body::wrap_stream(stream));
        }
    }
    request = request.headers(final_headers.clone());

    log::log_request(&method, &url, &final_headers, request_preview.as_deref());

    let response = request
        .send()
        .await
        .map_err(|e| Error::translate(e, endpoint.netloc()))?;
    let meta = ResponseMeta::from_response(&response);

    if meta.is_octet_stream() {
        log::log_response(&meta, None);
        let chunks = body::stream_response(response, chunk_size, endpoint.netloc().to_string());
        Ok((meta, ResponseBody::Chunks(chunks)))
    } else {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::translate(e, endpoint.netloc()))?;
        log::log_response(&meta, Some(&log::preview(&bytes)));
        let text = String::from_utf8_lossy(&bytes).into_owned();
        Ok((meta, ResponseBody::Text(text)))
    }
}
