//! The session-backed client.
//!
//! [`SessionClient`] is the pooled-session variant of the transport: instead
//! of owning a connection pool, it borrows an externally constructed
//! `reqwest::Client`. Timeouts, TLS material and default headers belong to
//! the session's owner; this client only carries the endpoint, an optional
//! token, and the response chunk size.
//!
//! Both variants implement [`Transport`], so they are interchangeable at
//! construction.
//!
//! # Examples
//!
//! ```ignore
//! use glance_http::{SessionClient, Transport};
//!
//! let session = reqwest::Client::builder().build()?;
//! let client = SessionClient::new(session, "http://example.com:9292")?
//!     .with_token("abc123");
//! let (meta, body) = client.get("/v1/images/detail", None).await?;
//! ```

use crate::client::body::{RequestBody, ResponseBody};
use crate::client::config::DEFAULT_CHUNK_SIZE;
use crate::client::transport::{send_request, ResponseMeta, Transport};
use crate::endpoint::Endpoint;
use crate::error::Result;
use async_trait::async_trait;
use http::{HeaderMap, Method};

/// HTTP client over a shared, externally owned session.
pub struct SessionClient {
    session: reqwest::Client,
    endpoint: Endpoint,
    auth_token: Option<String>,
    chunk_size: usize,
}

impl SessionClient {
    /// Wrap an existing session for requests against `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`](crate::Error::InvalidEndpoint)
    /// when the endpoint URL is malformed.
    pub fn new(session: reqwest::Client, endpoint: &str) -> Result<Self> {
        Ok(SessionClient {
            session,
            endpoint: Endpoint::parse(endpoint)?,
            auth_token: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
        })
    }

    /// Attach an auth token, injected as `X-Auth-Token` on every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Override the response chunk size for streamed bodies. A value of 0
    /// is treated as 1.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// The parsed endpoint this client talks to.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// The attached auth token, if any.
    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }
}

#[async_trait]
impl Transport for SessionClient {
    async fn request(
        &self,
        method: Method,
        path: &str,
        headers: Option<HeaderMap>,
        body: RequestBody,
    ) -> Result<(ResponseMeta, ResponseBody)> {
        // Identity headers, if any, live on the session as default headers.
        let identity = HeaderMap::new();
        send_request(
            &self.session,
            &self.endpoint,
            &identity,
            self.auth_token.as_deref(),
            self.chunk_size,
            method,
            path,
            headers,
            body,
        )
        .await
    }
}
