//! The standalone HTTP client.
//!
//! [`HttpClient`] is the raw-transport variant: it owns a private connection
//! pool configured from a [`ClientConfig`] (timeout, TLS material, identity
//! headers, token). One client per configuration; there is no hidden global
//! state.
//!
//! # Examples
//!
//! ## Simple GET request
//!
//! ```ignore
//! use glance_http::{ClientConfig, HttpClient, Transport};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HttpClient::new("http://example.com:9292", ClientConfig::default())?;
//!     let (meta, body) = client.get("/v1/images/detail", None).await?;
//!     println!("status: {}", meta.status);
//!     Ok(())
//! }
//! ```
//!
//! ## Authenticated client with identity headers
//!
//! ```ignore
//! use glance_http::{client::headers::encode_headers, ClientConfig, HttpClient};
//!
//! let config = ClientConfig {
//!     token: Some("abc123".to_string()),
//!     identity_headers: encode_headers([
//!         ("X-User-Id", Some("user")),
//!         ("X-Tenant-Id", Some("tenant")),
//!     ])?,
//!     ..ClientConfig::default()
//! };
//! let client = HttpClient::new("https://glance.internal:9292", config)?;
//! ```

use crate::client::body::{RequestBody, ResponseBody};
use crate::client::config::ClientConfig;
use crate::client::transport::{send_request, ResponseMeta, Transport};
use crate::client::headers;
use crate::endpoint::Endpoint;
use crate::error::Result;
use async_trait::async_trait;
use http::{HeaderMap, Method};
use std::time::Duration;

/// HTTP client owning its own connection pool.
///
/// Construction parses the endpoint, splits any `X-Auth-Token` out of the
/// identity headers, and loads the TLS material, so a broken endpoint or
/// TLS configuration fails here, before any request is made.
pub struct HttpClient {
    endpoint: Endpoint,
    auth_token: Option<String>,
    identity_headers: HeaderMap,
    timeout: Duration,
    chunk_size: usize,
    client: reqwest::Client,
}

impl HttpClient {
    /// Build a client for `endpoint` from `config`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidEndpoint`](crate::Error::InvalidEndpoint) for a
    ///   malformed endpoint URL.
    /// - [`Error::SslConfiguration`](crate::Error::SslConfiguration) when
    ///   configured certificate files cannot be read or parsed. This happens
    ///   before any socket is opened.
    pub fn new(endpoint: &str, config: ClientConfig) -> Result<Self> {
        let endpoint = Endpoint::parse(endpoint)?;

        // A token seeded via identity headers wins over the token option.
        let (identity_headers, header_token) = headers::split_auth_token(config.identity_headers);
        let auth_token = header_token.or(config.token);

        // TLS material is validated before the pool exists.
        let tls = config.tls.load()?;

        let timeout = Duration::from_secs_f64(config.timeout_secs);
        // Per-read semantics: a long download that keeps making progress is
        // never aborted, only a stalled connect or read.
        let mut builder = reqwest::Client::builder()
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .user_agent(config.user_agent);
        builder = tls.configure(builder);
        let client = builder.build()?;

        Ok(HttpClient {
            endpoint,
            auth_token,
            identity_headers,
            timeout,
            chunk_size: config.chunk_size.max(1),
            client,
        })
    }

    /// The parsed endpoint this client talks to.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// The effective auth token, after identity-header precedence.
    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    /// The stored identity headers. Never contains `X-Auth-Token`.
    pub fn identity_headers(&self) -> &HeaderMap {
        &self.identity_headers
    }

    /// The configured timeout, applied to connect and to each socket read.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn request(
        &self,
        method: Method,
        path: &str,
        headers: Option<HeaderMap>,
        body: RequestBody,
    ) -> Result<(ResponseMeta, ResponseBody)> {
        send_request(
            &self.client,
            &self.endpoint,
            &self.identity_headers,
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
