#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # glance-http: image-service HTTP transport
//!
//! This crate implements the HTTP transport layer of an OpenStack
//! image-service (Glance) client: authenticated request/response handling,
//! identity-header propagation, chunked transfer support, and TLS
//! certificate verification.
//!
//! ## Overview
//!
//! The transport is a thin pair of clients over a mature HTTP/TLS stack:
//!
//! 1. **Endpoint parsing** - the service URL is split and validated once at
//!    construction
//! 2. **Header composition** - identity headers, the auth token and
//!    per-call headers are merged into each outgoing request
//! 3. **Chunked transfer** - request bodies can be streamed with chunked
//!    transfer encoding, and `application/octet-stream` responses are
//!    returned as a lazy, single-pass chunk stream
//! 4. **TLS verification** - server certificates are validated against a
//!    supplied CA bundle, with optional client certificates and an
//!    `insecure` escape hatch
//!
//! Network-level failures are translated into a small error taxonomy that
//! carries the target host:port; TLS configuration problems fail before any
//! socket is opened. This layer performs no retries; retry policy belongs
//! to callers.
//!
//! ## Client Usage
//!
//! ```ignore
//! use glance_http::{ClientConfig, HttpClient, ResponseBody, Transport};
//!
//! #[tokio::main]
//! async fn main() -> glance_http::Result<()> {
//!     let config = ClientConfig {
//!         token: Some("abc123".to_string()),
//!         ..ClientConfig::default()
//!     };
//!     let client = HttpClient::new("http://example.com:9292", config)?;
//!
//!     let (meta, body) = client.get("/v1/images/detail", None).await?;
//!     if let ResponseBody::Chunks(mut chunks) = body {
//!         while let Some(chunk) = chunks.next().await {
//!             // each await may block on network I/O
//!             consume(&chunk?);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - **[client]** - `Transport` trait, `HttpClient`/`SessionClient`, header
//!   composition, body models
//! - **[endpoint]** - endpoint URL parsing and validation
//! - **[tls]** - TLS options and fail-fast certificate loading
//! - **[error]** - error taxonomy and result handling

pub mod client;
pub mod endpoint;
pub mod error;
pub mod tls;

pub use client::{
    ByteStream, ChunkStream, ClientConfig, HttpClient, RequestBody, ResponseBody, ResponseMeta,
    SessionClient, Transport,
};
pub use endpoint::Endpoint;
pub use error::{Error, Result};
pub use tls::TlsConfig;
