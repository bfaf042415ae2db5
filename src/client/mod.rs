//! HTTP client implementations.
//!
//! This module provides the transport layer of the image-service client:
//! authenticated request/response handling, identity-header propagation,
//! JSON and chunked request bodies, and lazy chunked response bodies.
//!
//! # Module Organization
//!
//! ```text
//! client/
//! ├── transport - Transport trait, ResponseMeta, shared request pipeline
//! ├── http      - HttpClient (owns its connection pool)
//! ├── session   - SessionClient (borrows a shared pooled session)
//! ├── config    - ClientConfig record and defaults
//! ├── headers   - identity header / token composition
//! ├── body      - RequestBody, ResponseBody, ChunkStream
//! └── log       - non-raising diagnostic logging helpers
//! ```
//!
//! # Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Transport`] | "Issue request, get response" interface |
//! | [`HttpClient`] | Standalone client built from a [`ClientConfig`] |
//! | [`SessionClient`] | Client over an externally owned session |
//! | [`RequestBody`] | Empty, buffered, JSON or chunked request body |
//! | [`ResponseBody`] | Buffered text or lazy [`ChunkStream`] |
//! | [`ResponseMeta`] | Status code and response headers |
//!
//! # Examples
//!
//! ```ignore
//! use glance_http::{ClientConfig, HttpClient, RequestBody, Transport};
//! use serde_json::json;
//!
//! let client = HttpClient::new("http://example.com:9292", ClientConfig::default())?;
//!
//! // Structured bodies are JSON-encoded on the wire.
//! let (meta, body) = client
//!     .post("/v1/images", None, RequestBody::from(json!({"name": "cirros"})))
//!     .await?;
//! ```

mod body;
mod config;
pub mod headers;
mod http;
mod log;
mod session;
mod transport;

pub use body::{ByteStream, ChunkStream, RequestBody, ResponseBody};
pub use config::{ClientConfig, DEFAULT_CHUNK_SIZE, DEFAULT_TIMEOUT_SECS};
pub use http::HttpClient;
pub use session::SessionClient;
pub use transport::{ResponseMeta, Transport};
