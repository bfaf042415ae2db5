//! Request and response body models.
//!
//! Requests carry a [`RequestBody`]: nothing, a fixed buffer, a structured
//! value that is JSON-encoded on the wire, or a byte stream sent with
//! chunked transfer encoding.
//!
//! Responses carry a [`ResponseBody`]: buffered text, or, when the server
//! declares `Content-Type: application/octet-stream`, a lazy
//! [`ChunkStream`] for large payloads.
//!
//! # Examples
//!
//! ## Streaming a download
//!
//! ```ignore
//! use glance_http::{HttpClient, ResponseBody, Transport};
//!
//! let (meta, body) = client.get("/v2/images/abc/file", None).await?;
//! if let ResponseBody::Chunks(mut chunks) = body {
//!     while let Some(chunk) = chunks.next().await {
//!         write_somewhere(&chunk?);
//!     }
//! }
//! ```
//!
//! ## Uploading from a stream
//!
//! ```ignore
//! use glance_http::RequestBody;
//! use bytes::Bytes;
//!
//! let body = RequestBody::from_stream(futures::stream::iter(
//!     segments.into_iter().map(|s| Ok(Bytes::from(s))),
//! ));
//! client.post("/v2/images", None, body).await?;
//! ```

use crate::error::{Error, Result};
use bytes::{Bytes, BytesMut};
use futures::{Stream, StreamExt};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;

/// A stream of body bytes for chunked uploads.
pub type ByteStream = Pin<Box<dyn Stream<Item = std::io::Result<Bytes>> + Send + Sync + 'static>>;

/// The body of an outgoing request.
pub enum RequestBody {
    /// No body.
    Empty,
    /// A fixed-size buffer, sent as-is.
    Buffered(Bytes),
    /// A structured value, JSON-encoded on the wire. `Content-Type:
    /// application/json` is set unless the caller supplied one explicitly.
    Json(serde_json::Value),
    /// A lazy byte sequence, sent with chunked transfer encoding.
    Chunked(ByteStream),
}

impl RequestBody {
    /// Wrap a byte stream for a chunked upload.
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = std::io::Result<Bytes>> + Send + Sync + 'static,
    {
        RequestBody::Chunked(Box::pin(stream))
    }
}

impl std::fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestBody::Empty => write!(f, "RequestBody::Empty"),
            RequestBody::Buffered(bytes) => {
                write!(f, "RequestBody::Buffered({} bytes)", bytes.len())
            }
            RequestBody::Json(_) => write!(f, "RequestBody::Json"),
            RequestBody::Chunked(_) => write!(f, "RequestBody::Chunked"),
        }
    }
}

impl From<Bytes> for RequestBody {
    fn from(bytes: Bytes) -> Self {
        RequestBody::Buffered(bytes)
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(bytes: Vec<u8>) -> Self {
        RequestBody::Buffered(Bytes::from(bytes))
    }
}

impl From<&str> for RequestBody {
    fn from(text: &str) -> Self {
        RequestBody::Buffered(Bytes::copy_from_slice(text.as_bytes()))
    }
}

impl From<String> for RequestBody {
    fn from(text: String) -> Self {
        RequestBody::Buffered(Bytes::from(text))
    }
}

impl From<serde_json::Value> for RequestBody {
    fn from(value: serde_json::Value) -> Self {
        RequestBody::Json(value)
    }
}

/// The body of a received response.
#[derive(Debug)]
pub enum ResponseBody {
    /// Fully buffered body, decoded as text (lossy on invalid UTF-8).
    Text(String),
    /// Lazy chunk sequence for an `application/octet-stream` payload.
    Chunks(ChunkStream),
}

impl ResponseBody {
    /// The buffered text, or `None` for a chunked body.
    pub fn text(&self) -> Option<&str> {
        match self {
            ResponseBody::Text(text) => Some(text),
            ResponseBody::Chunks(_) => None,
        }
    }

    /// Consume the body, concatenating all content into one buffer.
    ///
    /// For a chunked body this drains the stream, so each await may block
    /// on network I/O.
    pub async fn concat(self) -> Result<Bytes> {
        match self {
            ResponseBody::Text(text) => Ok(Bytes::from(text)),
            ResponseBody::Chunks(mut chunks) => {
                let mut out = BytesMut::new();
                while let Some(chunk) = chunks.next().await {
                    out.extend_from_slice(&chunk?);
                }
                Ok(out.freeze())
            }
        }
    }
}

/// A single-pass, forward-only sequence of response chunks.
///
/// Chunks arrive lazily; each [`next`](ChunkStream::next) may block on
/// network I/O. The stream is not restartable: once it yields `None` it is
/// exhausted and stays exhausted. Dropping the stream releases the
/// underlying connection.
#[derive(Debug)]
pub struct ChunkStream {
    receiver: mpsc::Receiver<Result<Bytes>>,
    exhausted: bool,
}

impl ChunkStream {
    pub(crate) fn new(receiver: mpsc::Receiver<Result<Bytes>>) -> Self {
        ChunkStream {
            receiver,
            exhausted: false,
        }
    }

    /// Receive the next chunk.
    ///
    /// Returns `None` when the body is fully consumed (or the stream
    /// previously failed); `Some(Err(_))` reports a mid-body transport
    /// failure.
    pub async fn next(&mut self) -> Option<Result<Bytes>> {
        if self.exhausted {
            return None;
        }
        match self.receiver.recv().await {
            Some(item) => Some(item),
            None => {
                self.exhausted = true;
                None
            }
        }
    }

    /// Whether the stream has already yielded its final chunk.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

impl Stream for ChunkStream {
    type Item = Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.exhausted {
            return Poll::Ready(None);
        }
        match self.receiver.poll_recv(cx) {
            Poll::Ready(None) => {
                self.exhausted = true;
                Poll::Ready(None)
            }
            other => other,
        }
    }
}

/// Pump a response body into a [`ChunkStream`], re-framing the network
/// chunks to `chunk_size` (the final chunk may be shorter).
///
/// The pump runs on a spawned task feeding a bounded channel, so the body
/// is only pulled from the socket as fast as the caller consumes it.
pub(crate) fn stream_response(
    response: reqwest::Response,
    chunk_size: usize,
    endpoint: String,
) -> ChunkStream {
    // A zero size would re-frame into empty chunks forever.
    let chunk_size = chunk_size.max(1);
    let (tx, rx) = mpsc::channel(8);
    tokio::spawn(async move {
        let mut stream = response.bytes_stream();
        let mut buffer = BytesMut::new();
        while let Some(next) = stream.next().await {
            match next {
                Ok(chunk) => {
                    buffer.extend_from_slice(&chunk);
                    while buffer.len() >= chunk_size {
                        let frame = buffer.split_to(chunk_size).freeze();
                        if tx.send(Ok(frame)).await.is_err() {
                            return; // receiver dropped
                        }
                    }
                }
                Err(e) => {
                    let _ = tx.send(Err(Error::translate(e, &endpoint))).await;
                    return;
                }
            }
        }
        if !buffer.is_empty() {
            let _ = tx.send(Ok(buffer.freeze())).await;
        }
    });
    ChunkStream::new(rx)
}
