//! Diagnostic logging of requests and responses.
//!
//! Request and response headers plus a truncated body preview are logged at
//! `debug` level. Previews never raise on undecodable content: non-UTF-8
//! bytes are escaped and the preview is flagged so masked content is
//! distinguishable from real text.

use crate::client::transport::ResponseMeta;
use http::{HeaderMap, Method};

/// Maximum number of body bytes included in a logged preview.
pub(crate) const PREVIEW_LIMIT: usize = 1024;

/// Render a body preview that is safe to log.
///
/// Valid UTF-8 passes through; undecodable bytes are escaped (`\xNN`) and
/// flagged, truncated previews are flagged. Never fails.
pub(crate) fn preview(bytes: &[u8]) -> String {
    let truncated = bytes.len() > PREVIEW_LIMIT;
    let slice = &bytes[..bytes.len().min(PREVIEW_LIMIT)];
    let mut out = match std::str::from_utf8(slice) {
        Ok(text) => text.to_string(),
        Err(_) => format!("{} (non-UTF-8 bytes escaped)", slice.escape_ascii()),
    };
    if truncated {
        out.push_str(" (truncated)");
    }
    out
}

pub(crate) fn log_request(method: &Method, url: &str, headers: &HeaderMap, body: Option<&str>) {
    tracing::debug!(%method, url, ?headers, body, "sending request");
}

pub(crate) fn log_response(meta: &ResponseMeta, body: Option<&str>) {
    tracing::debug!(status = meta.status, headers = ?meta.headers, body, "received response");
}
