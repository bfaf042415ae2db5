//! Client configuration.

use crate::tls::TlsConfig;
use http::HeaderMap;

/// Default request timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: f64 = 600.0;

/// Default size of chunks yielded for `application/octet-stream` responses.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Configuration for a [`HttpClient`](crate::HttpClient).
///
/// An explicit record of every recognized option and its default; there is
/// no dynamic or global configuration state. The endpoint URL is passed
/// separately at construction.
///
/// # Examples
///
/// ```
/// use glance_http::ClientConfig;
///
/// let config = ClientConfig {
///     token: Some("abc123".to_string()),
///     ..ClientConfig::default()
/// };
/// assert_eq!(config.timeout_secs, 600.0);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Authentication token injected as `X-Auth-Token` on every request.
    /// An `X-Auth-Token` entry in `identity_headers` takes precedence.
    pub token: Option<String>,
    /// Identity headers forwarded on every request (user id, tenant id,
    /// roles). Any `X-Auth-Token` entry is stripped at construction and
    /// carried as the auth token instead.
    pub identity_headers: HeaderMap,
    /// Timeout in seconds, applied uniformly to connect and to each socket
    /// read. Reads that keep making progress never trip it.
    pub timeout_secs: f64,
    /// Size of chunks yielded for streamed response bodies. The final chunk
    /// may be shorter. A value of 0 is treated as 1.
    pub chunk_size: usize,
    /// TLS options (CA bundle, client certificate, insecure flag).
    pub tls: TlsConfig,
    /// User-Agent header value.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            token: None,
            identity_headers: HeaderMap::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            chunk_size: DEFAULT_CHUNK_SIZE,
            tls: TlsConfig::default(),
            user_agent: concat!("glance-http/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
