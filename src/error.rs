//! Error types and result handling.
//!
//! The transport layer surfaces a small taxonomy: malformed endpoints,
//! network-level communication failures (carrying the target host:port),
//! TLS configuration problems (detected before any socket is opened), and
//! TLS certificate verification failures. Anything else propagates as the
//! wrapped source error.
//!
//! No retries happen at this layer; retry policy belongs to callers.

use thiserror::Error;

/// Errors produced by the Glance HTTP transport.
#[derive(Error, Debug)]
pub enum Error {
    /// The endpoint URL could not be parsed or has no usable scheme/host.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// A network-level failure (refused, reset, DNS, timeout) while talking
    /// to the service. The message names the target host:port.
    #[error("error communicating with {endpoint}: {detail}")]
    Communication {
        /// The `host:port` the request was addressed to.
        endpoint: String,
        /// Description of the underlying failure.
        detail: String,
    },

    /// The TLS configuration is unusable: unreadable or malformed CA bundle,
    /// or a broken client certificate/key pair. Raised before any network
    /// I/O is attempted.
    #[error("SSL configuration error: {0}")]
    SslConfiguration(String),

    /// The peer presented a certificate that failed chain or hostname
    /// verification.
    #[error("SSL certificate verification failed: {0}")]
    SslCertificate(String),

    /// A header name or value could not be encoded for the wire.
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// A structured request body could not be JSON-encoded.
    #[error("failed to encode request body as JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Any other HTTP-layer error, propagated unchanged.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error, propagated unchanged.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Translate a reqwest failure into the transport taxonomy.
    ///
    /// Connection-level failures (refused, reset, DNS, timeout) become
    /// [`Error::Communication`] with the target `host:port` in the message.
    /// Certificate verification failures surfacing through the connect path
    /// become [`Error::SslCertificate`]. Everything else passes through as
    /// [`Error::Http`].
    pub(crate) fn translate(err: reqwest::Error, endpoint: &str) -> Error {
        if err.is_timeout() {
            return Error::Communication {
                endpoint: endpoint.to_string(),
                detail: format!("request timed out ({})", source_chain(&err)),
            };
        }
        if err.is_connect() {
            let detail = source_chain(&err);
            // rustls verification failures surface as connect errors; the
            // source chain is the only place the cause is visible.
            if detail.contains("certificate") || detail.contains("Certificate") {
                return Error::SslCertificate(detail);
            }
            return Error::Communication {
                endpoint: endpoint.to_string(),
                detail,
            };
        }
        Error::Http(err)
    }
}

/// Render an error and its full source chain as a single string.
fn source_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut current = err.source();
    while let Some(source) = current {
        out.push_str(": ");
        out.push_str(&source.to_string());
        current = source.source();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_communication_message_contains_endpoint() {
        let err = Error::Communication {
            endpoint: "example.com:9292".to_string(),
            detail: "connection refused".to_string(),
        };
        assert!(err.to_string().contains("example.com:9292"));
    }

    #[test]
    fn test_wrapped_errors_keep_their_message() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        assert!(Error::from(io).to_string().contains("refused"));

        let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let rendered = Error::from(json).to_string();
        assert!(rendered.len() > "failed to encode request body as JSON: ".len());
    }

    #[test]
    fn test_source_chain_flattens_nested_errors() {
        let inner = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let chain = source_chain(&inner);
        assert!(chain.contains("refused"));
    }
}
