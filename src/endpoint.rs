//! Service endpoint parsing.
//!
//! An [`Endpoint`] is the parsed form of the service URL a client is
//! constructed with. It is split once, validated, and immutable afterwards;
//! request paths are joined onto it to build full request URLs.
//!
//! The split follows urlsplit semantics: an endpoint with no path component
//! keeps an empty path rather than being normalized to `/`.
//!
//! # Examples
//!
//! ```
//! use glance_http::Endpoint;
//!
//! let endpoint = Endpoint::parse("http://example.com:9292").unwrap();
//! assert_eq!(endpoint.scheme(), "http");
//! assert_eq!(endpoint.netloc(), "example.com:9292");
//! assert_eq!(endpoint.path(), "");
//! assert_eq!(endpoint.join("/v1/images"), "http://example.com:9292/v1/images");
//! ```

use crate::error::{Error, Result};
use url::Url;

/// A parsed, validated service endpoint.
///
/// Holds the five urlsplit components of the endpoint URL. Only `http` and
/// `https` schemes are accepted; a missing host fails parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    scheme: String,
    netloc: String,
    path: String,
    query: String,
    fragment: String,
}

impl Endpoint {
    /// Parse an endpoint URL into its components.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] when the URL is malformed, the
    /// scheme is not `http`/`https`, or no host can be determined.
    ///
    /// # Examples
    ///
    /// ```
    /// use glance_http::Endpoint;
    ///
    /// let endpoint = Endpoint::parse("https://glance.internal:9292/v2").unwrap();
    /// assert_eq!(endpoint.netloc(), "glance.internal:9292");
    /// assert_eq!(endpoint.path(), "/v2");
    ///
    /// assert!(Endpoint::parse("bogus").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self> {
        let url = Url::parse(raw)
            .map_err(|e| Error::InvalidEndpoint(format!("{}: {}", raw, e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::InvalidEndpoint(format!(
                "{}: unsupported scheme '{}'",
                raw,
                url.scheme()
            )));
        }

        let host = url
            .host_str()
            .ok_or_else(|| Error::InvalidEndpoint(format!("{}: no host", raw)))?;
        let netloc = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };

        // Url normalizes an absent path to "/"; urlsplit keeps it empty.
        // Check the raw authority section for an explicit path component.
        let after_scheme = raw.splitn(2, "://").nth(1).unwrap_or("");
        let authority_and_path = after_scheme
            .split(|c| c == '?' || c == '#')
            .next()
            .unwrap_or("");
        let path = if authority_and_path.contains('/') {
            url.path().to_string()
        } else {
            String::new()
        };

        Ok(Endpoint {
            scheme: url.scheme().to_string(),
            netloc,
            path,
            query: url.query().unwrap_or("").to_string(),
            fragment: url.fragment().unwrap_or("").to_string(),
        })
    }

    /// The URL scheme (`http` or `https`).
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// The network location: `host` or `host:port`.
    ///
    /// This is the value embedded in [`Error::Communication`] messages.
    pub fn netloc(&self) -> &str {
        &self.netloc
    }

    /// The path component; empty when the endpoint URL has none.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The query string, without the leading `?`; empty when absent.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The fragment, without the leading `#`; empty when absent.
    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// Whether this endpoint uses TLS.
    pub fn is_https(&self) -> bool {
        self.scheme == "https"
    }

    /// Join a request path (optionally carrying its own query string) onto
    /// the endpoint, producing a full request URL.
    pub fn join(&self, path: &str) -> String {
        format!(
            "{}://{}{}{}",
            self.scheme,
            self.netloc,
            self.path.trim_end_matches('/'),
            path
        )
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}://{}{}", self.scheme, self.netloc, self.path)
    }
}
