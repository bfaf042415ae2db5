//! Header composition for outgoing requests.
//!
//! Final request headers are built from three layers, in increasing
//! precedence: stored identity headers, the auth token (as `X-Auth-Token`),
//! and per-call headers.
//!
//! Two invariants hold:
//!
//! - Stored identity headers never contain `X-Auth-Token`; any such entry is
//!   split off at construction and carried as the client's token instead.
//! - `X-Auth-Token` is only sent when the effective token is non-empty.
//!
//! Header values are encoded as UTF-8 bytes; entries with an absent value
//! are dropped rather than sent empty.
//!
//! # Examples
//!
//! ```
//! use glance_http::client::headers::{encode_headers, split_auth_token};
//!
//! let identity = encode_headers([
//!     ("X-Auth-Token", Some("seeded")),
//!     ("X-User-Id", Some("user")),
//!     ("X-Service-Catalog", None),
//! ]).unwrap();
//!
//! let (identity, token) = split_auth_token(identity);
//! assert_eq!(token.as_deref(), Some("seeded"));
//! assert!(!identity.contains_key("x-auth-token"));
//! assert!(!identity.contains_key("x-service-catalog"));
//! ```

use crate::error::{Error, Result};
use http::header::{HeaderMap, HeaderName, HeaderValue};

/// Header carrying the authentication token.
pub const X_AUTH_TOKEN: &str = "x-auth-token";

/// Remove any `X-Auth-Token` entry from a header map, returning the stripped
/// map and the removed token value, if one was present.
pub fn split_auth_token(mut headers: HeaderMap) -> (HeaderMap, Option<String>) {
    let token = headers
        .remove(X_AUTH_TOKEN)
        .and_then(|value| value.to_str().map(str::to_owned).ok());
    (headers, token)
}

/// Encode `(name, value)` pairs into a header map.
///
/// Values are encoded as their UTF-8 bytes, so non-ASCII text survives
/// unchanged on the wire. Pairs with an absent value are dropped.
///
/// # Errors
///
/// Returns [`Error::InvalidHeader`] when a name or value contains bytes
/// that are not legal in an HTTP header.
pub fn encode_headers<'a, I>(headers: I) -> Result<HeaderMap>
where
    I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
{
    let mut out = HeaderMap::new();
    for (name, value) in headers {
        let Some(value) = value else { continue };
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| Error::InvalidHeader(format!("{}: {}", name, e)))?;
        let value = HeaderValue::from_bytes(value.as_bytes())
            .map_err(|e| Error::InvalidHeader(format!("{}: {}", name, e)))?;
        out.insert(name, value);
    }
    Ok(out)
}

/// Merge identity headers, the auth token and per-call headers into the
/// final outgoing header map. Per-call headers win on key collision; the
/// token is injected only when non-empty.
pub fn compose(
    identity: &HeaderMap,
    token: Option<&str>,
    per_call: Option<&HeaderMap>,
) -> Result<HeaderMap> {
    let mut out = identity.clone();
    if let Some(token) = token {
        if !token.is_empty() {
            let value = HeaderValue::from_str(token)
                .map_err(|e| Error::InvalidHeader(format!("{}: {}", X_AUTH_TOKEN, e)))?;
            out.insert(HeaderName::from_static(X_AUTH_TOKEN), value);
        }
    }
    if let Some(extra) = per_call {
        for (name, value) in extra {
            out.insert(name.clone(), value.clone());
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_removes_token() {
        let identity = encode_headers([
            ("X-Auth-Token", Some("auth_token")),
            ("X-User-Id", Some("user")),
            ("X-Tenant-Id", Some("tenant")),
            ("X-Roles", Some("roles")),
        ])
        .unwrap();
        let (stripped, token) = split_auth_token(identity);
        assert_eq!(token.as_deref(), Some("auth_token"));
        assert!(!stripped.contains_key(X_AUTH_TOKEN));
        assert_eq!(stripped.len(), 3);
    }

    #[test]
    fn test_split_without_token_is_noop() {
        let identity = encode_headers([("X-User-Id", Some("user"))]).unwrap();
        let (stripped, token) = split_auth_token(identity);
        assert!(token.is_none());
        assert_eq!(stripped.len(), 1);
    }

    #[test]
    fn test_encode_utf8_and_drop_absent() {
        let encoded = encode_headers([("test", Some("ni\u{f1}o")), ("none-val", None)]).unwrap();
        assert_eq!(
            encoded.get("test").unwrap().as_bytes(),
            b"ni\xc3\xb1o".as_slice()
        );
        assert!(!encoded.contains_key("none-val"));
    }

    #[test]
    fn test_encode_rejects_bad_name() {
        assert!(matches!(
            encode_headers([("bad name", Some("v"))]),
            Err(Error::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_compose_injects_token() {
        let identity = encode_headers([("X-User-Id", Some("user"))]).unwrap();
        let out = compose(&identity, Some("abc123"), None).unwrap();
        assert_eq!(out.get(X_AUTH_TOKEN).unwrap(), "abc123");
        assert_eq!(out.get("x-user-id").unwrap(), "user");
    }

    #[test]
    fn test_compose_skips_empty_token() {
        let identity = HeaderMap::new();
        let out = compose(&identity, Some(""), None).unwrap();
        assert!(!out.contains_key(X_AUTH_TOKEN));
    }

    #[test]
    fn test_compose_without_token_sends_none() {
        let identity = HeaderMap::new();
        let out = compose(&identity, None, None).unwrap();
        assert!(!out.contains_key(X_AUTH_TOKEN));
    }

    #[test]
    fn test_per_call_overrides_identity() {
        let identity = encode_headers([("X-User-Id", Some("user"))]).unwrap();
        let per_call = encode_headers([("X-User-Id", Some("override"))]).unwrap();
        let out = compose(&identity, None, Some(&per_call)).unwrap();
        assert_eq!(out.get("x-user-id").unwrap(), "override");
    }
}
