//! TLS verification setup.
//!
//! [`TlsConfig`] collects the TLS options a client is constructed with: a CA
//! bundle to verify the server against, an optional client certificate/key
//! pair, and the `insecure` escape hatch. [`TlsConfig::load`] reads and
//! parses all certificate material up front, so a broken configuration fails
//! with [`Error::SslConfiguration`] before any socket is opened.
//!
//! Verification itself (chain and hostname checks) is delegated to the
//! rustls-backed TLS stack once the material is wired into the HTTP client
//! builder. With `insecure` set, certificate and hostname verification are
//! skipped but the channel is still encrypted.
//!
//! # Examples
//!
//! ```ignore
//! use glance_http::TlsConfig;
//!
//! let tls = TlsConfig {
//!     cacert: Some("/etc/ssl/certs/internal-ca.pem".into()),
//!     ..TlsConfig::default()
//! };
//! // Fails here, before any network I/O, if the bundle is unreadable.
//! let material = tls.load()?;
//! ```

use crate::error::{Error, Result};
use reqwest::{Certificate, ClientBuilder, Identity};
use std::fs;
use std::path::{Path, PathBuf};

/// TLS options for a client.
///
/// All paths refer to PEM files owned by the caller. The default
/// configuration verifies against the system trust store, sends no client
/// certificate, and keeps verification enabled.
#[derive(Debug, Clone)]
pub struct TlsConfig {
    /// Path to a CA bundle used to verify the server certificate.
    pub cacert: Option<PathBuf>,
    /// Path to a client certificate presented to the server.
    pub cert_file: Option<PathBuf>,
    /// Path to the private key for `cert_file`. May be omitted when the
    /// certificate file carries the key as well.
    pub key_file: Option<PathBuf>,
    /// Skip certificate and hostname verification. TLS is still negotiated.
    pub insecure: bool,
    /// Request TLS-level compression. The rustls stack never negotiates
    /// compression, so enabling this has no effect beyond a debug note.
    pub ssl_compression: bool,
}

impl Default for TlsConfig {
    fn default() -> Self {
        TlsConfig {
            cacert: None,
            cert_file: None,
            key_file: None,
            insecure: false,
            ssl_compression: true,
        }
    }
}

/// Certificate material loaded and validated from a [`TlsConfig`].
///
/// Existence of a value of this type means every configured file was read
/// and parsed successfully; the terminal failure case is the
/// [`Error::SslConfiguration`] returned by [`TlsConfig::load`].
#[derive(Debug)]
pub(crate) struct TlsMaterial {
    ca: Option<Certificate>,
    identity: Option<Identity>,
    insecure: bool,
}

impl TlsConfig {
    /// Read and parse all configured certificate files.
    ///
    /// This performs no network I/O. Any unreadable or malformed file fails
    /// with [`Error::SslConfiguration`], naming the offending path.
    pub(crate) fn load(&self) -> Result<TlsMaterial> {
        let ca = match &self.cacert {
            Some(path) => {
                let pem = read_pem(path, "CA bundle")?;
                let cert = Certificate::from_pem(&pem).map_err(|e| {
                    Error::SslConfiguration(format!(
                        "malformed CA bundle {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                Some(cert)
            }
            None => None,
        };

        let identity = match (&self.cert_file, &self.key_file) {
            (Some(cert_path), key_path) => {
                let mut pem = read_pem(cert_path, "client certificate")?;
                if let Some(key_path) = key_path {
                    pem.extend_from_slice(&read_pem(key_path, "client key")?);
                }
                let identity = Identity::from_pem(&pem).map_err(|e| {
                    Error::SslConfiguration(format!(
                        "unusable client certificate {}: {}",
                        cert_path.display(),
                        e
                    ))
                })?;
                Some(identity)
            }
            (None, Some(key_path)) => {
                return Err(Error::SslConfiguration(format!(
                    "client key {} given without a certificate",
                    key_path.display()
                )));
            }
            (None, None) => None,
        };

        if self.ssl_compression {
            tracing::debug!("TLS compression requested; the TLS backend never negotiates it");
        }

        Ok(TlsMaterial {
            ca,
            identity,
            insecure: self.insecure,
        })
    }
}

impl TlsMaterial {
    /// Wire the loaded material into an HTTP client builder.
    pub(crate) fn configure(self, mut builder: ClientBuilder) -> ClientBuilder {
        if let Some(ca) = self.ca {
            builder = builder.add_root_certificate(ca);
        }
        if let Some(identity) = self.identity {
            builder = builder.identity(identity);
        }
        if self.insecure {
            builder = builder.danger_accept_invalid_certs(true);
        }
        builder
    }
}

fn read_pem(path: &Path, what: &str) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| {
        Error::SslConfiguration(format!("unable to read {} {}: {}", what, path.display(), e))
    })
}
