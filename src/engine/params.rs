//! Base TLS parameters consumed by the context factories.
//!
//! [`TlsParams`] is the engine-independent part of a context description:
//! protocol versions, ciphers, ALPN preferences, certificate material and
//! peer-verification policy. Engine-specific knobs live on the
//! [`crate::engine::EngineOptions`] variants instead.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::EngineError;

/// Role the produced context will play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Accepting side of the handshake
    Server,
    /// Initiating side of the handshake
    Client,
}

/// TLS protocol version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TlsVersion {
    /// TLS 1.0
    Tls10,
    /// TLS 1.1
    Tls11,
    /// TLS 1.2
    Tls12,
    /// TLS 1.3
    Tls13,
}

impl TlsVersion {
    /// Get OpenSSL protocol version constant
    pub fn to_openssl_version(self) -> openssl::ssl::SslVersion {
        use openssl::ssl::SslVersion;
        match self {
            TlsVersion::Tls10 => SslVersion::TLS1,
            TlsVersion::Tls11 => SslVersion::TLS1_1,
            TlsVersion::Tls12 => SslVersion::TLS1_2,
            TlsVersion::Tls13 => SslVersion::TLS1_3,
        }
    }

    /// Get version as string
    pub fn as_str(self) -> &'static str {
        match self {
            TlsVersion::Tls10 => "TLSv1.0",
            TlsVersion::Tls11 => "TLSv1.1",
            TlsVersion::Tls12 => "TLSv1.2",
            TlsVersion::Tls13 => "TLSv1.3",
        }
    }
}

impl FromStr for TlsVersion {
    type Err = EngineError;

    /// Parse TLS version from string (case-insensitive)
    fn from_str(s: &str) -> Result<Self, EngineError> {
        match s.to_uppercase().as_str() {
            "TLSV1.0" | "TLS1.0" | "TLSV1" | "TLS1" => Ok(TlsVersion::Tls10),
            "TLSV1.1" | "TLS1.1" => Ok(TlsVersion::Tls11),
            "TLSV1.2" | "TLS1.2" => Ok(TlsVersion::Tls12),
            "TLSV1.3" | "TLS1.3" => Ok(TlsVersion::Tls13),
            _ => Err(EngineError::InvalidVersion(s.to_string())),
        }
    }
}

/// Client certificate verification mode (server-side)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientVerify {
    /// Don't request client certificates
    None,
    /// Request client certificate but don't require it
    Optional,
    /// Require client certificate
    Required,
}

/// Certificate material: combined PEM (certificate + private key),
/// either inline or loaded from a file at context-build time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CertSource {
    /// Inline PEM bytes
    Pem(Vec<u8>),
    /// Path to a PEM file
    File(PathBuf),
}

/// Base TLS parameters (engine-independent)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsParams {
    pub(crate) min_version: Option<TlsVersion>,
    pub(crate) max_version: Option<TlsVersion>,
    pub(crate) cipher_list: Option<String>,
    pub(crate) ciphersuites: Option<String>,
    pub(crate) alpn_protocols: Vec<String>,
    pub(crate) cert: Option<CertSource>,
    pub(crate) client_verify: ClientVerify,
    pub(crate) ca_file: Option<PathBuf>,
}

impl TlsParams {
    /// Create parameters with no version bounds, no ALPN and no certificate
    pub fn new() -> Self {
        TlsParams {
            min_version: None,
            max_version: None,
            cipher_list: None,
            ciphersuites: None,
            alpn_protocols: Vec::new(),
            cert: None,
            client_verify: ClientVerify::None,
            ca_file: None,
        }
    }

    /// Pin the protocol to a single TLS version (both min and max)
    pub fn version(mut self, version: TlsVersion) -> Self {
        self.min_version = Some(version);
        self.max_version = Some(version);
        self
    }

    /// Set TLS version range
    pub fn version_range(mut self, min: TlsVersion, max: TlsVersion) -> Self {
        self.min_version = Some(min);
        self.max_version = Some(max);
        self
    }

    /// Set cipher list (for TLS <= 1.2)
    pub fn cipher_list(mut self, ciphers: impl Into<String>) -> Self {
        self.cipher_list = Some(ciphers.into());
        self
    }

    /// Set cipher suites (for TLS 1.3)
    pub fn ciphersuites(mut self, ciphers: impl Into<String>) -> Self {
        self.ciphersuites = Some(ciphers.into());
        self
    }

    /// Set ALPN protocols in preference order
    pub fn alpn(mut self, protocols: &[&str]) -> Self {
        self.alpn_protocols = protocols.iter().map(|p| p.to_string()).collect();
        self
    }

    /// Whether any ALPN protocol was requested
    pub fn alpn_requested(&self) -> bool {
        !self.alpn_protocols.is_empty()
    }

    /// Use inline PEM (certificate + private key)
    pub fn cert_pem(mut self, pem: &[u8]) -> Self {
        self.cert = Some(CertSource::Pem(pem.to_vec()));
        self
    }

    /// Load certificate and private key from a PEM file at build time
    pub fn cert_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cert = Some(CertSource::File(path.as_ref().to_path_buf()));
        self
    }

    /// Set client certificate verification mode (server role only)
    pub fn client_verify(mut self, mode: ClientVerify) -> Self {
        self.client_verify = mode;
        self
    }

    /// Set CA file for peer certificate verification
    pub fn ca_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.ca_file = Some(path.as_ref().to_path_buf());
        self
    }
}

impl Default for TlsParams {
    fn default() -> Self {
        TlsParams::new()
    }
}
