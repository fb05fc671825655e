//! Pluggable TLS engine abstraction and context factory.
//!
//! This module selects among TLS engine implementations (platform-default vs.
//! native-accelerated), validates their availability, and produces configured
//! TLS contexts.
//!
//! # Architecture
//!
//! 1. [`EngineOptions`] is a closed family of configuration values, one
//!    variant per engine; values are immutable except through owned
//!    builder-style setters.
//! 2. [`probe::is_available`] and [`probe::is_alpn_available`] answer whether
//!    the native engine can be used at all; results are cached process-wide.
//! 3. [`build`] validates the requested engine against the probe, then
//!    delegates to the variant's [`SslContextFactory`] to construct a
//!    [`TlsContext`].
//!
//! # Examples
//!
//! ```no_run
//! use tls_engine::engine::{build, EngineOptions, NativeEngineOptions, Role, TlsParams, TlsVersion};
//!
//! let options = EngineOptions::Native(
//!     NativeEngineOptions::new().set_session_cache_enabled(false),
//! );
//! let params = TlsParams::new()
//!     .version_range(TlsVersion::Tls12, TlsVersion::Tls13)
//!     .alpn(&["h2", "http/1.1"])
//!     .cert_file("server.pem");
//!
//! let ctx = build(&options, Role::Server, &params).unwrap();
//! assert!(!ctx.session_cache_enabled());
//! ```

pub mod factory;
pub mod options;
pub mod params;
pub mod probe;
pub mod selector;

pub use factory::{SslContextFactory, TlsContext};
pub use options::{DefaultEngineOptions, EngineKind, EngineOptions, NativeEngineOptions};
pub use params::{ClientVerify, Role, TlsParams, TlsVersion};
pub use probe::{is_alpn_available, is_available};
pub use selector::build;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// TLS engine errors
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid configuration value for '{key}': expected {expected}, found {found}")]
    Config {
        key: String,
        expected: &'static str,
        found: String,
    },

    #[error("TLS engine '{0}' is not available on this platform")]
    EngineUnavailable(&'static str),

    #[error("ALPN was requested but engine '{0}' does not support it")]
    AlpnUnsupported(&'static str),

    #[error("invalid TLS version: {0}")]
    InvalidVersion(String),

    #[error("certificate error: {0}")]
    Certificate(String),

    #[error("OpenSSL error: {0}")]
    OpenSsl(#[from] openssl::error::ErrorStack),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Name of the native engine, used in error messages and logs.
pub const NATIVE_ENGINE_NAME: &str = "openssl";
