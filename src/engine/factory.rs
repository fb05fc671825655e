//! Context factories.
//!
//! Each [`crate::engine::EngineOptions`] variant exposes an
//! [`SslContextFactory`] that turns base TLS parameters into a ready
//! [`TlsContext`]. The factories share the parameter-application code and
//! differ only in engine gating and engine-specific knobs: the native factory
//! re-checks engine availability and applies the session-cache flag to server
//! contexts.

use std::fs::File;
use std::io::Read;

use openssl::pkey::PKey;
use openssl::ssl::{
    SslContext, SslContextBuilder, SslMethod, SslSessionCacheMode, SslVerifyMode,
};
use openssl::x509::X509;

use super::options::EngineKind;
use super::params::{CertSource, ClientVerify, Role, TlsParams};
use super::{probe, EngineError, Result, NATIVE_ENGINE_NAME};

/// A fully configured TLS context, ready for network I/O code.
///
/// Immutable once built; the engine options and parameters that produced it
/// are not retained.
pub struct TlsContext {
    ctx: SslContext,
    role: Role,
    engine: EngineKind,
    session_cache_enabled: bool,
}

impl TlsContext {
    /// Role this context was built for
    pub fn role(&self) -> Role {
        self.role
    }

    /// Engine that backs this context
    pub fn engine(&self) -> EngineKind {
        self.engine
    }

    /// Whether the server-side session cache is enabled for this context.
    ///
    /// Client contexts keep the library default; the native engine's flag
    /// only applies to server contexts.
    pub fn session_cache_enabled(&self) -> bool {
        self.session_cache_enabled
    }

    /// The underlying OpenSSL context
    pub fn ssl_context(&self) -> &SslContext {
        &self.ctx
    }
}

impl std::fmt::Debug for TlsContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsContext")
            .field("role", &self.role)
            .field("engine", &self.engine)
            .field("session_cache_enabled", &self.session_cache_enabled)
            .finish_non_exhaustive()
    }
}

/// Capability of producing TLS contexts for one engine.
pub trait SslContextFactory {
    /// Build a context for `role` from the given base parameters.
    ///
    /// Does not mutate the parameters; fails with
    /// [`EngineError::EngineUnavailable`] if the factory's engine cannot be
    /// instantiated.
    fn create(&self, role: Role, params: &TlsParams) -> Result<TlsContext>;
}

/// Factory for the platform-default engine: applies the base parameters and
/// nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultContextFactory;

impl DefaultContextFactory {
    pub fn new() -> Self {
        DefaultContextFactory
    }
}

impl SslContextFactory for DefaultContextFactory {
    fn create(&self, role: Role, params: &TlsParams) -> Result<TlsContext> {
        let builder = configure(role, params)?;
        Ok(TlsContext {
            ctx: builder.build(),
            role,
            engine: EngineKind::Default,
            session_cache_enabled: true,
        })
    }
}

/// Factory for the native-accelerated engine.
///
/// Owns the session-cache flag from
/// [`crate::engine::NativeEngineOptions`] and applies it to server contexts.
#[derive(Debug, Clone, Copy)]
pub struct NativeContextFactory {
    session_cache_enabled: bool,
}

impl NativeContextFactory {
    pub fn new(session_cache_enabled: bool) -> Self {
        NativeContextFactory {
            session_cache_enabled,
        }
    }

    /// Availability-explicit half of [`SslContextFactory::create`]; the trait
    /// method feeds it the probed value.
    fn create_with_availability(
        &self,
        available: bool,
        role: Role,
        params: &TlsParams,
    ) -> Result<TlsContext> {
        // The selector checks availability up front; this guards direct
        // factory use.
        if !available {
            return Err(EngineError::EngineUnavailable(NATIVE_ENGINE_NAME));
        }

        let mut builder = configure(role, params)?;

        // The flag is server-only; client contexts keep the library default.
        let session_cache_enabled = match role {
            Role::Server => {
                let mode = if self.session_cache_enabled {
                    SslSessionCacheMode::SERVER
                } else {
                    SslSessionCacheMode::OFF
                };
                builder.set_session_cache_mode(mode);
                self.session_cache_enabled
            }
            Role::Client => true,
        };

        Ok(TlsContext {
            ctx: builder.build(),
            role,
            engine: EngineKind::Native,
            session_cache_enabled,
        })
    }
}

impl SslContextFactory for NativeContextFactory {
    fn create(&self, role: Role, params: &TlsParams) -> Result<TlsContext> {
        self.create_with_availability(probe::is_available(), role, params)
    }
}

/// Apply the base parameters to a fresh context builder.
fn configure(role: Role, params: &TlsParams) -> Result<SslContextBuilder> {
    let method = match role {
        Role::Server => SslMethod::tls_server(),
        Role::Client => SslMethod::tls_client(),
    };
    let mut builder = SslContextBuilder::new(method)?;

    if let Some(min) = params.min_version {
        builder.set_min_proto_version(Some(min.to_openssl_version()))?;
    }
    if let Some(max) = params.max_version {
        builder.set_max_proto_version(Some(max.to_openssl_version()))?;
    }

    if let Some(ref ciphers) = params.cipher_list {
        builder.set_cipher_list(ciphers)?;
    }
    if let Some(ref ciphers) = params.ciphersuites {
        builder.set_ciphersuites(ciphers)?;
    }

    if params.alpn_requested() {
        set_alpn(&mut builder, role, &params.alpn_protocols)?;
    }

    match params.cert {
        Some(ref source) => load_cert(&mut builder, source)?,
        None if role == Role::Server => {
            return Err(EngineError::Certificate(
                "server context requires a certificate".to_string(),
            ));
        }
        None => {}
    }

    match role {
        Role::Server => {
            let mode = match params.client_verify {
                ClientVerify::None => SslVerifyMode::NONE,
                ClientVerify::Optional => SslVerifyMode::PEER,
                ClientVerify::Required => SslVerifyMode::PEER | SslVerifyMode::FAIL_IF_NO_PEER_CERT,
            };
            builder.set_verify(mode);
        }
        Role::Client => {
            // Verification of the server certificate is on unless the caller
            // supplied no trust anchors at all.
            if params.ca_file.is_some() {
                builder.set_verify(SslVerifyMode::PEER);
            } else {
                builder.set_verify(SslVerifyMode::NONE);
            }
        }
    }

    if let Some(ref ca) = params.ca_file {
        builder.set_ca_file(ca)?;
    }

    Ok(builder)
}

/// Protocol names carry a one-byte length prefix on the wire.
const MAX_ALPN_PROTOCOL_LEN: usize = 255;

/// Configure ALPN: clients advertise, servers select.
fn set_alpn(builder: &mut SslContextBuilder, role: Role, protocols: &[String]) -> Result<()> {
    if let Some(proto) = protocols.iter().find(|p| p.len() > MAX_ALPN_PROTOCOL_LEN) {
        return Err(EngineError::Config {
            key: "alpn".to_string(),
            expected: "protocol name of at most 255 bytes",
            found: format!("{} bytes", proto.len()),
        });
    }

    match role {
        Role::Client => {
            // Wire format is length-prefixed protocol names.
            let mut alpn_bytes = Vec::new();
            for proto in protocols {
                alpn_bytes.push(proto.len() as u8);
                alpn_bytes.extend_from_slice(proto.as_bytes());
            }
            builder.set_alpn_protos(&alpn_bytes)?;
        }
        Role::Server => {
            let ours: Vec<Vec<u8>> = protocols.iter().map(|p| p.as_bytes().to_vec()).collect();
            builder.set_alpn_select_callback(move |_ssl, client_protos| {
                let mut pos = 0;
                while pos < client_protos.len() {
                    let len = client_protos[pos] as usize;
                    pos += 1;
                    if pos + len > client_protos.len() {
                        break;
                    }
                    let client_proto = &client_protos[pos..pos + len];
                    if ours.iter().any(|p| p.as_slice() == client_proto) {
                        // Return the match from client_protos (valid lifetime).
                        return Ok(client_proto);
                    }
                    pos += len;
                }
                Err(openssl::ssl::AlpnError::NOACK)
            });
        }
    }
    Ok(())
}

/// Load a combined PEM (certificate + private key) into the builder.
fn load_cert(builder: &mut SslContextBuilder, source: &CertSource) -> Result<()> {
    let pem = match source {
        CertSource::Pem(bytes) => bytes.clone(),
        CertSource::File(path) => {
            let mut bytes = Vec::new();
            File::open(path)?.read_to_end(&mut bytes)?;
            bytes
        }
    };

    let cert = X509::from_pem(&pem)
        .map_err(|e| EngineError::Certificate(format!("failed to load certificate: {}", e)))?;
    builder.set_certificate(&cert)?;

    let key = PKey::private_key_from_pem(&pem)
        .map_err(|e| EngineError::Certificate(format!("failed to load private key: {}", e)))?;
    builder.set_private_key(&key)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::params::TlsVersion;

    /// Self-signed certificate plus key as combined PEM, generated fresh so
    /// no key material is checked in.
    fn test_cert_pem() -> Vec<u8> {
        use openssl::asn1::Asn1Time;
        use openssl::bn::{BigNum, MsbOption};
        use openssl::hash::MessageDigest;
        use openssl::nid::Nid;
        use openssl::rsa::Rsa;
        use openssl::x509::X509NameBuilder;

        let rsa = Rsa::generate(2048).unwrap();
        let pkey = PKey::from_rsa(rsa).unwrap();

        let mut name = X509NameBuilder::new().unwrap();
        name.append_entry_by_nid(Nid::COMMONNAME, "localhost").unwrap();
        let name = name.build();

        let mut builder = X509::builder().unwrap();
        builder.set_version(2).unwrap();
        let serial = {
            let mut bn = BigNum::new().unwrap();
            bn.rand(159, MsbOption::MAYBE_ZERO, false).unwrap();
            bn.to_asn1_integer().unwrap()
        };
        builder.set_serial_number(&serial).unwrap();
        builder.set_subject_name(&name).unwrap();
        builder.set_issuer_name(&name).unwrap();
        builder.set_pubkey(&pkey).unwrap();
        builder
            .set_not_before(&Asn1Time::days_from_now(0).unwrap())
            .unwrap();
        builder
            .set_not_after(&Asn1Time::days_from_now(1).unwrap())
            .unwrap();
        builder.sign(&pkey, MessageDigest::sha256()).unwrap();
        let cert = builder.build();

        let mut pem = cert.to_pem().unwrap();
        pem.extend_from_slice(&pkey.private_key_to_pem_pkcs8().unwrap());
        pem
    }

    #[test]
    fn test_default_factory_client() {
        let params = TlsParams::new().version(TlsVersion::Tls12);
        let ctx = DefaultContextFactory::new()
            .create(Role::Client, &params)
            .unwrap();
        assert_eq!(ctx.role(), Role::Client);
        assert_eq!(ctx.engine(), EngineKind::Default);
    }

    #[test]
    fn test_server_requires_certificate() {
        let err = DefaultContextFactory::new()
            .create(Role::Server, &TlsParams::new())
            .unwrap_err();
        assert!(matches!(err, EngineError::Certificate(_)));
    }

    #[test]
    fn test_native_server_session_cache_flag() {
        let params = TlsParams::new().cert_pem(&test_cert_pem());

        let ctx = NativeContextFactory::new(false)
            .create(Role::Server, &params)
            .unwrap();
        assert!(!ctx.session_cache_enabled());

        let ctx = NativeContextFactory::new(true)
            .create(Role::Server, &params)
            .unwrap();
        assert!(ctx.session_cache_enabled());
    }

    #[test]
    fn test_native_client_ignores_session_cache_flag() {
        let ctx = NativeContextFactory::new(false)
            .create(Role::Client, &TlsParams::new())
            .unwrap();
        assert_eq!(ctx.role(), Role::Client);
        assert!(ctx.session_cache_enabled());
    }

    #[test]
    fn test_alpn_configuration() {
        let params = TlsParams::new().alpn(&["h2", "http/1.1"]);
        assert!(DefaultContextFactory::new()
            .create(Role::Client, &params)
            .is_ok());

        let params = params.cert_pem(&test_cert_pem());
        assert!(DefaultContextFactory::new()
            .create(Role::Server, &params)
            .is_ok());
    }

    #[test]
    fn test_unavailable_engine_is_defensive_error() {
        let err = NativeContextFactory::new(true)
            .create_with_availability(false, Role::Client, &TlsParams::new())
            .unwrap_err();
        assert!(matches!(err, EngineError::EngineUnavailable(_)));
    }

    #[test]
    fn test_oversized_alpn_protocol_rejected() {
        let long_name = "x".repeat(256);
        let params = TlsParams::new().alpn(&[long_name.as_str()]);

        let err = DefaultContextFactory::new()
            .create(Role::Client, &params)
            .unwrap_err();
        assert!(matches!(err, EngineError::Config { ref key, .. } if key == "alpn"));

        let params = params.cert_pem(&test_cert_pem());
        let err = DefaultContextFactory::new()
            .create(Role::Server, &params)
            .unwrap_err();
        assert!(matches!(err, EngineError::Config { .. }));
    }

    #[test]
    fn test_max_length_alpn_protocol_accepted() {
        let name = "x".repeat(255);
        let params = TlsParams::new().alpn(&[name.as_str()]);
        assert!(DefaultContextFactory::new()
            .create(Role::Client, &params)
            .is_ok());
    }

    #[test]
    fn test_cert_from_file() {
        use std::io::Write;

        let pem = test_cert_pem();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&pem).unwrap();

        let params = TlsParams::new().cert_file(file.path());
        assert!(DefaultContextFactory::new()
            .create(Role::Server, &params)
            .is_ok());
    }

    #[test]
    fn test_bad_pem_is_certificate_error() {
        let params = TlsParams::new().cert_pem(b"not a pem");
        let err = DefaultContextFactory::new()
            .create(Role::Server, &params)
            .unwrap_err();
        assert!(matches!(err, EngineError::Certificate(_)));
    }
}
