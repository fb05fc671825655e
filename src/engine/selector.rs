//! Engine selection.
//!
//! Validates that the engine an [`EngineOptions`] value asks for is actually
//! usable on this platform, then delegates context construction to the
//! variant's factory. Stateless per call; validation failures are returned to
//! the caller with no fallback to another engine.

use super::options::EngineOptions;
use super::params::{Role, TlsParams};
use super::{probe, EngineError, Result, TlsContext, NATIVE_ENGINE_NAME};

/// Build a TLS context for the given options, role and base parameters.
///
/// For the native variant this checks engine availability first and, when the
/// parameters request ALPN, ALPN support as well. Both checks fail fast with
/// no automatic substitution of the default engine; callers wanting fallback
/// must catch [`EngineError::EngineUnavailable`] and retry with
/// [`EngineOptions::Default`] themselves.
pub fn build(options: &EngineOptions, role: Role, params: &TlsParams) -> Result<TlsContext> {
    build_with_capabilities(
        probe::is_available(),
        probe::is_alpn_available(),
        options,
        role,
        params,
    )
}

/// Capability-explicit half of [`build`]; the public entry point feeds it the
/// probed values.
fn build_with_capabilities(
    available: bool,
    alpn_available: bool,
    options: &EngineOptions,
    role: Role,
    params: &TlsParams,
) -> Result<TlsContext> {
    if let EngineOptions::Native(_) = options {
        if !available {
            log::warn!("native TLS engine '{}' requested but not available", NATIVE_ENGINE_NAME);
            return Err(EngineError::EngineUnavailable(NATIVE_ENGINE_NAME));
        }
        if params.alpn_requested() && !alpn_available {
            log::warn!(
                "ALPN requested but engine '{}' does not support it",
                NATIVE_ENGINE_NAME
            );
            return Err(EngineError::AlpnUnsupported(NATIVE_ENGINE_NAME));
        }
    }

    log::debug!("building {:?} context with engine '{}'", role, options.kind().as_str());
    options.context_factory().create(role, params)
}
