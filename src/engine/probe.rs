//! Native engine capability probing.
//!
//! Answers whether the native TLS library is loadable on this platform and
//! whether it supports ALPN. The underlying answer cannot change while the
//! process runs, so the probe executes at most once and its result is cached
//! process-wide; concurrent first calls are safe.

use once_cell::sync::OnceCell;
use openssl::ssl::{SslContextBuilder, SslMethod};

/// ALPN entered OpenSSL in 1.0.2 (0x1_00_02_000 in version-number encoding).
const ALPN_MIN_VERSION: i64 = 0x1_00_02_000;

#[derive(Debug, Clone, Copy)]
struct Capabilities {
    available: bool,
    alpn: bool,
}

static CAPABILITIES: OnceCell<Capabilities> = OnceCell::new();

fn capabilities() -> Capabilities {
    *CAPABILITIES.get_or_init(probe)
}

/// Runs the one-time library probe.
///
/// Availability means the linked library initializes and can hand out an SSL
/// context builder. Any failure is reported as unavailable rather than
/// propagated; retrying cannot change the outcome.
fn probe() -> Capabilities {
    openssl::init();

    let available = SslContextBuilder::new(SslMethod::tls()).is_ok();
    let alpn = available && openssl::version::number() >= ALPN_MIN_VERSION;

    log::debug!(
        "native TLS engine probe: available={}, alpn={}, version={}",
        available,
        alpn,
        openssl::version::version()
    );

    Capabilities { available, alpn }
}

/// Whether the native TLS engine is available on this platform.
pub fn is_available() -> bool {
    capabilities().available
}

/// Whether the native TLS engine supports ALPN.
///
/// Always `false` when [`is_available`] is `false`.
pub fn is_alpn_available() -> bool {
    capabilities().alpn
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_is_stable() {
        let first = is_available();
        for _ in 0..10 {
            assert_eq!(is_available(), first);
        }
    }

    #[test]
    fn test_alpn_implies_available() {
        if is_alpn_available() {
            assert!(is_available());
        }
    }

    #[test]
    fn test_concurrent_first_calls_agree() {
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| (is_available(), is_alpn_available())))
            .collect();

        let mut results = Vec::new();
        for handle in handles {
            results.push(handle.join().unwrap());
        }
        assert!(results.windows(2).all(|w| w[0] == w[1]));
    }
}
