//! TLS engine selection and context construction for OpenSSL-backed networking.
//!
//! This crate implements the engine-selection boundary of a TLS stack: typed
//! engine options, process-wide capability probing for the native TLS library,
//! and a context factory that turns options plus base TLS parameters into a
//! ready [`engine::TlsContext`] for network I/O code to consume.

pub mod engine;

pub use engine::{
    build, is_alpn_available, is_available, ClientVerify, DefaultEngineOptions, EngineError,
    EngineKind, EngineOptions, NativeEngineOptions, Role, SslContextFactory, TlsContext, TlsParams,
    TlsVersion,
};
