//! Engine option variants.
//!
//! [`EngineOptions`] is a closed family of configuration values, one variant
//! per TLS engine. Each variant knows how to construct its own
//! [`SslContextFactory`] and how to round-trip through a JSON configuration
//! map. Values have value semantics: clones are independent, and setters take
//! and return ownership so construction reads as a builder chain.

use serde_json::{Map, Value};

use super::factory::{DefaultContextFactory, NativeContextFactory, SslContextFactory};
use super::{EngineError, Result};

/// Default value of whether session cache is enabled in the native engine's
/// server context.
pub const DEFAULT_SESSION_CACHE_ENABLED: bool = true;

/// Configuration key for the session cache flag
const SESSION_CACHE_ENABLED_KEY: &str = "sessionCacheEnabled";

/// Which engine an options value (or a built context) refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    /// The platform's built-in TLS engine, no extra tuning
    Default,
    /// The native-accelerated engine, gated on availability
    Native,
}

impl EngineKind {
    /// Engine name as used in logs and error messages
    pub fn as_str(self) -> &'static str {
        match self {
            EngineKind::Default => "default",
            EngineKind::Native => super::NATIVE_ENGINE_NAME,
        }
    }
}

/// Options for the platform-default TLS engine.
///
/// Carries no engine-specific knobs; it exists so callers can express the
/// engine choice through the same [`EngineOptions`] family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultEngineOptions;

impl DefaultEngineOptions {
    /// Create options with default values
    pub fn new() -> Self {
        DefaultEngineOptions
    }

    /// Create options from a configuration map.
    ///
    /// The default engine recognizes no keys; unknown keys are ignored.
    pub fn from_config(_config: &Map<String, Value>) -> Result<Self> {
        Ok(DefaultEngineOptions)
    }

    /// Convert to a configuration map (the inverse of [`Self::from_config`])
    pub fn to_config(&self) -> Map<String, Value> {
        Map::new()
    }
}

/// Options for the native-accelerated TLS engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeEngineOptions {
    session_cache_enabled: bool,
}

impl NativeEngineOptions {
    /// Create options with default values
    pub fn new() -> Self {
        NativeEngineOptions {
            session_cache_enabled: DEFAULT_SESSION_CACHE_ENABLED,
        }
    }

    /// Create options from a configuration map.
    ///
    /// Recognizes `"sessionCacheEnabled"` (boolean). Missing keys fall back
    /// to defaults, unknown keys are ignored, and a recognized key holding a
    /// non-boolean value is a [`EngineError::Config`].
    pub fn from_config(config: &Map<String, Value>) -> Result<Self> {
        let mut options = NativeEngineOptions::new();
        if let Some(value) = config.get(SESSION_CACHE_ENABLED_KEY) {
            match value {
                Value::Bool(enabled) => options.session_cache_enabled = *enabled,
                other => {
                    return Err(EngineError::Config {
                        key: SESSION_CACHE_ENABLED_KEY.to_string(),
                        expected: "boolean",
                        found: other.to_string(),
                    })
                }
            }
        }
        Ok(options)
    }

    /// Convert to a configuration map (the inverse of [`Self::from_config`])
    pub fn to_config(&self) -> Map<String, Value> {
        let mut config = Map::new();
        config.insert(
            SESSION_CACHE_ENABLED_KEY.to_string(),
            Value::Bool(self.session_cache_enabled),
        );
        config
    }

    /// Set whether session cache is enabled in the native engine's server
    /// context
    pub fn set_session_cache_enabled(mut self, enabled: bool) -> Self {
        self.session_cache_enabled = enabled;
        self
    }

    /// Whether session cache is enabled in the native engine's server context
    pub fn is_session_cache_enabled(&self) -> bool {
        self.session_cache_enabled
    }
}

impl Default for NativeEngineOptions {
    fn default() -> Self {
        NativeEngineOptions::new()
    }
}

/// Closed family of engine option variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineOptions {
    /// Use the platform-default engine
    Default(DefaultEngineOptions),
    /// Use the native-accelerated engine
    Native(NativeEngineOptions),
}

impl EngineOptions {
    /// Which engine these options select
    pub fn kind(&self) -> EngineKind {
        match self {
            EngineOptions::Default(_) => EngineKind::Default,
            EngineOptions::Native(_) => EngineKind::Native,
        }
    }

    /// The context factory for this variant
    pub fn context_factory(&self) -> Box<dyn SslContextFactory> {
        match self {
            EngineOptions::Default(_) => Box::new(DefaultContextFactory::new()),
            EngineOptions::Native(options) => Box::new(NativeContextFactory::new(
                options.is_session_cache_enabled(),
            )),
        }
    }
}

impl From<DefaultEngineOptions> for EngineOptions {
    fn from(options: DefaultEngineOptions) -> Self {
        EngineOptions::Default(options)
    }
}

impl From<NativeEngineOptions> for EngineOptions {
    fn from(options: NativeEngineOptions) -> Self {
        EngineOptions::Native(options)
    }
}
