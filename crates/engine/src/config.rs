//! `EngineConfig`: the single typed surface for the engine's environment
//! knobs (§6, §10.3).

use std::env;
use std::time::Duration;

const DEFAULT_PARALLELISM: usize = 5;
const DEFAULT_GRACE_TIMEOUT: Duration = Duration::from_secs(5);

/// Which [`weft_store::StoreAdapter`] backend to construct.
///
/// The engine treats this as opaque — it only ever calls through the
/// `StoreAdapter` trait (§6 "`StoreBackend` ... engine treats it as
/// opaque").
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// The bundled `InMemoryStore`.
    Memory,
    /// A named external backend, resolved by the embedder.
    Named(String),
}

impl Default for StoreBackend {
    fn default() -> Self {
        Self::Memory
    }
}

/// Engine-wide configuration (§6, §10.3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum number of nodes `Running` at once, across the whole engine
    /// (§4.5 "bounded worker set"). Clamped to a minimum of 1.
    pub parallelism: usize,
    /// How long an in-flight handler is given to return after cancellation
    /// before its `NodeResult` is recorded as `Cancelled` (§5).
    pub grace_timeout: Duration,
    /// Shared secret out-of-process plugins must present during the
    /// handshake (§4.7). `None` disables plugin-backed node types.
    pub plugin_handshake_cookie: Option<String>,
    /// Which store backend to use.
    pub store_backend: StoreBackend,
}

impl EngineConfig {
    /// Build a config from `WEFT_*` environment variables, falling back to
    /// [`EngineConfig::default`] for anything unset or unparsable.
    ///
    /// - `WEFT_PARALLELISM` — positive integer.
    /// - `WEFT_GRACE_TIMEOUT_MS` — integer milliseconds.
    /// - `WEFT_PLUGIN_HANDSHAKE_COOKIE` — string.
    /// - `WEFT_STORE_BACKEND` — `"memory"` or any other name, treated as
    ///   [`StoreBackend::Named`].
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(raw) = env::var("WEFT_PARALLELISM") {
            if let Ok(n) = raw.parse::<usize>() {
                config.parallelism = n.max(1);
            }
        }
        if let Ok(raw) = env::var("WEFT_GRACE_TIMEOUT_MS") {
            if let Ok(ms) = raw.parse::<u64>() {
                config.grace_timeout = Duration::from_millis(ms);
            }
        }
        if let Ok(cookie) = env::var("WEFT_PLUGIN_HANDSHAKE_COOKIE") {
            config.plugin_handshake_cookie = Some(cookie);
        }
        if let Ok(backend) = env::var("WEFT_STORE_BACKEND") {
            config.store_backend = match backend.as_str() {
                "memory" => StoreBackend::Memory,
                other => StoreBackend::Named(other.to_owned()),
            };
        }

        config
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallelism: DEFAULT_PARALLELISM,
            grace_timeout: DEFAULT_GRACE_TIMEOUT,
            plugin_handshake_cookie: None,
            store_backend: StoreBackend::default(),
        }
    }
}
