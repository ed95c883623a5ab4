use thiserror::Error;

// ── Errors ──────────────────────────────────────────────────────────

/// Failures loading or validating a [`NetworkConfig`](crate::config::NetworkConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("unsupported config version {0}")]
    UnsupportedVersion(u32),
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Failures talking to the serialized runtime worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("event queue is full")]
    Full,
    #[error("runtime worker has shut down")]
    Disconnected,
}
