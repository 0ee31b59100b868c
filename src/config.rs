//! Server configuration (spec.md §5 resource limits + §6.6 HTTP surface),
//! read from environment variables with defaults. Plain env/const
//! configuration, following the teacher's `bench_server.rs` preference for
//! constants over a config-file crate — the teacher never depends on one.

use std::time::Duration;

/// Bind address, upload cap, and request timeout for the HTTP surface.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub max_upload_bytes: usize,
    pub request_timeout: Duration,
}

const DEFAULT_PORT: u16 = 8080;
/// Enforced by the surrounding server, not the core builder (spec.md §5).
const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

impl ServerConfig {
    /// Reads overrides from `SUT_FORGE_PORT`, `SUT_FORGE_MAX_UPLOAD_BYTES`,
    /// and `SUT_FORGE_REQUEST_TIMEOUT_SECS`, falling back to defaults for
    /// anything unset or unparseable.
    pub fn from_env() -> Self {
        let port = env_parsed("SUT_FORGE_PORT").unwrap_or(DEFAULT_PORT);
        let max_upload_bytes =
            env_parsed("SUT_FORGE_MAX_UPLOAD_BYTES").unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);
        let request_timeout_secs =
            env_parsed("SUT_FORGE_REQUEST_TIMEOUT_SECS").unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        Self {
            bind_addr: format!("0.0.0.0:{port}"),
            max_upload_bytes,
            request_timeout: Duration::from_secs(request_timeout_secs),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: format!("0.0.0.0:{DEFAULT_PORT}"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

fn env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.max_upload_bytes, 50 * 1024 * 1024);
        assert_eq!(config.request_timeout, Duration::from_secs(60));
    }
}
