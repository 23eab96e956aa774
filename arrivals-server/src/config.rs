//! Server configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::mbta::MbtaConfig;
use crate::view::SessionStoreConfig;

/// Default listen address.
const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// Default directory for static assets.
const DEFAULT_STATIC_DIR: &str = "static";

/// Errors in environment configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {var}: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Everything `main` needs to start the server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub static_dir: PathBuf,
    pub mbta: MbtaConfig,
    /// Serve this fixture instead of the live API.
    pub mock_file: Option<PathBuf>,
    pub sessions: SessionStoreConfig,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`, treating empty values as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let bind_raw = get("ARRIVALS_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind: SocketAddr = bind_raw.parse().map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
            var: "ARRIVALS_BIND",
            value: bind_raw.clone(),
            reason: e.to_string(),
        })?;

        let mut mbta = MbtaConfig::new();
        if let Some(key) = get("MBTA_API_KEY") {
            mbta = mbta.with_api_key(key);
        }
        if let Some(url) = get("MBTA_BASE_URL") {
            mbta = mbta.with_base_url(url);
        }

        let mut sessions = SessionStoreConfig::default();
        if let Some(raw) = get("ARRIVALS_SESSION_IDLE_SECS") {
            let secs: u64 = raw.parse().map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
                var: "ARRIVALS_SESSION_IDLE_SECS",
                value: raw.clone(),
                reason: e.to_string(),
            })?;
            sessions.idle_timeout = Duration::from_secs(secs);
        }

        Ok(Self {
            bind,
            static_dir: get("ARRIVALS_STATIC_DIR")
                .unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string())
                .into(),
            mbta,
            mock_file: get("ARRIVALS_MOCK_FILE").map(PathBuf::from),
            sessions,
        })
    }
}
