//! Configuration Module
//!
//! Handles loading and managing cache and server configuration from environment variables.

use std::env;
use std::path::PathBuf;

/// Cache and server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Absolute directory where cache files are stored
    pub cache_dir: PathBuf,
    /// Extra seconds an expired file is kept before it can be swept.
    /// `None` sweeps entries as soon as they expire.
    pub grace_period: Option<u64>,
    /// TTL in seconds applied to responses cached by the HTTP layer
    pub cache_ttl: u64,
    /// Periodic sweep interval in seconds, 0 = sweep only on writes
    pub sweep_interval: u64,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_DIR` - Cache directory (default: `<temp dir>/disk_response_cache`)
    /// - `CACHE_GRACE_PERIOD_SECS` - Grace period in seconds (default: unset, sweep at expiration)
    /// - `CACHE_TTL_SECS` - TTL of cached responses in seconds (default: 300)
    /// - `SWEEP_INTERVAL_SECS` - Periodic sweep frequency in seconds (default: 0, disabled)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_dir: env::var_os("CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_dir),
            grace_period: env::var("CACHE_GRACE_PERIOD_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .or(defaults.grace_period),
            cache_ttl: env::var("CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache_ttl),
            sweep_interval: env::var("SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.sweep_interval),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: env::temp_dir().join(env!("CARGO_PKG_NAME")),
            grace_period: None,
            cache_ttl: 300,
            sweep_interval: 0,
            server_port: 3000,
        }
    }
}
