//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::auth::{MAX_COST, MIN_COST};

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// When false the list cache is replaced by a no-op implementation
    pub cache_enabled: bool,
    /// Maximum number of entries the list cache can hold
    pub cache_max_entries: usize,
    /// TTL in seconds for cached list results
    pub cache_ttl: u64,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Lifetime of an issued session token in seconds
    pub session_ttl: u64,
    /// Upper bound for a single store or cache call in milliseconds
    pub request_timeout_ms: u64,
    /// Whether creating a property clears cached list results
    pub invalidate_on_create: bool,
    /// bcrypt work factor for stored passwords
    pub bcrypt_cost: u32,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CACHE_ENABLED` - Enable the list cache (default: true)
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `CACHE_TTL` - List result TTL in seconds (default: 3600)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 60)
    /// - `SESSION_TTL` - Session lifetime in seconds (default: 86400)
    /// - `REQUEST_TIMEOUT_MS` - Store/cache call timeout (default: 5000)
    /// - `INVALIDATE_ON_CREATE` - Clear list cache on create (default: true)
    /// - `BCRYPT_COST` - Password hashing work factor, 4 to 31 (default: 8)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cache_enabled: env_or("CACHE_ENABLED", defaults.cache_enabled),
            cache_max_entries: env_or("CACHE_MAX_ENTRIES", defaults.cache_max_entries),
            cache_ttl: env_or("CACHE_TTL", defaults.cache_ttl),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
            session_ttl: env_or("SESSION_TTL", defaults.session_ttl),
            request_timeout_ms: env_or("REQUEST_TIMEOUT_MS", defaults.request_timeout_ms),
            invalidate_on_create: env_or("INVALIDATE_ON_CREATE", defaults.invalidate_on_create),
            bcrypt_cost: env_or("BCRYPT_COST", defaults.bcrypt_cost),
        }
    }

    /// TTL applied to cached list results.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    /// Lifetime of a session token.
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl)
    }

    /// Timeout applied to each store and cache call.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// bcrypt work factor, clamped to the range bcrypt accepts.
    pub fn password_cost(&self) -> u32 {
        self.bcrypt_cost.clamp(MIN_COST, MAX_COST)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            cache_enabled: true,
            cache_max_entries: 1000,
            cache_ttl: 3600,
            cleanup_interval: 60,
            session_ttl: 86_400,
            request_timeout_ms: 5000,
            invalidate_on_create: true,
            bcrypt_cost: 8,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
