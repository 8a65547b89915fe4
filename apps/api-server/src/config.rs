//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use quill_infra::database::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    /// Argon2 PHC hash of the admin key. Admin routes are disabled without it.
    pub admin_key_hash: Option<String>,
    pub rate_limit: RateLimitSettings,
}

/// Quota applied to the public write endpoints, per client address.
#[derive(Debug, Clone)]
pub struct RateLimitSettings {
    pub max_requests: u32,
    pub window: Duration,
    /// Key clients by `X-Forwarded-For` instead of the TCP peer.
    pub trust_forwarded: bool,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: parse_var("DB_MAX_CONNECTIONS", 20),
            min_connections: parse_var("DB_MIN_CONNECTIONS", 2),
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT", 8080),
            database,
            admin_key_hash: env::var("ADMIN_KEY_HASH")
                .ok()
                .filter(|hash| !hash.trim().is_empty()),
            rate_limit: RateLimitSettings {
                max_requests: parse_var("RATE_LIMIT_MAX_REQUESTS", 30),
                window: Duration::from_secs(parse_var("RATE_LIMIT_WINDOW_SECS", 60)),
                trust_forwarded: parse_var("RATE_LIMIT_TRUST_FORWARDED", false),
            },
        }
    }
}

/// Read and parse an environment variable, falling back to `default`
/// when it is unset or malformed.
fn parse_var<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Ignoring malformed environment variable");
            default
        }),
        Err(_) => default,
    }
}
