//! Process configuration read from the environment at startup.

use std::net::SocketAddr;

use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_SESSION_TTL_MINUTES: i64 = 60 * 24;
const DEV_SESSION_SECRET: &str = "dev-session-secret";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} is not valid: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// `None` runs against in-memory stores.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub session_secret: String,
    pub session_ttl: chrono::Duration,
    /// Mark the session cookie `Secure`.
    pub cookie_secure: bool,
}

impl core::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field("database", &self.database_url.is_some())
            .field("database_max_connections", &self.database_max_connections)
            .field("session_ttl", &self.session_ttl)
            .field("cookie_secure", &self.cookie_secure)
            .finish_non_exhaustive()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = parse_or(&get, "BIND_ADDR", DEFAULT_BIND_ADDR.parse().ok())?;
        let database_max_connections =
            parse_or(&get, "DATABASE_MAX_CONNECTIONS", Some(DEFAULT_MAX_CONNECTIONS))?;
        let ttl_minutes = parse_or(&get, "SESSION_TTL_MINUTES", Some(DEFAULT_SESSION_TTL_MINUTES))?;
        if ttl_minutes <= 0 {
            return Err(ConfigError::Invalid {
                key: "SESSION_TTL_MINUTES",
                value: ttl_minutes.to_string(),
            });
        }
        let cookie_secure = parse_or(&get, "COOKIE_SECURE", Some(false))?;

        let session_secret = get("SESSION_SECRET").unwrap_or_else(|| {
            tracing::warn!("SESSION_SECRET not set; using insecure dev default");
            DEV_SESSION_SECRET.to_string()
        });

        Ok(Self {
            bind_addr,
            database_url: get("DATABASE_URL"),
            database_max_connections,
            session_secret,
            session_ttl: chrono::Duration::minutes(ttl_minutes),
            cookie_secure,
        })
    }
}

fn parse_or<T, G>(get: &G, key: &'static str, default: Option<T>) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
        None => default.ok_or(ConfigError::Invalid {
            key,
            value: String::new(),
        }),
    }
}
