//! Server configuration loaded from the environment.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `STORE_BACKEND` | `postgres` (`memory` for a throwaway in-process store) |
//! | `DATABASE_URL` | required when the backend is `postgres` |
//! | `HOST` / `PORT` | `0.0.0.0` / `8080` |
//! | `TOKEN_SYMMETRIC_KEY` | required, exactly 32 bytes |
//! | `ACCESS_TOKEN_DURATION` | `15m` (`Ns`, `Nm`, `Nh`, `Nd`) |
//! | `ALLOWED_ORIGINS` | `http://localhost:3000`, comma-separated |
//! | `DB_MAX_CONNECTIONS` | `10` |
//! | `DB_MIN_CONNECTIONS` | `1`, at most `DB_MAX_CONNECTIONS` |
//! | `DB_ACQUIRE_TIMEOUT` | `30s`, same units as the token duration |

use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use notestack_core::{Error, Result};
use notestack_crypto::KEY_SIZE;
use notestack_db::pool::{self, PoolConfig};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_ACCESS_TOKEN_DURATION: &str = "15m";
pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000";
pub const DEFAULT_DB_ACQUIRE_TIMEOUT: &str = "30s";

/// Which store implementation backs the repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(Error::Config(format!(
                "STORE_BACKEND must be 'postgres' or 'memory', got '{}'",
                other
            ))),
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub token_symmetric_key: String,
    pub access_token_duration: Duration,
    pub allowed_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout: std::time::Duration,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("store_backend", &self.store_backend)
            .field("database_url", &self.database_url.as_ref().map(|_| "[REDACTED]"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("token_symmetric_key", &"[REDACTED]")
            .field("access_token_duration", &self.access_token_duration)
            .field("allowed_origins", &self.allowed_origins)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout", &self.db_acquire_timeout)
            .finish()
    }
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let store_backend = match var("STORE_BACKEND") {
            Some(v) => v.parse()?,
            None => StoreBackend::Postgres,
        };

        let database_url = var("DATABASE_URL");
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            return Err(Error::Config(
                "DATABASE_URL is required for the postgres backend".to_string(),
            ));
        }

        let token_symmetric_key = var("TOKEN_SYMMETRIC_KEY")
            .ok_or_else(|| Error::Config("TOKEN_SYMMETRIC_KEY is required".to_string()))?;
        if token_symmetric_key.len() != KEY_SIZE {
            return Err(Error::Config(format!(
                "TOKEN_SYMMETRIC_KEY must be exactly {} bytes, got {}",
                KEY_SIZE,
                token_symmetric_key.len()
            )));
        }

        let duration_str =
            var("ACCESS_TOKEN_DURATION").unwrap_or_else(|| DEFAULT_ACCESS_TOKEN_DURATION.into());
        let access_token_duration = parse_duration(&duration_str).ok_or_else(|| {
            Error::Config(format!("invalid ACCESS_TOKEN_DURATION '{}'", duration_str))
        })?;

        let port = match var("PORT") {
            Some(v) => v
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("invalid PORT '{}'", v)))?,
            None => DEFAULT_PORT,
        };

        let db_max_connections = match var("DB_MAX_CONNECTIONS") {
            Some(v) => parse_count("DB_MAX_CONNECTIONS", &v)?,
            None => pool::DEFAULT_MAX_CONNECTIONS,
        };
        let db_min_connections = match var("DB_MIN_CONNECTIONS") {
            Some(v) => parse_count("DB_MIN_CONNECTIONS", &v)?,
            None => pool::DEFAULT_MIN_CONNECTIONS,
        };
        let timeout_str =
            var("DB_ACQUIRE_TIMEOUT").unwrap_or_else(|| DEFAULT_DB_ACQUIRE_TIMEOUT.into());
        let db_acquire_timeout = parse_duration(&timeout_str)
            .and_then(|d| d.to_std().ok())
            .ok_or_else(|| {
                Error::Config(format!("invalid DB_ACQUIRE_TIMEOUT '{}'", timeout_str))
            })?;

        let allowed_origins = parse_allowed_origins(
            &var("ALLOWED_ORIGINS").unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.into()),
        );

        let config = Self {
            store_backend,
            database_url,
            host: var("HOST").unwrap_or_else(|| DEFAULT_HOST.into()),
            port,
            token_symmetric_key,
            access_token_duration,
            allowed_origins,
            db_max_connections,
            db_min_connections,
            db_acquire_timeout,
        };
        config.pool_config().validate()?;
        Ok(config)
    }

    /// Pool settings for the postgres backend.
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig::new()
            .max_connections(self.db_max_connections)
            .min_connections(self.db_min_connections)
            .acquire_timeout(self.db_acquire_timeout)
    }
}

fn parse_count(key: &str, raw: &str) -> Result<u32> {
    raw.trim()
        .parse()
        .map_err(|_| Error::Config(format!("invalid {} '{}'", key, raw)))
}

/// Parse a duration such as `15m`, `90s`, `12h` or `7d`.
///
/// Only positive whole amounts are accepted.
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim().to_lowercase();
    let split = s.find(|c: char| !c.is_ascii_digit())?;
    let (num_str, unit) = s.split_at(split);

    let num: i64 = num_str.parse().ok()?;
    if num <= 0 {
        return None;
    }
    match unit {
        "s" | "sec" | "secs" | "second" | "seconds" => Duration::try_seconds(num),
        "m" | "min" | "mins" | "minute" | "minutes" => Duration::try_minutes(num),
        "h" | "hr" | "hrs" | "hour" | "hours" => Duration::try_hours(num),
        "d" | "day" | "days" => Duration::try_days(num),
        _ => None,
    }
}

fn parse_allowed_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
