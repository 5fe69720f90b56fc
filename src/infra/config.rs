//! Centralized configuration (environment variables + defaults).

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

pub const MIN_JWT_SECRET_LEN: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has invalid value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub storage: StorageBackend,
    /// Present whenever `storage` is `Postgres`.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_ttl: chrono::Duration,
    /// Simulated latency before a token deployment completes.
    pub deploy_delay: Duration,
    pub rpc_timeout: Duration,
    pub seed_networks: bool,
}

fn parsed<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
            value,
        }),
    }
}

fn flag(key: &'static str, raw: Option<String>, default: bool) -> Result<bool, ConfigError> {
    let Some(value) = raw else {
        return Ok(default);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value,
            reason: "expected true or false".into(),
        }),
    }
}

impl Config {
    /// Reads the process environment (after loading `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = parsed("BIND_ADDR", get("BIND_ADDR"), SocketAddr::from(([0, 0, 0, 0], 3000)))?;

        let storage = match get("STORAGE_BACKEND").as_deref().map(str::trim) {
            None | Some("postgres") => StorageBackend::Postgres,
            Some("memory") => StorageBackend::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "STORAGE_BACKEND",
                    value: other.to_string(),
                    reason: "expected postgres or memory".into(),
                })
            }
        };

        let database_url = get("DATABASE_URL");
        if storage == StorageBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let db_max_connections: u32 = parsed("DB_MAX_CONNECTIONS", get("DB_MAX_CONNECTIONS"), 5)?;
        if db_max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "DB_MAX_CONNECTIONS",
                value: "0".into(),
                reason: "must be at least 1".into(),
            });
        }

        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::Invalid {
                key: "JWT_SECRET",
                value: "<redacted>".into(),
                reason: format!("must be at least {MIN_JWT_SECRET_LEN} bytes"),
            });
        }

        let ttl_hours: i64 = parsed("JWT_TTL_HOURS", get("JWT_TTL_HOURS"), 24)?;
        if ttl_hours <= 0 {
            return Err(ConfigError::Invalid {
                key: "JWT_TTL_HOURS",
                value: ttl_hours.to_string(),
                reason: "must be positive".into(),
            });
        }

        let deploy_delay_ms: u64 = parsed("DEPLOY_DELAY_MS", get("DEPLOY_DELAY_MS"), 3000)?;
        let rpc_timeout_secs: u64 = parsed("RPC_TIMEOUT_SECS", get("RPC_TIMEOUT_SECS"), 10)?;
        let seed_networks = flag("SEED_NETWORKS", get("SEED_NETWORKS"), true)?;

        Ok(Self {
            bind_addr,
            storage,
            database_url,
            db_max_connections,
            jwt_secret,
            jwt_ttl: chrono::Duration::hours(ttl_hours),
            deploy_delay: Duration::from_millis(deploy_delay_ms),
            rpc_timeout: Duration::from_secs(rpc_timeout_secs.max(1)),
            seed_networks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_apply_for_memory_backend() {
        let config = load(&[
            ("STORAGE_BACKEND", "memory"),
            ("JWT_SECRET", "0123456789abcdef"),
        ])
        .unwrap();
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.jwt_ttl, chrono::Duration::hours(24));
        assert_eq!(config.deploy_delay, Duration::from_millis(3000));
        assert_eq!(config.rpc_timeout, Duration::from_secs(10));
        assert!(config.seed_networks);
    }

    #[test]
    fn postgres_requires_database_url() {
        let err = load(&[("JWT_SECRET", "0123456789abcdef")]).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DATABASE_URL"));
    }

    #[test]
    fn short_secret_is_rejected() {
        let err = load(&[("STORAGE_BACKEND", "memory"), ("JWT_SECRET", "short")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "JWT_SECRET", .. }));
        assert!(!err.to_string().contains("short"));
    }

    #[test]
    fn malformed_numbers_name_their_key() {
        let err = load(&[
            ("STORAGE_BACKEND", "memory"),
            ("JWT_SECRET", "0123456789abcdef"),
            ("DEPLOY_DELAY_MS", "soon"),
        ])
        .unwrap_err();
        assert!(err.to_string().starts_with("DEPLOY_DELAY_MS has invalid value 'soon'"));
    }

    #[test]
    fn unknown_backend_and_flags_fail() {
        assert!(load(&[("STORAGE_BACKEND", "sqlite"), ("JWT_SECRET", "0123456789abcdef")]).is_err());
        assert!(load(&[
            ("STORAGE_BACKEND", "memory"),
            ("JWT_SECRET", "0123456789abcdef"),
            ("SEED_NETWORKS", "maybe"),
        ])
        .is_err());
    }
}
