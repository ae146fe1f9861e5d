//! Configuration loading and representation.
//!
//! Everything comes from environment variables; unset variables fall back to
//! local single-user defaults.

use std::net::SocketAddr;
use std::str::FromStr;

use thiserror::Error;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://inventory.db";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Which entity store implementation backs the service.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Sqlite,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "memory" => Ok(Self::Memory),
            _ => Err("expected one of: sqlite, memory".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub store: StoreBackend,
    pub database_url: String,
    pub max_connections: u32,
    pub bind_addr: SocketAddr,
}

impl AppConfig {
    /// Read `STOCKROOM_STORE`, `DATABASE_URL`, `DATABASE_MAX_CONNECTIONS` and `BIND_ADDR`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let store = parse_var(&lookup, "STOCKROOM_STORE", StoreBackend::Sqlite, |v| v.parse())?;
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let max_connections = parse_var(&lookup, "DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS, |v| {
            match v.parse::<u32>() {
                Ok(0) => Err("must be at least 1".to_string()),
                Ok(n) => Ok(n),
                Err(e) => Err(e.to_string()),
            }
        })?;
        let default_addr = SocketAddr::from(([0, 0, 0, 0], 8080));
        let bind_addr = parse_var(&lookup, "BIND_ADDR", default_addr, |v| {
            v.parse::<SocketAddr>().map_err(|e| e.to_string())
        })?;

        Ok(Self {
            store,
            database_url,
            max_connections,
            bind_addr,
        })
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
    parse: impl Fn(&str) -> Result<T, String>,
) -> Result<T, ConfigError> {
    match lookup(var) {
        None => Ok(default),
        Some(value) if value.trim().is_empty() => Ok(default),
        Some(value) => parse(value.trim()).map_err(|reason| ConfigError::Invalid {
            var,
            value,
            reason,
        }),
    }
}
