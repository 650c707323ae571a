//! Service configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Numeric keys fall back to their
//! defaults when unparsable; enumerated keys reject unknown values so a
//! typo cannot silently select the wrong storage or policy.

use std::net::SocketAddr;
use std::str::FromStr;

use anyhow::Context;

/// Which storage backend to open at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    /// PostgreSQL if `DATABASE_URL` is set and reachable, else memory.
    #[default]
    Auto,
    /// PostgreSQL only; startup fails if unavailable.
    Postgres,
    /// In-process memory only.
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" | "mem" => Ok(Self::Memory),
            other => anyhow::bail!("unknown storage backend {other:?} (expected auto|postgres|memory)"),
        }
    }
}

/// What to do with a migration whose source or destination pool is unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingPoolPolicy {
    /// Record the transaction and leave every balance unchanged.
    #[default]
    Record,
    /// Refuse the transaction with a not-found error; nothing is recorded.
    Reject,
}

impl FromStr for MissingPoolPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "record" => Ok(Self::Record),
            "reject" => Ok(Self::Reject),
            other => anyhow::bail!("unknown missing-pool policy {other:?} (expected record|reject)"),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => anyhow::bail!("unknown log format {other:?} (expected pretty|json)"),
        }
    }
}

/// Top-level service configuration.
///
/// Loaded once at startup via [`LedgerConfig::from_env`].
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:5000`).
    pub listen_addr: SocketAddr,

    /// PostgreSQL connection string, if any.
    pub database_url: Option<String>,

    /// Maximum number of database connections in the pool.
    pub database_max_connections: u32,

    /// Minimum idle connections in the pool.
    pub database_min_connections: u32,

    /// Timeout in seconds for acquiring a database connection.
    pub database_connect_timeout_secs: u64,

    /// Storage backend selection policy.
    pub storage_backend: StorageBackend,

    /// Whether to run embedded SQL migrations on connect.
    pub run_migrations: bool,

    /// Handling of migrations that reference an unknown pool.
    pub missing_pool_policy: MissingPoolPolicy,

    /// Capacity of the EventBus broadcast channel.
    pub event_bus_capacity: usize,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
            database_url: None,
            database_max_connections: 10,
            database_min_connections: 1,
            database_connect_timeout_secs: 5,
            storage_backend: StorageBackend::Auto,
            run_migrations: true,
            missing_pool_policy: MissingPoolPolicy::Record,
            event_bus_capacity: 1024,
            log_format: LogFormat::Pretty,
        }
    }
}

impl LedgerConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR`, `STORAGE_BACKEND`,
    /// `MISSING_POOL_POLICY` or `LOG_FORMAT` is set to an invalid value.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`LedgerConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let listen_addr = match lookup("LISTEN_ADDR") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("invalid LISTEN_ADDR {raw:?}"))?,
            None => defaults.listen_addr,
        };

        let database_url = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty());

        let storage_backend = parse_enum(&lookup, "STORAGE_BACKEND", defaults.storage_backend)?;
        let missing_pool_policy =
            parse_enum(&lookup, "MISSING_POOL_POLICY", defaults.missing_pool_policy)?;
        let log_format = parse_enum(&lookup, "LOG_FORMAT", defaults.log_format)?;

        Ok(Self {
            listen_addr,
            database_url,
            database_max_connections: parse_value(
                &lookup,
                "DATABASE_MAX_CONNECTIONS",
                defaults.database_max_connections,
            ),
            database_min_connections: parse_value(
                &lookup,
                "DATABASE_MIN_CONNECTIONS",
                defaults.database_min_connections,
            ),
            database_connect_timeout_secs: parse_value(
                &lookup,
                "DATABASE_CONNECT_TIMEOUT_SECS",
                defaults.database_connect_timeout_secs,
            ),
            storage_backend,
            run_migrations: parse_bool(&lookup, "DATABASE_RUN_MIGRATIONS", defaults.run_migrations),
            missing_pool_policy,
            event_bus_capacity: parse_value(&lookup, "EVENT_BUS_CAPACITY", defaults.event_bus_capacity),
            log_format,
        })
    }
}

/// Parses `key` as `T`, returning `default` on missing or invalid values.
fn parse_value<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Parses `key` as a boolean. Accepts `"true"`, `"1"`, `"false"`, `"0"`
/// (case-insensitive). Returns `default` otherwise.
fn parse_bool<F>(lookup: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        Some("true" | "1") => true,
        Some("false" | "0") => false,
        _ => default,
    }
}

/// Parses an enumerated key; unknown values are errors.
fn parse_enum<T, F>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr<Err = anyhow::Error>,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.parse().with_context(|| format!("invalid {key}")),
        None => Ok(default),
    }
}
