//! Connector descriptors handed to database drivers.

use crate::error::{ConnectError, ConnectResult};
use crate::pool::PoolOptions;
use dburl_core::config::{
    KEY_DATABASE, KEY_HOST, KEY_MODIFIER, KEY_PASSWD, KEY_PASSWORD, KEY_PORT, KEY_SCHEME,
    KEY_USER,
};
use dburl_core::{DbConfig, MEMORY_DATABASE, Value};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use tracing::info;

/// Extra keyword arguments supplied by the caller of `connect`.
///
/// They are applied on top of the URL's own fields and parameters, so a key
/// given here always wins.
pub type ConnectParams = IndexMap<String, Value>;

/// Constructor registered for a scheme.
pub type ConnectorFn = fn(&DbConfig, ConnectParams) -> ConnectResult<Connector>;

/// Built-in connector families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// SQLite
    Sqlite,
    /// MySQL / MariaDB
    MySql,
    /// PostgreSQL
    Postgres,
    /// CockroachDB (PostgreSQL wire protocol)
    Cockroach,
}

impl Backend {
    /// Get the default port for this backend.
    pub fn default_port(&self) -> Option<u16> {
        match self {
            Self::Sqlite => None,
            Self::MySql => Some(3306),
            Self::Postgres => Some(5432),
            Self::Cockroach => Some(26257),
        }
    }

    /// Get the backend name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::MySql => "mysql",
            Self::Postgres => "postgres",
            Self::Cockroach => "cockroachdb",
        }
    }

    /// Check if the database identifier is a file path.
    pub fn is_file_based(&self) -> bool {
        matches!(self, Self::Sqlite)
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Everything a driver needs to open a connection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Connector {
    /// Connector family.
    pub backend: Backend,
    /// Scheme the connector was resolved from, including any modifier.
    pub scheme: String,
    /// Database name, file path, or `:memory:`.
    pub database: String,
    /// Host, absent when the URL had none.
    pub host: Option<String>,
    /// Port.
    pub port: Option<u16>,
    /// User name.
    pub user: Option<String>,
    /// Password.
    pub password: Option<String>,
    /// Pool settings for `+pool` variants.
    pub pool: Option<PoolOptions>,
    /// Remaining driver-specific parameters.
    pub params: IndexMap<String, Value>,
}

impl Connector {
    /// Build a connector for `backend` from a parsed URL and caller overrides.
    ///
    /// The URL's reserved fields, then its query parameters, then
    /// `overrides` are layered in that order. Reserved keys (`database`,
    /// `host`, `port`, `user`, `password` / `passwd`) are lifted back out
    /// into typed fields and must hold the right type.
    pub fn build(
        backend: Backend,
        config: &DbConfig,
        overrides: ConnectParams,
    ) -> ConnectResult<Self> {
        // The most specific layer naming a password decides which key wins.
        let password_source = [KEY_PASSWD, KEY_PASSWORD]
            .into_iter()
            .find(|key| overrides.contains_key(*key))
            .or_else(|| {
                [KEY_PASSWD, KEY_PASSWORD]
                    .into_iter()
                    .find(|key| config.params().contains_key(*key))
            });

        let mut params = config.to_map();
        params.extend(overrides);
        params.shift_remove(KEY_SCHEME);
        params.shift_remove(KEY_MODIFIER);

        let database = take_string(&mut params, KEY_DATABASE)?.unwrap_or_default();
        let host = take_string(&mut params, KEY_HOST)?.filter(|h| !h.is_empty());
        let port = take_port(&mut params)?;
        let user = take_string(&mut params, KEY_USER)?;
        let passwd = take_string(&mut params, KEY_PASSWD)?;
        let password = take_string(&mut params, KEY_PASSWORD)?;
        let password = match password_source {
            Some(KEY_PASSWORD) => password.or(passwd),
            _ => passwd.or(password),
        };

        let pool = if config
            .modifier()
            .is_some_and(|m| m.eq_ignore_ascii_case("pool"))
        {
            Some(PoolOptions::take_from(&mut params)?)
        } else {
            None
        };

        let database = if backend.is_file_based() && database.is_empty() {
            MEMORY_DATABASE.to_string()
        } else {
            database
        };

        let connector = Self {
            backend,
            scheme: config.full_scheme(),
            database,
            host,
            port,
            user,
            password,
            pool,
            params,
        };

        info!(
            backend = %connector.backend,
            scheme = %connector.scheme,
            host = ?connector.host,
            database = %connector.database,
            pooled = connector.pool.is_some(),
            "Connector built"
        );

        Ok(connector)
    }

    /// Get the port or the backend's default.
    pub fn port_or_default(&self) -> Option<u16> {
        self.port.or_else(|| self.backend.default_port())
    }

    /// Check if this targets the in-memory database.
    pub fn is_memory(&self) -> bool {
        self.database == MEMORY_DATABASE
    }

    /// Get a driver parameter.
    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }
}

/// Constructor for SQLite schemes.
pub fn sqlite(config: &DbConfig, overrides: ConnectParams) -> ConnectResult<Connector> {
    Connector::build(Backend::Sqlite, config, overrides)
}

/// Constructor for MySQL schemes.
pub fn mysql(config: &DbConfig, overrides: ConnectParams) -> ConnectResult<Connector> {
    Connector::build(Backend::MySql, config, overrides)
}

/// Constructor for PostgreSQL schemes.
pub fn postgres(config: &DbConfig, overrides: ConnectParams) -> ConnectResult<Connector> {
    Connector::build(Backend::Postgres, config, overrides)
}

/// Constructor for CockroachDB schemes.
pub fn cockroach(config: &DbConfig, overrides: ConnectParams) -> ConnectResult<Connector> {
    Connector::build(Backend::Cockroach, config, overrides)
}

fn take_string(params: &mut IndexMap<String, Value>, key: &str) -> ConnectResult<Option<String>> {
    match params.shift_remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(ConnectError::invalid_option(
            key,
            format!("expected a string, got {}", other.type_name()),
        )),
    }
}

fn take_port(params: &mut IndexMap<String, Value>) -> ConnectResult<Option<u16>> {
    match params.shift_remove(KEY_PORT) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Int(n)) => u16::try_from(n).map(Some).map_err(|_| {
            ConnectError::invalid_option(KEY_PORT, format!("{} is out of range", n))
        }),
        Some(other) => Err(ConnectError::invalid_option(
            KEY_PORT,
            format!("expected an integer, got {}", other.type_name()),
        )),
    }
}
