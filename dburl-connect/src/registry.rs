//! Mapping from URL schemes to connector constructors.

use crate::connector::{self, ConnectParams, Connector, ConnectorFn};
use crate::error::{ConnectError, ConnectResult};
use dburl_core::{DbConfig, ParseOptions, parse_with};
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Registry of connector constructors keyed by full scheme (`mysql+pool`).
#[derive(Clone, Default)]
pub struct SchemeRegistry {
    schemes: IndexMap<String, ConnectorFn>,
}

impl std::fmt::Debug for SchemeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemeRegistry")
            .field("schemes", &self.schemes.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl SchemeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in schemes.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(
            connector::sqlite,
            &["sqlite", "sqlite+pool", "sqliteext", "sqliteext+pool"],
        );
        registry.register(connector::mysql, &["mysql", "mysql+pool"]);
        registry.register(
            connector::postgres,
            &[
                "postgres",
                "postgresql",
                "postgres+pool",
                "postgresql+pool",
                "postgresext",
                "postgresqlext",
                "postgresext+pool",
                "postgresqlext+pool",
            ],
        );
        registry.register(connector::cockroach, &["cockroachdb", "cockroachdb+pool"]);
        registry
    }

    /// Register `constructor` under each of `names`, replacing existing entries.
    pub fn register(&mut self, constructor: ConnectorFn, names: &[&str]) {
        for name in names {
            debug!(scheme = %name, "Registering scheme");
            self.schemes.insert(name.to_ascii_lowercase(), constructor);
        }
    }

    /// Check if a scheme is registered.
    pub fn contains(&self, scheme: &str) -> bool {
        self.schemes.contains_key(&scheme.to_ascii_lowercase())
    }

    /// Iterate over registered schemes in registration order.
    pub fn schemes(&self) -> impl Iterator<Item = &str> {
        self.schemes.keys().map(String::as_str)
    }

    /// Look up the constructor for a full scheme.
    pub fn resolve(&self, scheme: &str) -> ConnectResult<ConnectorFn> {
        self.schemes
            .get(&scheme.to_ascii_lowercase())
            .copied()
            .ok_or_else(|| {
                warn!(scheme = %scheme, "Unrecognized or unsupported scheme");
                ConnectError::UnknownScheme(scheme.to_string())
            })
    }

    /// Build a connector for an already parsed URL.
    pub fn build(&self, config: &DbConfig, overrides: ConnectParams) -> ConnectResult<Connector> {
        let constructor = self.resolve(&config.full_scheme())?;
        constructor(config, overrides)
    }

    /// Parse `url` and build its connector.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use dburl_connect::{Backend, ConnectParams, SchemeRegistry};
    /// use dburl_core::ParseOptions;
    ///
    /// let registry = SchemeRegistry::with_defaults();
    /// let conn = registry
    ///     .connect("sqlite:///:memory:", &ParseOptions::new(), ConnectParams::new())
    ///     .unwrap();
    /// assert_eq!(conn.backend, Backend::Sqlite);
    /// assert!(conn.is_memory());
    ///
    /// let err = registry
    ///     .connect("missing:///", &ParseOptions::new(), ConnectParams::new())
    ///     .unwrap_err();
    /// assert!(err.is_unknown_scheme());
    /// ```
    pub fn connect(
        &self,
        url: &str,
        options: &ParseOptions,
        overrides: ConnectParams,
    ) -> ConnectResult<Connector> {
        let config = parse_with(url, options)?;
        self.build(&config, overrides)
    }
}

fn global() -> &'static RwLock<SchemeRegistry> {
    static REGISTRY: OnceLock<RwLock<SchemeRegistry>> = OnceLock::new();
    REGISTRY.get_or_init(|| RwLock::new(SchemeRegistry::with_defaults()))
}

/// Register a constructor in the process-wide registry.
pub fn register_database(constructor: ConnectorFn, names: &[&str]) {
    global().write().register(constructor, names);
}

/// Check if a scheme is registered in the process-wide registry.
pub fn is_registered(scheme: &str) -> bool {
    global().read().contains(scheme)
}

/// Parse `url` and build its connector using the process-wide registry.
pub fn connect(url: &str, overrides: ConnectParams) -> ConnectResult<Connector> {
    connect_with(url, &ParseOptions::default(), overrides)
}

/// Like [`connect`], with explicit parse options.
pub fn connect_with(
    url: &str,
    options: &ParseOptions,
    overrides: ConnectParams,
) -> ConnectResult<Connector> {
    let config = parse_with(url, options)?;
    let constructor = global().read().resolve(&config.full_scheme())?;
    constructor(&config, overrides)
}
