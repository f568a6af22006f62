//! Options for pooled connection variants (`+pool` schemes).

use crate::error::{ConnectError, ConnectResult};
use dburl_core::Value;
use indexmap::IndexMap;
use serde::Serialize;
use std::time::Duration;

/// Pool settings lifted out of the query parameters of a `+pool` URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoolOptions {
    /// Maximum number of open connections.
    pub max_connections: u32,
    /// Recycle connections idle for longer than this.
    pub stale_timeout: Option<Duration>,
    /// How long to wait for a free connection.
    pub timeout: Option<Duration>,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            max_connections: 20,
            stale_timeout: None,
            timeout: None,
        }
    }
}

impl PoolOptions {
    /// Create pool options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set max connections.
    pub fn max_connections(mut self, n: u32) -> Self {
        self.max_connections = n;
        self
    }

    /// Set the stale timeout.
    pub fn stale_timeout(mut self, timeout: Duration) -> Self {
        self.stale_timeout = Some(timeout);
        self
    }

    /// Set the acquire timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Remove the pool keys from `params` and build options from them.
    ///
    /// Absent keys keep their defaults. `null` clears an optional timeout.
    pub fn take_from(params: &mut IndexMap<String, Value>) -> ConnectResult<Self> {
        let mut opts = Self::default();

        if let Some(value) = params.shift_remove("max_connections") {
            opts.max_connections = value
                .as_int()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| {
                    ConnectError::invalid_option(
                        "max_connections",
                        format!("expected a non-negative integer, got {}", value.type_name()),
                    )
                })?;
        }

        if let Some(value) = params.shift_remove("stale_timeout") {
            opts.stale_timeout = seconds("stale_timeout", &value)?;
        }

        if let Some(value) = params.shift_remove("timeout") {
            opts.timeout = seconds("timeout", &value)?;
        }

        Ok(opts)
    }
}

fn seconds(key: &str, value: &Value) -> ConnectResult<Option<Duration>> {
    if value.is_null() {
        return Ok(None);
    }
    let secs = value.as_f64().ok_or_else(|| {
        ConnectError::invalid_option(key, format!("expected seconds, got {}", value.type_name()))
    })?;
    Duration::try_from_secs_f64(secs)
        .map(Some)
        .map_err(|e| ConnectError::invalid_option(key, e.to_string()))
}
