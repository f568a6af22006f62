//! Logging setup.
//!
//! Library code only emits `tracing` events. Applications that don't install
//! their own subscriber can call [`init`], which is controlled by:
//!
//! - `DBURL_DEBUG=true|1|yes` - enable debug logging
//! - `DBURL_LOG_LEVEL=trace|debug|info|warn|error` - set the level
//! - `DBURL_LOG_FORMAT=json|pretty|compact` - output format (default: json)
//!
//! Installing the subscriber requires the `tracing-subscriber` feature;
//! without it [`init`] is a no-op.
//!
//! URLs are never logged verbatim since they usually carry credentials.

use std::env;
use std::sync::Once;

static INIT: Once = Once::new();

/// Check if debug logging is enabled via `DBURL_DEBUG`.
pub fn is_debug_enabled() -> bool {
    env::var("DBURL_DEBUG")
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

/// Get the configured log level.
///
/// `DBURL_LOG_LEVEL` wins when it names a valid level; otherwise "debug"
/// if `DBURL_DEBUG` is set, else "warn".
pub fn get_log_level() -> &'static str {
    let fallback = if is_debug_enabled() { "debug" } else { "warn" };
    match env::var("DBURL_LOG_LEVEL") {
        Ok(level) => match level.to_lowercase().as_str() {
            "trace" => "trace",
            "debug" => "debug",
            "info" => "info",
            "warn" => "warn",
            "error" => "error",
            _ => fallback,
        },
        Err(_) => fallback,
    }
}

/// Get the configured log format, "json" unless `DBURL_LOG_FORMAT` says otherwise.
pub fn get_log_format() -> &'static str {
    env::var("DBURL_LOG_FORMAT")
        .map(|f| match f.to_lowercase().as_str() {
            "pretty" => "pretty",
            "compact" => "compact",
            _ => "json",
        })
        .unwrap_or("json")
}

/// Install a global subscriber once. Later calls are no-ops.
pub fn init() {
    INIT.call_once(|| {
        if !is_debug_enabled() && env::var("DBURL_LOG_LEVEL").is_err() {
            return;
        }

        #[cfg(feature = "tracing-subscriber")]
        {
            use tracing_subscriber::{EnvFilter, fmt, prelude::*};

            let level = get_log_level();
            let filter = EnvFilter::try_new(format!(
                "dburl={},dburl_core={},dburl_connect={}",
                level, level, level
            ))
            .unwrap_or_else(|_| EnvFilter::new("warn"));

            let registry = tracing_subscriber::registry().with(filter);
            let installed = match get_log_format() {
                "json" => registry.with(fmt::layer().json()).try_init(),
                "compact" => registry.with(fmt::layer().compact()).try_init(),
                _ => registry.with(fmt::layer().pretty()).try_init(),
            };

            if installed.is_ok() {
                tracing::info!(level = level, format = get_log_format(), "dburl logging initialized");
            }
        }
    });
}

/// Initialize logging at a specific level.
///
/// # Safety
///
/// This sets `DBURL_LOG_LEVEL`, which is unsound while other threads read
/// the environment. Call it at startup before spawning threads.
pub fn init_with_level(level: &str) {
    // SAFETY: documented as a startup-only call.
    unsafe {
        env::set_var("DBURL_LOG_LEVEL", level);
    }
    init();
}
