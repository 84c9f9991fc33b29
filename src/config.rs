//! Runtime configuration.

use std::time::Duration;

/// Settings for an [`OrderSystem`](crate::lifecycle::OrderSystem).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Pending requests the store actor will queue.
    pub store_buffer: usize,
    /// Pending messages the ingestion stream will queue.
    pub ingest_buffer: usize,
    /// Name of the order stream.
    pub subject: String,
    /// Whether to warm the cache from the store on startup.
    pub restore_on_start: bool,
    /// How long shutdown waits for the store actor to stop.
    pub shutdown_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_buffer: 32,
            ingest_buffer: 32,
            subject: "orders".to_string(),
            restore_on_start: true,
            shutdown_timeout: Duration::from_secs(5),
        }
    }
}

impl Config {
    /// Create from environment variables with fallback to defaults.
    ///
    /// Environment variables:
    /// - `ORDERS_STORE_BUFFER`: Store actor queue depth (default: 32)
    /// - `ORDERS_INGEST_BUFFER`: Ingestion stream queue depth (default: 32)
    /// - `ORDERS_SUBJECT`: Order stream name (default: `orders`)
    /// - `ORDERS_RESTORE_ON_START`: Warm the cache on startup (default: true)
    /// - `ORDERS_SHUTDOWN_TIMEOUT_MS`: Store actor shutdown wait (default: 5000)
    ///
    /// Unset or unparsable values fall back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            store_buffer: lookup("ORDERS_STORE_BUFFER")
                .and_then(|s| s.parse::<usize>().ok())
                .filter(|&n| n > 0)
                .unwrap_or(defaults.store_buffer),
            ingest_buffer: lookup("ORDERS_INGEST_BUFFER")
                .and_then(|s| s.parse::<usize>().ok())
                .filter(|&n| n > 0)
                .unwrap_or(defaults.ingest_buffer),
            subject: lookup("ORDERS_SUBJECT")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.subject),
            restore_on_start: lookup("ORDERS_RESTORE_ON_START")
                .and_then(|s| s.parse::<bool>().ok())
                .unwrap_or(defaults.restore_on_start),
            shutdown_timeout: lookup("ORDERS_SHUTDOWN_TIMEOUT_MS")
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.shutdown_timeout),
        }
    }
}
