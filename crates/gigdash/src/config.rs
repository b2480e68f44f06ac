use std::{env, time::Duration};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Snapshot cache TTL in seconds (default: 60)
    pub cache_ttl_seconds: u64,
    /// Maximum number of cached snapshots per namespace (default: 10,000)
    pub cache_max_entries: usize,
    /// Upper bound for each fetch stage of a snapshot build, in milliseconds (default: 5,000)
    pub fetch_timeout_ms: u64,
    /// Path to SQLite database file (default: "gigdash.db")
    /// Note: Only used when the `sqlite` feature is enabled.
    #[allow(dead_code)]
    pub sqlite_path: String,
    /// Seed the store with a demo dataset at startup (default: true)
    pub seed_demo_data: bool,
    /// User the demo dataset is generated for (default: 1)
    pub demo_subject_id: i64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `DASHBOARD_CACHE_TTL_SECONDS` - Snapshot TTL in seconds (default: 60)
    /// - `CACHE_MAX_ENTRIES` - Maximum cached snapshots per namespace (default: 10,000)
    /// - `FETCH_TIMEOUT_MS` - Timeout of one fetch stage (default: 5,000)
    /// - `SQLITE_PATH` - SQLite database path (default: "gigdash.db")
    /// - `SEED_DEMO_DATA` - Seed demo records at startup (default: true)
    /// - `DEMO_SUBJECT_ID` - User id of the demo records (default: 1)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. Unset or unparseable
    /// values fall back to their defaults.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            cache_ttl_seconds: lookup("DASHBOARD_CACHE_TTL_SECONDS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            cache_max_entries: lookup("CACHE_MAX_ENTRIES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000),
            fetch_timeout_ms: lookup("FETCH_TIMEOUT_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(5_000),
            sqlite_path: lookup("SQLITE_PATH").unwrap_or_else(|| "gigdash.db".to_string()),
            seed_demo_data: lookup("SEED_DEMO_DATA")
                .and_then(|v| parse_bool(&v))
                .unwrap_or(true),
            demo_subject_id: lookup("DEMO_SUBJECT_ID")
                .and_then(|v| v.parse().ok())
                .filter(|id| *id > 0)
                .unwrap_or(1),
        }
    }

    /// Get cache TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    /// Get the fetch stage timeout as a Duration.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
