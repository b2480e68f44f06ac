use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::BoxFuture;
use serde::Serialize;

use crate::sources::DataSourceError;

use super::Result;

/// A snapshot build handed to the cache. It is only polled on a miss.
pub type BuildFuture<T> = BoxFuture<'static, std::result::Result<T, DataSourceError>>;

/// Point-in-time counters of a snapshot cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Lookups answered from a live entry.
    pub hits: u64,
    /// Lookups that found no live entry.
    pub misses: u64,
    /// Misses that joined a build already in flight.
    pub joins: u64,
    /// Builds started.
    pub builds: u64,
    /// Builds that failed.
    pub failures: u64,
    /// Entries currently stored, live or expired.
    pub entries: usize,
}

/// A keyed store of immutable snapshots with a time-to-live and
/// single-flight builds.
#[async_trait]
pub trait SnapshotCache<T>: Send + Sync
where
    T: Send + Sync + 'static,
{
    /// Returns the live snapshot stored under `key`, or runs `build` to
    /// produce one.
    ///
    /// Concurrent callers for the same key share one build and receive the
    /// same `Arc`. A failed build is not stored; every waiter gets the error
    /// and the next call builds again.
    async fn get_or_compute(&self, key: &str, ttl: Duration, build: BuildFuture<T>)
        -> Result<Arc<T>>;

    /// Drops the entry stored under `key`, if any.
    async fn invalidate(&self, key: &str);

    /// Drops every entry whose key matches the glob `pattern`.
    async fn invalidate_pattern(&self, pattern: &str);

    fn stats(&self) -> CacheStats;
}
