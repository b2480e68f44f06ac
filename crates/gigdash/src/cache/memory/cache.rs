//! In-memory snapshot cache with TTL, LRU eviction and single-flight builds.
//!
//! One `tokio::sync::Mutex` guards both the entry store and the registry of
//! builds in flight. The lock is only held for bookkeeping, never across a
//! build. A build runs inside a `Shared` future so that every caller waiting
//! on the same key polls the same computation. The registry only keeps a
//! weak handle: when every waiter has gone away the build is dropped, its
//! registry entry is cleared, and the next caller starts a fresh one.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::{BoxFuture, FutureExt, Shared, WeakShared};
use lru::LruCache;
use tokio::sync::Mutex;
use tokio::time::Instant;

use gigdash_core::cache::{
    pattern_matches, BuildFuture, CacheError, CacheStats, Result, SnapshotCache,
};
use gigdash_core::sources::DataSourceError;

type BuildOutcome<T> = std::result::Result<Arc<T>, DataSourceError>;
type SharedBuild<T> = Shared<BoxFuture<'static, BuildOutcome<T>>>;
type WeakBuild<T> = WeakShared<BoxFuture<'static, BuildOutcome<T>>>;

/// A stored snapshot.
struct CacheEntry<T> {
    value: Arc<T>,
    stored_at: Instant,
    ttl: Duration,
}

impl<T> CacheEntry<T> {
    /// An entry is served up to and including `stored_at + ttl`.
    fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.stored_at) > self.ttl
    }
}

/// A build registered for a key. `generation` tells apart builds that were
/// registered for the same key at different times.
struct InFlight<T> {
    generation: u64,
    build: WeakBuild<T>,
}

/// Clears the registry entry of a build that is dropped before it resolves.
///
/// Captured by the build future itself, so it also fires for a build that was
/// never polled. If the lock is busy at that moment the entry is left behind
/// and swept on the next build registration.
struct InFlightGuard<T> {
    state: Arc<Mutex<CacheState<T>>>,
    key: String,
    generation: u64,
    armed: bool,
}

impl<T> InFlightGuard<T> {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl<T> Drop for InFlightGuard<T> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Ok(mut state) = self.state.try_lock() {
            let current = state
                .in_flight
                .get(&self.key)
                .is_some_and(|flight| flight.generation == self.generation);
            if current {
                state.in_flight.remove(&self.key);
                tracing::debug!(key = %self.key, "Build abandoned by every waiter");
            }
        }
    }
}

struct CacheState<T> {
    store: LruCache<String, CacheEntry<T>>,
    in_flight: HashMap<String, InFlight<T>>,
    next_generation: u64,
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    joins: AtomicU64,
    builds: AtomicU64,
    failures: AtomicU64,
    entries: AtomicUsize,
}

/// In-memory [`SnapshotCache`] for a single process.
///
/// Clones share the same store.
pub struct MemorySnapshotCache<T> {
    state: Arc<Mutex<CacheState<T>>>,
    counters: Arc<Counters>,
}

impl<T> Clone for MemorySnapshotCache<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            counters: Arc::clone(&self.counters),
        }
    }
}

impl<T> MemorySnapshotCache<T>
where
    T: Send + Sync + 'static,
{
    /// Creates a cache that holds at most `max_entries` snapshots before the
    /// least recently used one is evicted. A capacity of zero is raised to one.
    pub fn new(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            state: Arc::new(Mutex::new(CacheState {
                store: LruCache::new(capacity),
                in_flight: HashMap::new(),
                next_generation: 0,
            })),
            counters: Arc::new(Counters::default()),
        }
    }

    /// Wraps `build` so that, once it resolves, the outcome is stored (on
    /// success) and the registry entry is cleared. Both only happen if this
    /// build is still the one registered for `key`; an invalidation in the
    /// meantime means the result is handed to its waiters but not stored.
    fn start_build(
        &self,
        key: String,
        generation: u64,
        ttl: Duration,
        build: BuildFuture<T>,
    ) -> SharedBuild<T> {
        let state = Arc::clone(&self.state);
        let counters = Arc::clone(&self.counters);
        let mut guard = InFlightGuard {
            state: Arc::clone(&self.state),
            key: key.clone(),
            generation,
            armed: true,
        };

        async move {
            let outcome = build.await.map(Arc::new);

            let mut state = state.lock().await;
            guard.disarm();
            let current = state
                .in_flight
                .get(&key)
                .is_some_and(|flight| flight.generation == generation);

            if current {
                state.in_flight.remove(&key);
            }

            match &outcome {
                Ok(value) if current => {
                    state.store.put(
                        key.clone(),
                        CacheEntry {
                            value: Arc::clone(value),
                            stored_at: Instant::now(),
                            ttl,
                        },
                    );
                    counters.entries.store(state.store.len(), Ordering::Relaxed);
                    tracing::debug!(key = %key, ttl_ms = ttl.as_millis() as u64, "Stored snapshot");
                }
                Ok(_) => {
                    tracing::debug!(key = %key, "Key invalidated during build, result not stored");
                }
                Err(error) => {
                    counters.failures.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!(key = %key, error = %error, "Snapshot build failed");
                }
            }

            outcome
        }
        .boxed()
        .shared()
    }

    #[cfg(test)]
    async fn in_flight_len(&self) -> usize {
        self.state.lock().await.in_flight.len()
    }

    async fn remove_matching(&self, matches: impl Fn(&str) -> bool) -> usize {
        let mut state = self.state.lock().await;

        let keys: Vec<String> = state
            .store
            .iter()
            .filter(|(key, _)| matches(key))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &keys {
            state.store.pop(key);
        }
        state.in_flight.retain(|key, _| !matches(key));

        self.counters
            .entries
            .store(state.store.len(), Ordering::Relaxed);
        keys.len()
    }
}

#[async_trait]
impl<T> SnapshotCache<T> for MemorySnapshotCache<T>
where
    T: Send + Sync + 'static,
{
    async fn get_or_compute(
        &self,
        key: &str,
        ttl: Duration,
        build: BuildFuture<T>,
    ) -> Result<Arc<T>> {
        let shared = {
            let mut state = self.state.lock().await;

            if let Some(entry) = state.store.get(key) {
                if !entry.is_expired(Instant::now()) {
                    self.counters.hits.fetch_add(1, Ordering::Relaxed);
                    tracing::trace!(key = %key, "Cache hit");
                    return Ok(Arc::clone(&entry.value));
                }
            }

            self.counters.misses.fetch_add(1, Ordering::Relaxed);

            match state.in_flight.get(key).and_then(|flight| flight.build.upgrade()) {
                Some(shared) => {
                    self.counters.joins.fetch_add(1, Ordering::Relaxed);
                    tracing::debug!(key = %key, "Cache miss, joining build in flight");
                    shared
                }
                None => {
                    let generation = state.next_generation;
                    state.next_generation += 1;
                    self.counters.builds.fetch_add(1, Ordering::Relaxed);
                    tracing::debug!(key = %key, generation, "Cache miss, starting build");

                    state
                        .in_flight
                        .retain(|_, flight| flight.build.upgrade().is_some());

                    let shared = self.start_build(key.to_string(), generation, ttl, build);
                    if let Some(weak) = shared.downgrade() {
                        state.in_flight.insert(
                            key.to_string(),
                            InFlight {
                                generation,
                                build: weak,
                            },
                        );
                    }
                    shared
                }
            }
        };

        shared.await.map_err(|source| CacheError::Build {
            key: key.to_string(),
            source,
        })
    }

    async fn invalidate(&self, key: &str) {
        let removed = self.remove_matching(|candidate| candidate == key).await;
        tracing::debug!(key = %key, removed, "Invalidated cache key");
    }

    async fn invalidate_pattern(&self, pattern: &str) {
        let removed = self
            .remove_matching(|candidate| pattern_matches(pattern, candidate))
            .await;
        tracing::debug!(pattern = %pattern, removed, "Invalidated cache pattern");
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            joins: self.counters.joins.load(Ordering::Relaxed),
            builds: self.counters.builds.load(Ordering::Relaxed),
            failures: self.counters.failures.load(Ordering::Relaxed),
            entries: self.counters.entries.load(Ordering::Relaxed),
        }
    }
}
