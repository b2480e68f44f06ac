//! In-memory cache backend.
//!
//! Thread-safe TTL cache with LRU eviction and single-flight builds for
//! single-instance deployments.

mod cache;

pub use cache::MemorySnapshotCache;
