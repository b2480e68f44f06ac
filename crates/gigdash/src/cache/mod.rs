//! Snapshot cache backends.
//!
//! Implementations of `gigdash_core::cache::SnapshotCache`. Only the
//! in-process backend exists: builds are deduplicated within one process.

pub mod memory;

pub use memory::MemorySnapshotCache;
