//! In-memory data source backend.
//!
//! Holds every record collection in a single [`Dataset`](gigdash_core::records::Dataset)
//! behind an `Arc<RwLock<_>>`. Used for development, demos and tests where
//! persistence is not required.
//!
//! # Example
//!
//! ```rust,ignore
//! use gigdash::storage::inmemory::InMemorySource;
//!
//! let source = InMemorySource::from_dataset(generate_demo_dataset(1, Utc::now()));
//! ```

mod repository;

pub use repository::InMemorySource;
