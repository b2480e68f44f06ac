//! Data source backends.
//!
//! This module provides concrete implementations of the data source traits
//! defined in `gigdash_core::sources`. The backend serving requests is
//! selected at compile time via feature flags.
//!
//! # Feature Flags
//!
//! - `inmemory` (default): records held in process, seeded with demo data
//! - `sqlite`: SQLite database using `rusqlite` and `tokio-rusqlite`
//!
//! These features are mutually exclusive. The in-memory backend is always
//! compiled for tests, where it doubles as a reference implementation.
//!
//! # Examples
//!
//! Build with SQLite:
//! ```bash
//! cargo build -p gigdash --no-default-features --features sqlite
//! ```

#[cfg(all(feature = "inmemory", feature = "sqlite"))]
compile_error!(
    "Features 'inmemory' and 'sqlite' are mutually exclusive. \
    Enable only one storage backend at a time."
);

#[cfg(not(any(feature = "inmemory", feature = "sqlite")))]
compile_error!(
    "No storage backend selected. Enable 'inmemory' or 'sqlite' feature. \
    Example: cargo build -p gigdash --no-default-features --features sqlite"
);

#[cfg(any(feature = "inmemory", test))]
pub mod inmemory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "inmemory")]
pub use inmemory::InMemorySource;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteSource;
