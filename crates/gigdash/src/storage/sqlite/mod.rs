//! SQLite data source backend.
//!
//! Uses `rusqlite` for synchronous access, wrapped by `tokio-rusqlite` so
//! queries run on a dedicated thread instead of blocking the runtime.

mod conversions;
mod error;
mod repository;
mod schema;

pub use repository::SqliteSource;
