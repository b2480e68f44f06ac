mod error;
mod keys;
mod patterns;
mod traits;

pub use error::{CacheError, Result};
pub use keys::{namespace_pattern, subject_pattern, DashboardNamespace};
pub use patterns::pattern_matches;
pub use traits::{BuildFuture, CacheStats, SnapshotCache};
