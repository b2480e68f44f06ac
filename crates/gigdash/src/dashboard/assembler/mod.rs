//! Snapshot assemblers.
//!
//! An assembler fetches the records of one snapshot kind through the data
//! source traits and hands them to the pure `assemble` function of the
//! snapshot type. Independent reads in a stage run concurrently; reads that
//! need ids from an earlier stage are issued as a single parent-id batch.

mod pipeline;
mod user;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use gigdash_core::cache::DashboardNamespace;
use gigdash_core::sources::{DataSourceError, Result};
use gigdash_core::subject::SubjectId;

pub use pipeline::PipelineAssembler;
pub use user::UserDashboardAssembler;

/// Most sequential fetch stages any assembler runs for one build. Each stage
/// is bounded by the fetch timeout on its own.
pub const MAX_FETCH_STAGES: u32 = 3;

/// Builds one kind of snapshot for a subject.
#[async_trait]
pub trait SnapshotAssembler: Clone + Send + Sync + 'static {
    type Snapshot: Send + Sync + 'static;

    /// Namespace the snapshots are cached under.
    const NAMESPACE: DashboardNamespace;

    async fn build(&self, subject: SubjectId) -> Result<Self::Snapshot>;
}

/// Runs one fetch stage, failing with [`DataSourceError::Timeout`] when it
/// takes longer than `limit`.
pub(crate) async fn fetch_stage<T, F>(stage: &'static str, limit: Duration, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(stage, timeout_ms = limit.as_millis() as u64, "Fetch stage timed out");
            Err(DataSourceError::Timeout(format!(
                "{stage} took longer than {}ms",
                limit.as_millis()
            )))
        }
    }
}
