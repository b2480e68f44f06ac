//! Entry point for dashboard reads.

use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;

use gigdash_core::cache::{namespace_pattern, CacheStats, DashboardNamespace, SnapshotCache};
use gigdash_core::snapshot::DashboardError;
use gigdash_core::subject::SubjectId;

use super::assembler::SnapshotAssembler;

/// Per-call options of a dashboard read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardOptions {
    /// Build a fresh snapshot without reading or writing the cache. The entry
    /// other callers see is left untouched.
    pub bypass_cache: bool,
}

/// Validates subject ids and serves snapshots of one namespace through the
/// cache, building them with the assembler on a miss.
///
/// The cache is created once at startup and injected here. It is only ever
/// cleared through the explicit invalidation methods.
pub struct DashboardFacade<A: SnapshotAssembler> {
    assembler: A,
    cache: Arc<dyn SnapshotCache<A::Snapshot>>,
    ttl: Duration,
}

impl<A: SnapshotAssembler> DashboardFacade<A> {
    pub fn new(assembler: A, cache: Arc<dyn SnapshotCache<A::Snapshot>>, ttl: Duration) -> Self {
        Self {
            assembler,
            cache,
            ttl,
        }
    }

    pub fn namespace(&self) -> DashboardNamespace {
        A::NAMESPACE
    }

    /// Resolves the snapshot for a raw (unvalidated) subject id.
    pub async fn resolve(
        &self,
        raw_id: &str,
        options: DashboardOptions,
    ) -> Result<Arc<A::Snapshot>, DashboardError> {
        let subject = SubjectId::parse(raw_id)?;
        self.resolve_subject(subject, options).await
    }

    /// Resolves the snapshot for a validated subject.
    pub async fn resolve_subject(
        &self,
        subject: SubjectId,
        options: DashboardOptions,
    ) -> Result<Arc<A::Snapshot>, DashboardError> {
        if options.bypass_cache {
            tracing::debug!(namespace = %A::NAMESPACE, subject_id = %subject, "Bypassing cache");
            let snapshot = self.assembler.build(subject).await?;
            return Ok(Arc::new(snapshot));
        }

        let key = A::NAMESPACE.key(subject);
        let assembler = self.assembler.clone();
        let build = async move { assembler.build(subject).await }.boxed();

        Ok(self.cache.get_or_compute(&key, self.ttl, build).await?)
    }

    /// Drops the cached snapshot of one subject.
    pub async fn invalidate_subject(&self, subject: SubjectId) {
        self.cache.invalidate(&A::NAMESPACE.key(subject)).await;
    }

    /// Drops every cached snapshot of this namespace.
    pub async fn invalidate_all(&self) {
        self.cache
            .invalidate_pattern(&namespace_pattern(A::NAMESPACE))
            .await;
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
