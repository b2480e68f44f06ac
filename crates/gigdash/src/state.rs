//! Application state shared by all request handlers.
//!
//! Holds one dashboard facade per namespace. Each facade owns a snapshot
//! cache created here, once, at process start. The data source backend is
//! selected via feature flags.

use std::sync::Arc;
use std::time::Duration;

use gigdash_core::cache::{CacheStats, DashboardNamespace, SnapshotCache};
use gigdash_core::clock::Clock;
use gigdash_core::snapshot::{PipelineAutomation, UserDashboard};
use gigdash_core::sources::{PipelineSource, UserDashboardSource};
use gigdash_core::subject::SubjectId;

use crate::cache::MemorySnapshotCache;
use crate::config::Config;
use crate::dashboard::{
    DashboardFacade, PipelineAssembler, UserDashboardAssembler, MAX_FETCH_STAGES,
};

/// Headroom on top of the slowest possible build for serialization and I/O.
const REQUEST_TIMEOUT_GRACE: Duration = Duration::from_secs(1);

/// Shared application state.
///
/// Cheap to clone: every field is reference counted.
#[derive(Clone)]
pub struct AppState {
    /// Marketplace dashboards (`dashboard:user`).
    pub user_dashboards: Arc<DashboardFacade<UserDashboardAssembler>>,
    /// Career pipeline snapshots (`pipeline:automation`).
    pub pipeline_automation: Arc<DashboardFacade<PipelineAssembler>>,
    /// Name of the data source backend, reported by `/healthz`.
    pub backend: &'static str,
    /// Upper bound for a whole request. Outlasts a build whose every fetch
    /// stage runs to the fetch timeout, so slow sources answer 504 from the
    /// build instead of being cut off by the router.
    pub request_timeout: Duration,
}

impl AppState {
    /// Wires both facades over one data source.
    pub(crate) fn build<S>(
        source: Arc<S>,
        clock: Arc<dyn Clock>,
        config: &Config,
        backend: &'static str,
    ) -> Self
    where
        S: UserDashboardSource + PipelineSource + 'static,
    {
        let user_cache: Arc<dyn SnapshotCache<UserDashboard>> =
            Arc::new(MemorySnapshotCache::new(config.cache_max_entries));
        let pipeline_cache: Arc<dyn SnapshotCache<PipelineAutomation>> =
            Arc::new(MemorySnapshotCache::new(config.cache_max_entries));

        let user_assembler =
            UserDashboardAssembler::new(source.clone(), clock.clone(), config.fetch_timeout());
        let pipeline_assembler = PipelineAssembler::new(source, clock, config.fetch_timeout());

        Self {
            user_dashboards: Arc::new(DashboardFacade::new(
                user_assembler,
                user_cache,
                config.cache_ttl(),
            )),
            pipeline_automation: Arc::new(DashboardFacade::new(
                pipeline_assembler,
                pipeline_cache,
                config.cache_ttl(),
            )),
            backend,
            request_timeout: config.fetch_timeout() * MAX_FETCH_STAGES + REQUEST_TIMEOUT_GRACE,
        }
    }

    /// Drops the cached snapshots of one subject in every namespace.
    pub async fn invalidate_subject(&self, subject: SubjectId) {
        self.user_dashboards.invalidate_subject(subject).await;
        self.pipeline_automation.invalidate_subject(subject).await;
        tracing::info!(subject_id = %subject, "Invalidated cached snapshots for subject");
    }

    /// Drops every cached snapshot of one namespace.
    pub async fn invalidate_namespace(&self, namespace: DashboardNamespace) {
        match namespace {
            DashboardNamespace::UserDashboard => self.user_dashboards.invalidate_all().await,
            DashboardNamespace::PipelineAutomation => {
                self.pipeline_automation.invalidate_all().await
            }
        }
        tracing::info!(namespace = %namespace, "Invalidated cached snapshots for namespace");
    }

    /// Cache counters of every namespace, in [`DashboardNamespace::ALL`] order.
    pub fn cache_stats(&self) -> Vec<(DashboardNamespace, CacheStats)> {
        DashboardNamespace::ALL
            .into_iter()
            .map(|namespace| {
                let stats = match namespace {
                    DashboardNamespace::UserDashboard => self.user_dashboards.cache_stats(),
                    DashboardNamespace::PipelineAutomation => {
                        self.pipeline_automation.cache_stats()
                    }
                };
                (namespace, stats)
            })
            .collect()
    }
}

// ============================================================================
// Factory functions for the storage backends
// ============================================================================

#[cfg(feature = "inmemory")]
mod inmemory {
    use super::*;
    use chrono::Utc;
    use gigdash_core::clock::SystemClock;
    use gigdash_core::records::generate_demo_dataset;

    use crate::storage::InMemorySource;

    impl AppState {
        /// Creates AppState over the in-memory store, seeded with demo records
        /// unless disabled.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let source = InMemorySource::new();

            if config.seed_demo_data {
                let dataset = generate_demo_dataset(config.demo_subject_id, Utc::now());
                let records = dataset.record_count();
                source.insert_dataset(dataset).await?;
                tracing::info!(
                    subject_id = config.demo_subject_id,
                    records,
                    "Seeded in-memory store with demo data"
                );
            }

            Ok(Self::build(
                Arc::new(source),
                Arc::new(SystemClock),
                config,
                "inmemory",
            ))
        }
    }
}

#[cfg(feature = "sqlite")]
mod sqlite {
    use super::*;
    use chrono::Utc;
    use gigdash_core::clock::SystemClock;
    use gigdash_core::records::generate_demo_dataset;
    use gigdash_core::sources::UserSource;

    use crate::storage::SqliteSource;

    impl AppState {
        /// Creates AppState over a SQLite database. Demo records are only
        /// inserted when the demo user does not exist yet.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let source = SqliteSource::new(&config.sqlite_path).await?;

            if config.seed_demo_data {
                let subject = SubjectId::new(config.demo_subject_id)?;
                if source.get_user(subject).await?.is_none() {
                    let dataset = generate_demo_dataset(config.demo_subject_id, Utc::now());
                    let records = dataset.record_count();
                    source.insert_dataset(dataset).await?;
                    tracing::info!(
                        subject_id = %subject,
                        records,
                        path = %config.sqlite_path,
                        "Seeded SQLite database with demo data"
                    );
                }
            }

            Ok(Self::build(
                Arc::new(source),
                Arc::new(SystemClock),
                config,
                "sqlite",
            ))
        }
    }
}

// ============================================================================
// Test support
// ============================================================================


#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::DashboardOptions;

    #[tokio::test]
    async fn test_invalidate_subject_clears_both_namespaces() {
        let state = AppState::default();
        let subject = SubjectId::new(1).unwrap();

        state
            .user_dashboards
            .resolve_subject(subject, DashboardOptions::default())
            .await
            .unwrap();
        state
            .pipeline_automation
            .resolve_subject(subject, DashboardOptions::default())
            .await
            .unwrap();

        state.invalidate_subject(subject).await;

        assert!(state.cache_stats().iter().all(|(_, stats)| stats.entries == 0));
    }

    #[test]
    fn test_request_timeout_outlasts_slowest_build() {
        let config = Config {
            fetch_timeout_ms: 5_000,
            ..Config::default()
        };
        let state = AppState::build(
            Arc::new(crate::storage::inmemory::InMemorySource::new()),
            Arc::new(gigdash_core::clock::SystemClock),
            &config,
            "inmemory",
        );

        assert!(state.request_timeout > config.fetch_timeout() * MAX_FETCH_STAGES);
        assert_eq!(state.request_timeout, Duration::from_secs(16));
    }

    #[tokio::test]
    async fn test_invalidate_namespace_leaves_the_other() {
        let state = AppState::default();
        let subject = SubjectId::new(1).unwrap();

        state
            .user_dashboards
            .resolve_subject(subject, DashboardOptions::default())
            .await
            .unwrap();
        state
            .pipeline_automation
            .resolve_subject(subject, DashboardOptions::default())
            .await
            .unwrap();

        state
            .invalidate_namespace(DashboardNamespace::UserDashboard)
            .await;

        let stats = state.cache_stats();
        assert_eq!(stats[0].0, DashboardNamespace::UserDashboard);
        assert_eq!(stats[0].1.entries, 0);
        assert_eq!(stats[1].1.entries, 1);
    }
}
