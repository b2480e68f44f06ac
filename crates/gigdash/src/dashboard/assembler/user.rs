use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use gigdash_core::cache::DashboardNamespace;
use gigdash_core::clock::Clock;
use gigdash_core::records::RecordId;
use gigdash_core::snapshot::{UserDashboard, UserDashboardInputs, NOTIFICATION_LIMIT};
use gigdash_core::sources::{ListFilters, Result, UserDashboardSource};
use gigdash_core::subject::SubjectId;

use super::{fetch_stage, SnapshotAssembler};

/// Most applications a dashboard looks at.
const APPLICATION_LIMIT: usize = 120;

/// Most orders a dashboard looks at.
const ORDER_LIMIT: usize = 50;

/// Assembles [`UserDashboard`] snapshots.
///
/// Reads the profile first. A missing profile short-circuits to an empty
/// dashboard. Otherwise applications, notifications and orders are fetched
/// concurrently, then the milestones of every order in one batch.
#[derive(Clone)]
pub struct UserDashboardAssembler {
    source: Arc<dyn UserDashboardSource>,
    clock: Arc<dyn Clock>,
    fetch_timeout: Duration,
}

impl UserDashboardAssembler {
    pub fn new(
        source: Arc<dyn UserDashboardSource>,
        clock: Arc<dyn Clock>,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            source,
            clock,
            fetch_timeout,
        }
    }
}

#[async_trait]
impl SnapshotAssembler for UserDashboardAssembler {
    type Snapshot = UserDashboard;

    const NAMESPACE: DashboardNamespace = DashboardNamespace::UserDashboard;

    async fn build(&self, subject: SubjectId) -> Result<UserDashboard> {
        let now = self.clock.now();
        let source = &self.source;

        let Some(profile) =
            fetch_stage("profile", self.fetch_timeout, source.get_user(subject)).await?
        else {
            tracing::debug!(subject_id = %subject, "No user account, assembling empty dashboard");
            return Ok(UserDashboard::empty(subject, now));
        };

        let application_filters = ListFilters::default().with_limit(APPLICATION_LIMIT);
        let notification_filters = ListFilters::default().with_limit(NOTIFICATION_LIMIT);
        let order_filters = ListFilters::default().with_limit(ORDER_LIMIT);

        let (applications, notifications, orders) =
            fetch_stage("user records", self.fetch_timeout, async {
                tokio::try_join!(
                    source.list_applications(subject, &application_filters),
                    source.list_notifications(subject, &notification_filters),
                    source.list_orders(subject, &order_filters),
                )
            })
            .await?;

        let order_ids: Vec<RecordId> = orders.iter().map(|order| order.id).collect();
        let milestones = if order_ids.is_empty() {
            Vec::new()
        } else {
            fetch_stage(
                "milestones",
                self.fetch_timeout,
                source.list_milestones_by_order_ids(&order_ids, &ListFilters::batch()),
            )
            .await?
        };

        tracing::debug!(
            subject_id = %subject,
            applications = applications.len(),
            notifications = notifications.len(),
            orders = orders.len(),
            milestones = milestones.len(),
            "Fetched user dashboard records"
        );

        Ok(UserDashboard::assemble(
            subject,
            UserDashboardInputs {
                profile: Some(profile),
                applications,
                notifications,
                orders,
                milestones,
            },
            now,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;
    use gigdash_core::clock::ManualClock;
    use gigdash_core::records::{generate_demo_dataset, Dataset};
    use gigdash_core::sources::DataSourceError;

    use crate::dashboard::test_support::{subject, test_now, CountingSource};

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn assembler(source: &CountingSource, clock: &ManualClock) -> UserDashboardAssembler {
        UserDashboardAssembler::new(Arc::new(source.clone()), Arc::new(clock.clone()), TIMEOUT)
    }

    #[tokio::test]
    async fn test_build_uses_five_calls() {
        let source = CountingSource::new(generate_demo_dataset(1, test_now()));
        let clock = ManualClock::new(test_now());

        let dashboard = assembler(&source, &clock).build(subject(1)).await.unwrap();

        assert_eq!(source.calls(), 5);
        assert_eq!(dashboard.generated_at, test_now());
        assert_eq!(dashboard.summary.total_applications, 8);
        assert_eq!(dashboard.orders.len(), 5);
        let milestone_count: usize = dashboard.orders.iter().map(|o| o.milestones.len()).sum();
        assert_eq!(milestone_count, 12);
        assert!(dashboard.recent_notifications.len() <= NOTIFICATION_LIMIT);
    }

    #[tokio::test]
    async fn test_unknown_user_gets_empty_dashboard_after_one_call() {
        let source = CountingSource::new(generate_demo_dataset(1, test_now()));
        let clock = ManualClock::new(test_now());

        let dashboard = assembler(&source, &clock).build(subject(404)).await.unwrap();

        assert_eq!(source.calls(), 1);
        assert!(dashboard.profile.is_none());
        assert_eq!(dashboard.summary.total_applications, 0);
        assert!(dashboard.orders.is_empty());
        assert_eq!(
            dashboard.applications_by_status.len(),
            gigdash_core::records::ApplicationStatus::ALL.len()
        );
    }

    #[tokio::test]
    async fn test_user_without_orders_skips_milestone_batch() {
        let mut dataset = generate_demo_dataset(1, test_now());
        dataset.orders.clear();
        dataset.milestones.clear();
        let source = CountingSource::new(dataset);
        let clock = ManualClock::new(test_now());

        let dashboard = assembler(&source, &clock).build(subject(1)).await.unwrap();

        assert_eq!(source.calls(), 4);
        assert!(dashboard.orders.is_empty());
    }

    #[tokio::test]
    async fn test_clock_is_read_per_build() {
        let source = CountingSource::new(generate_demo_dataset(1, test_now()));
        let clock = ManualClock::new(test_now());
        let assembler = assembler(&source, &clock);

        let first = assembler.build(subject(1)).await.unwrap();
        clock.advance(ChronoDuration::minutes(5));
        let second = assembler.build(subject(1)).await.unwrap();

        assert_eq!(second.generated_at - first.generated_at, ChronoDuration::minutes(5));
    }

    #[tokio::test]
    async fn test_source_error_propagates() {
        let source = CountingSource::new(Dataset::default())
            .failing(DataSourceError::ConnectionFailed("refused".to_string()));
        let clock = ManualClock::new(test_now());

        let error = assembler(&source, &clock).build(subject(1)).await.unwrap_err();

        assert_eq!(error, DataSourceError::ConnectionFailed("refused".to_string()));
    }

    #[tokio::test]
    async fn test_slow_source_times_out() {
        let source = CountingSource::new(generate_demo_dataset(1, test_now()))
            .with_delay(Duration::from_millis(200));
        let clock = ManualClock::new(test_now());
        let assembler = UserDashboardAssembler::new(
            Arc::new(source.clone()),
            Arc::new(clock),
            Duration::from_millis(20),
        );

        let error = assembler.build(subject(1)).await.unwrap_err();

        assert!(matches!(error, DataSourceError::Timeout(stage) if stage.starts_with("profile")));
    }
}
