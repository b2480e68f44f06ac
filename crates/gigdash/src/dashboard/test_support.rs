//! Data source doubles for assembler and facade tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};

use gigdash_core::records::{
    Application, AutoApplyRule, Dataset, GigOrder, InterviewTask, Notification, OfferPackage,
    OfferStatus, Opportunity, OpportunityStatus, OrderMilestone, PipelineBoard, PipelineStage,
    RecordId, TaskStatus, UserAccount,
};
use gigdash_core::sources::{
    ApplicationSource, AutoApplyRuleSource, BoardSource, DataSourceError, InterviewTaskSource,
    ListFilters, MilestoneSource, NotificationSource, OfferSource, OpportunitySource, OrderSource,
    Result, StageSource, UserSource,
};
use gigdash_core::subject::SubjectId;

use crate::storage::inmemory::InMemorySource;

pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
}

pub fn subject(id: i64) -> SubjectId {
    SubjectId::new(id).unwrap()
}

/// Wraps an [`InMemorySource`], counting every call. Can delay each call or
/// fail all of them.
#[derive(Clone)]
pub struct CountingSource {
    inner: InMemorySource,
    calls: Arc<AtomicUsize>,
    delay: Duration,
    fail_with: Option<DataSourceError>,
}

impl CountingSource {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            inner: InMemorySource::from_dataset(dataset),
            calls: Arc::new(AtomicUsize::new(0)),
            delay: Duration::ZERO,
            fail_with: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn failing(mut self, error: DataSourceError) -> Self {
        self.fail_with = Some(error);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn enter(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.fail_with {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl UserSource for CountingSource {
    async fn get_user(&self, subject: SubjectId) -> Result<Option<UserAccount>> {
        self.enter().await?;
        self.inner.get_user(subject).await
    }
}

#[async_trait]
impl ApplicationSource for CountingSource {
    async fn list_applications(
        &self,
        subject: SubjectId,
        filters: &ListFilters,
    ) -> Result<Vec<Application>> {
        self.enter().await?;
        self.inner.list_applications(subject, filters).await
    }
}

#[async_trait]
impl NotificationSource for CountingSource {
    async fn list_notifications(
        &self,
        subject: SubjectId,
        filters: &ListFilters,
    ) -> Result<Vec<Notification>> {
        self.enter().await?;
        self.inner.list_notifications(subject, filters).await
    }
}

#[async_trait]
impl OrderSource for CountingSource {
    async fn list_orders(
        &self,
        subject: SubjectId,
        filters: &ListFilters,
    ) -> Result<Vec<GigOrder>> {
        self.enter().await?;
        self.inner.list_orders(subject, filters).await
    }
}

#[async_trait]
impl MilestoneSource for CountingSource {
    async fn list_milestones_by_order_ids(
        &self,
        order_ids: &[RecordId],
        filters: &ListFilters,
    ) -> Result<Vec<OrderMilestone>> {
        self.enter().await?;
        self.inner.list_milestones_by_order_ids(order_ids, filters).await
    }
}

#[async_trait]
impl BoardSource for CountingSource {
    async fn get_default_board(&self, subject: SubjectId) -> Result<Option<PipelineBoard>> {
        self.enter().await?;
        self.inner.get_default_board(subject).await
    }
}

#[async_trait]
impl StageSource for CountingSource {
    async fn list_stages_by_board_ids(
        &self,
        board_ids: &[RecordId],
        filters: &ListFilters,
    ) -> Result<Vec<PipelineStage>> {
        self.enter().await?;
        self.inner.list_stages_by_board_ids(board_ids, filters).await
    }
}

#[async_trait]
impl OpportunitySource for CountingSource {
    async fn list_opportunities_by_board_ids(
        &self,
        board_ids: &[RecordId],
        filters: &ListFilters,
    ) -> Result<Vec<Opportunity>> {
        self.enter().await?;
        self.inner.list_opportunities_by_board_ids(board_ids, filters).await
    }
}

#[async_trait]
impl InterviewTaskSource for CountingSource {
    async fn list_tasks_by_opportunity_ids(
        &self,
        opportunity_ids: &[RecordId],
        filters: &ListFilters,
    ) -> Result<Vec<InterviewTask>> {
        self.enter().await?;
        self.inner
            .list_tasks_by_opportunity_ids(opportunity_ids, filters)
            .await
    }
}

#[async_trait]
impl OfferSource for CountingSource {
    async fn list_offers_by_opportunity_ids(
        &self,
        opportunity_ids: &[RecordId],
        filters: &ListFilters,
    ) -> Result<Vec<OfferPackage>> {
        self.enter().await?;
        self.inner
            .list_offers_by_opportunity_ids(opportunity_ids, filters)
            .await
    }
}

#[async_trait]
impl AutoApplyRuleSource for CountingSource {
    async fn list_auto_apply_rules(
        &self,
        subject: SubjectId,
        filters: &ListFilters,
    ) -> Result<Vec<AutoApplyRule>> {
        self.enter().await?;
        self.inner.list_auto_apply_rules(subject, filters).await
    }
}

/// One board with three stages, 50 opportunities, 120 tasks and 80 offers.
pub fn wide_pipeline_dataset(user_id: RecordId, now: DateTime<Utc>) -> Dataset {
    let hours = ChronoDuration::hours;
    let board_id = user_id * 100_000;

    let boards = vec![PipelineBoard {
        id: board_id,
        user_id,
        name: "Wide board".to_string(),
        is_default: true,
        created_at: now - hours(24 * 30),
        updated_at: now,
    }];

    let stages: Vec<PipelineStage> = [None, Some(48), Some(24)]
        .into_iter()
        .enumerate()
        .map(|(i, sla_hours)| PipelineStage {
            id: board_id + 1 + i as i64,
            board_id,
            name: format!("Stage {i}"),
            position: i as i32,
            sla_hours,
            created_at: now - hours(24 * 30),
        })
        .collect();

    let opportunities: Vec<Opportunity> = (0..50)
        .map(|i: i64| Opportunity {
            id: board_id + 1_000 + i,
            board_id,
            stage_id: stages[(i % 3) as usize].id,
            title: format!("Opportunity {i}"),
            company: format!("Company {i}"),
            status: OpportunityStatus::Active,
            score: Some(50.0 + i as f64),
            at_risk: false,
            stage_entered_at: Some(now - hours(i)),
            due_at: None,
            created_at: now - hours(200 + i),
            updated_at: now - hours(i),
        })
        .collect();

    let tasks = (0..120)
        .map(|i: i64| InterviewTask {
            id: board_id + 2_000 + i,
            opportunity_id: opportunities[(i % 50) as usize].id,
            title: format!("Task {i}"),
            status: TaskStatus::ALL[(i % 4) as usize],
            due_at: Some(now + hours(i - 60)),
            completed_at: None,
            created_at: now - hours(100),
        })
        .collect();

    let offers = (0..80)
        .map(|i: i64| OfferPackage {
            id: board_id + 3_000 + i,
            opportunity_id: opportunities[(i % 50) as usize].id,
            status: OfferStatus::Extended,
            base_salary: 100_000.0,
            signing_bonus: 0.0,
            equity_value: 0.0,
            currency: "USD".to_string(),
            decision_deadline: Some(now + hours(i)),
            documents_required: 1,
            documents_received: (i % 2) as u32,
            created_at: now - hours(48),
            updated_at: now - hours(1),
        })
        .collect();

    Dataset {
        boards,
        stages,
        opportunities,
        tasks,
        offers,
        ..Dataset::default()
    }
}
