//! In-memory data source implementation.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use gigdash_core::records::{
    Application, AutoApplyRule, Dataset, GigOrder, InterviewTask, Notification, OfferPackage,
    Opportunity, OrderMilestone, PipelineBoard, PipelineStage, RecordId, UserAccount,
};
use gigdash_core::sources::{
    ApplicationSource, AutoApplyRuleSource, BoardSource, InterviewTaskSource, ListFilters,
    MilestoneSource, NotificationSource, OfferSource, OpportunitySource, OrderSource, Result,
    StageSource, UserSource,
};
use gigdash_core::subject::SubjectId;

/// In-memory data source.
///
/// Clones share the same dataset. Data is lost when the last clone is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    data: Arc<RwLock<Dataset>>,
}

impl InMemorySource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a source holding `dataset`.
    pub fn from_dataset(dataset: Dataset) -> Self {
        Self {
            data: Arc::new(RwLock::new(dataset)),
        }
    }

    /// Appends every record of `dataset`.
    pub async fn insert_dataset(&self, dataset: Dataset) -> Result<()> {
        let mut data = self.data.write().await;
        data.extend(dataset);
        Ok(())
    }
}

/// Keeps the rows matching `filters`, orders them and applies the limit.
fn select<T, F>(
    rows: impl Iterator<Item = T>,
    filters: &ListFilters,
    status: impl Fn(&T) -> &str,
    created_at: impl Fn(&T) -> DateTime<Utc>,
    order: F,
) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    let mut rows: Vec<T> = rows
        .filter(|row| filters.matches_status(status(row)))
        .filter(|row| filters.matches_time(created_at(row)))
        .collect();
    rows.sort_by(order);
    rows.truncate(filters.limit);
    rows
}

/// Ascending by date, undated rows last.
fn dated_first(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn newest_first(a: DateTime<Utc>, b: DateTime<Utc>) -> Ordering {
    b.cmp(&a)
}

fn id_set(ids: &[RecordId]) -> HashSet<RecordId> {
    ids.iter().copied().collect()
}

#[async_trait]
impl UserSource for InMemorySource {
    async fn get_user(&self, subject: SubjectId) -> Result<Option<UserAccount>> {
        let data = self.data.read().await;
        Ok(data.users.iter().find(|u| u.id == subject.get()).cloned())
    }
}

#[async_trait]
impl ApplicationSource for InMemorySource {
    async fn list_applications(
        &self,
        subject: SubjectId,
        filters: &ListFilters,
    ) -> Result<Vec<Application>> {
        let data = self.data.read().await;
        Ok(select(
            data.applications
                .iter()
                .filter(|a| a.user_id == subject.get())
                .cloned(),
            filters,
            |a| a.status.as_str(),
            |a| a.created_at,
            |a, b| newest_first(a.updated_at, b.updated_at).then(a.id.cmp(&b.id)),
        ))
    }
}

#[async_trait]
impl NotificationSource for InMemorySource {
    async fn list_notifications(
        &self,
        subject: SubjectId,
        filters: &ListFilters,
    ) -> Result<Vec<Notification>> {
        let data = self.data.read().await;
        Ok(select(
            data.notifications
                .iter()
                .filter(|n| n.user_id == subject.get())
                .cloned(),
            filters,
            |n| n.kind.as_str(),
            |n| n.created_at,
            |a, b| newest_first(a.created_at, b.created_at).then(a.id.cmp(&b.id)),
        ))
    }
}

#[async_trait]
impl OrderSource for InMemorySource {
    async fn list_orders(
        &self,
        subject: SubjectId,
        filters: &ListFilters,
    ) -> Result<Vec<GigOrder>> {
        let data = self.data.read().await;
        Ok(select(
            data.orders
                .iter()
                .filter(|o| o.seller_id == subject.get())
                .cloned(),
            filters,
            |o| o.status.as_str(),
            |o| o.created_at,
            |a, b| newest_first(a.updated_at, b.updated_at).then(a.id.cmp(&b.id)),
        ))
    }
}

#[async_trait]
impl MilestoneSource for InMemorySource {
    async fn list_milestones_by_order_ids(
        &self,
        order_ids: &[RecordId],
        filters: &ListFilters,
    ) -> Result<Vec<OrderMilestone>> {
        if order_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids = id_set(order_ids);
        let data = self.data.read().await;
        Ok(select(
            data.milestones
                .iter()
                .filter(|m| ids.contains(&m.order_id))
                .cloned(),
            filters,
            |m| if m.is_completed() { "completed" } else { "pending" },
            |m| m.created_at,
            |a, b| dated_first(a.due_at, b.due_at).then(a.id.cmp(&b.id)),
        ))
    }
}

#[async_trait]
impl BoardSource for InMemorySource {
    async fn get_default_board(&self, subject: SubjectId) -> Result<Option<PipelineBoard>> {
        let data = self.data.read().await;
        Ok(data
            .boards
            .iter()
            .filter(|b| b.user_id == subject.get())
            .min_by_key(|b| (!b.is_default, b.created_at, b.id))
            .cloned())
    }
}

#[async_trait]
impl StageSource for InMemorySource {
    async fn list_stages_by_board_ids(
        &self,
        board_ids: &[RecordId],
        filters: &ListFilters,
    ) -> Result<Vec<PipelineStage>> {
        if board_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids = id_set(board_ids);
        let data = self.data.read().await;
        Ok(select(
            data.stages
                .iter()
                .filter(|s| ids.contains(&s.board_id))
                .cloned(),
            filters,
            |s| s.name.as_str(),
            |s| s.created_at,
            |a, b| a.position.cmp(&b.position).then(a.id.cmp(&b.id)),
        ))
    }
}

#[async_trait]
impl OpportunitySource for InMemorySource {
    async fn list_opportunities_by_board_ids(
        &self,
        board_ids: &[RecordId],
        filters: &ListFilters,
    ) -> Result<Vec<Opportunity>> {
        if board_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids = id_set(board_ids);
        let data = self.data.read().await;
        Ok(select(
            data.opportunities
                .iter()
                .filter(|o| ids.contains(&o.board_id))
                .cloned(),
            filters,
            |o| o.status.as_str(),
            |o| o.created_at,
            |a, b| newest_first(a.updated_at, b.updated_at).then(a.id.cmp(&b.id)),
        ))
    }
}

#[async_trait]
impl InterviewTaskSource for InMemorySource {
    async fn list_tasks_by_opportunity_ids(
        &self,
        opportunity_ids: &[RecordId],
        filters: &ListFilters,
    ) -> Result<Vec<InterviewTask>> {
        if opportunity_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids = id_set(opportunity_ids);
        let data = self.data.read().await;
        Ok(select(
            data.tasks
                .iter()
                .filter(|t| ids.contains(&t.opportunity_id))
                .cloned(),
            filters,
            |t| t.status.as_str(),
            |t| t.created_at,
            |a, b| dated_first(a.due_at, b.due_at).then(a.id.cmp(&b.id)),
        ))
    }
}

#[async_trait]
impl OfferSource for InMemorySource {
    async fn list_offers_by_opportunity_ids(
        &self,
        opportunity_ids: &[RecordId],
        filters: &ListFilters,
    ) -> Result<Vec<OfferPackage>> {
        if opportunity_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids = id_set(opportunity_ids);
        let data = self.data.read().await;
        Ok(select(
            data.offers
                .iter()
                .filter(|o| ids.contains(&o.opportunity_id))
                .cloned(),
            filters,
            |o| o.status.as_str(),
            |o| o.created_at,
            |a, b| dated_first(a.decision_deadline, b.decision_deadline).then(a.id.cmp(&b.id)),
        ))
    }
}

#[async_trait]
impl AutoApplyRuleSource for InMemorySource {
    async fn list_auto_apply_rules(
        &self,
        subject: SubjectId,
        filters: &ListFilters,
    ) -> Result<Vec<AutoApplyRule>> {
        let data = self.data.read().await;
        Ok(select(
            data.rules
                .iter()
                .filter(|r| r.user_id == subject.get())
                .cloned(),
            filters,
            |r| if r.enabled { "enabled" } else { "disabled" },
            |r| r.created_at,
            |a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)),
        ))
    }
}
