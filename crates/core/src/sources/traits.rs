use async_trait::async_trait;

use crate::records::{
    Application, AutoApplyRule, GigOrder, InterviewTask, Notification, OfferPackage, Opportunity,
    OrderMilestone, PipelineBoard, PipelineStage, RecordId, UserAccount,
};
use crate::subject::SubjectId;

use super::{ListFilters, Result};

/// Source of user accounts.
#[async_trait]
pub trait UserSource: Send + Sync {
    /// Gets a user by id. `None` when the user does not exist.
    async fn get_user(&self, subject: SubjectId) -> Result<Option<UserAccount>>;
}

/// Source of gig applications, newest `updatedAt` first.
#[async_trait]
pub trait ApplicationSource: Send + Sync {
    async fn list_applications(
        &self,
        subject: SubjectId,
        filters: &ListFilters,
    ) -> Result<Vec<Application>>;
}

/// Source of notifications, newest first.
#[async_trait]
pub trait NotificationSource: Send + Sync {
    async fn list_notifications(
        &self,
        subject: SubjectId,
        filters: &ListFilters,
    ) -> Result<Vec<Notification>>;
}

/// Source of gig orders where the subject is the seller, newest `updatedAt` first.
#[async_trait]
pub trait OrderSource: Send + Sync {
    async fn list_orders(&self, subject: SubjectId, filters: &ListFilters)
        -> Result<Vec<GigOrder>>;
}

/// Source of order milestones.
#[async_trait]
pub trait MilestoneSource: Send + Sync {
    /// Lists milestones of all the given orders in one query, by due date
    /// ascending with undated milestones last.
    async fn list_milestones_by_order_ids(
        &self,
        order_ids: &[RecordId],
        filters: &ListFilters,
    ) -> Result<Vec<OrderMilestone>>;
}

/// Source of pipeline boards.
#[async_trait]
pub trait BoardSource: Send + Sync {
    /// Gets the subject's default board: the one flagged as default, else
    /// the oldest. `None` when the subject has no board.
    async fn get_default_board(&self, subject: SubjectId) -> Result<Option<PipelineBoard>>;
}

/// Source of pipeline stages.
#[async_trait]
pub trait StageSource: Send + Sync {
    /// Lists stages of the given boards ordered by position.
    async fn list_stages_by_board_ids(
        &self,
        board_ids: &[RecordId],
        filters: &ListFilters,
    ) -> Result<Vec<PipelineStage>>;
}

/// Source of pipeline opportunities.
#[async_trait]
pub trait OpportunitySource: Send + Sync {
    /// Lists opportunities on the given boards, newest `updatedAt` first.
    async fn list_opportunities_by_board_ids(
        &self,
        board_ids: &[RecordId],
        filters: &ListFilters,
    ) -> Result<Vec<Opportunity>>;
}

/// Source of interview workspace tasks.
#[async_trait]
pub trait InterviewTaskSource: Send + Sync {
    /// Lists tasks of all the given opportunities in one query, by due date
    /// ascending with undated tasks last.
    async fn list_tasks_by_opportunity_ids(
        &self,
        opportunity_ids: &[RecordId],
        filters: &ListFilters,
    ) -> Result<Vec<InterviewTask>>;
}

/// Source of offer packages.
#[async_trait]
pub trait OfferSource: Send + Sync {
    /// Lists offers of all the given opportunities in one query, by decision
    /// deadline ascending.
    async fn list_offers_by_opportunity_ids(
        &self,
        opportunity_ids: &[RecordId],
        filters: &ListFilters,
    ) -> Result<Vec<OfferPackage>>;
}

/// Source of auto-apply rules, oldest first.
#[async_trait]
pub trait AutoApplyRuleSource: Send + Sync {
    async fn list_auto_apply_rules(
        &self,
        subject: SubjectId,
        filters: &ListFilters,
    ) -> Result<Vec<AutoApplyRule>>;
}

/// Everything the user dashboard reads.
pub trait UserDashboardSource:
    UserSource + ApplicationSource + NotificationSource + OrderSource + MilestoneSource
{
}

impl<T> UserDashboardSource for T where
    T: UserSource + ApplicationSource + NotificationSource + OrderSource + MilestoneSource
{
}

/// Everything the pipeline automation dashboard reads.
pub trait PipelineSource:
    BoardSource
    + StageSource
    + OpportunitySource
    + InterviewTaskSource
    + OfferSource
    + AutoApplyRuleSource
{
}

impl<T> PipelineSource for T where
    T: BoardSource
        + StageSource
        + OpportunitySource
        + InterviewTaskSource
        + OfferSource
        + AutoApplyRuleSource
{
}
