//! Dashboard snapshots and their pure assembly.
//!
//! A snapshot is built from records that were already fetched, plus the
//! reference instant of the build. Field names are camelCase and form the
//! contract with UI consumers.

mod error;
mod pipeline;
mod user;

pub use error::{dashboard_error_to_status_code, DashboardError};
pub use pipeline::{
    OfferCard, OpportunityCard, PipelineAutomation, PipelineInputs, PipelineSummary, RuleCard,
    StageColumn, TaskCard, RULE_STALE_AFTER_HOURS,
};
pub use user::{
    OrderCard, UserDashboard, UserDashboardInputs, UserDashboardSummary, NOTIFICATION_LIMIT,
};
