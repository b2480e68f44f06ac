mod error;
mod http_mapping;
mod traits;
mod types;

pub use error::{DataSourceError, Result};
pub use http_mapping::data_source_error_to_status_code;
pub use traits::{
    ApplicationSource, AutoApplyRuleSource, BoardSource, InterviewTaskSource, MilestoneSource,
    NotificationSource, OfferSource, OpportunitySource, OrderSource, PipelineSource,
    StageSource, UserDashboardSource, UserSource,
};
pub use types::{ListFilters, TimeRange, DEFAULT_LIST_LIMIT, MAX_BATCH_LIMIT, MAX_LIST_LIMIT};
