//! Record value types read by the data sources.
//!
//! Conversion from whatever the store holds happens once, at the adapter
//! boundary. Everything above the adapters works with these types only.

mod career;
mod dataset;
mod marketplace;
mod mock_data;

/// Identity of any stored record.
pub type RecordId = i64;

pub use career::{
    AutoApplyRule, InterviewTask, OfferPackage, OfferStatus, Opportunity, OpportunityStatus,
    PipelineBoard, PipelineStage, TaskStatus,
};
pub use dataset::Dataset;
pub use marketplace::{
    Application, ApplicationStatus, GigOrder, Notification, OrderMilestone, OrderStatus,
    UserAccount,
};
pub use mock_data::generate_demo_dataset;
