use serde::{Deserialize, Serialize};

use super::{
    Application, AutoApplyRule, GigOrder, InterviewTask, Notification, OfferPackage, Opportunity,
    OrderMilestone, PipelineBoard, PipelineStage, UserAccount,
};

/// One vector per record collection. Used to seed a backend in one go.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub users: Vec<UserAccount>,
    pub applications: Vec<Application>,
    pub notifications: Vec<Notification>,
    pub orders: Vec<GigOrder>,
    pub milestones: Vec<OrderMilestone>,
    pub boards: Vec<PipelineBoard>,
    pub stages: Vec<PipelineStage>,
    pub opportunities: Vec<Opportunity>,
    pub tasks: Vec<InterviewTask>,
    pub offers: Vec<OfferPackage>,
    pub rules: Vec<AutoApplyRule>,
}

impl Dataset {
    /// Appends every collection of `other` to this dataset.
    pub fn extend(&mut self, other: Dataset) {
        self.users.extend(other.users);
        self.applications.extend(other.applications);
        self.notifications.extend(other.notifications);
        self.orders.extend(other.orders);
        self.milestones.extend(other.milestones);
        self.boards.extend(other.boards);
        self.stages.extend(other.stages);
        self.opportunities.extend(other.opportunities);
        self.tasks.extend(other.tasks);
        self.offers.extend(other.offers);
        self.rules.extend(other.rules);
    }

    /// Total number of records across all collections.
    pub fn record_count(&self) -> usize {
        self.users.len()
            + self.applications.len()
            + self.notifications.len()
            + self.orders.len()
            + self.milestones.len()
            + self.boards.len()
            + self.stages.len()
            + self.opportunities.len()
            + self.tasks.len()
            + self.offers.len()
            + self.rules.len()
    }
}
