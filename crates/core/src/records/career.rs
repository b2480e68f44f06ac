use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RecordId;

/// A kanban-style board tracking job opportunities. Container record of the
/// pipeline automation dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineBoard {
    pub id: RecordId,
    pub user_id: RecordId,
    pub name: String,
    #[serde(default)]
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A column of a pipeline board, optionally with an SLA in hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineStage {
    pub id: RecordId,
    pub board_id: RecordId,
    pub name: String,
    pub position: i32,
    pub sla_hours: Option<u32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpportunityStatus {
    Active,
    Overdue,
    OnHold,
    Won,
    Lost,
    Archived,
}

impl OpportunityStatus {
    pub const ALL: [OpportunityStatus; 6] = [
        OpportunityStatus::Active,
        OpportunityStatus::Overdue,
        OpportunityStatus::OnHold,
        OpportunityStatus::Won,
        OpportunityStatus::Lost,
        OpportunityStatus::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OpportunityStatus::Active => "active",
            OpportunityStatus::Overdue => "overdue",
            OpportunityStatus::OnHold => "on_hold",
            OpportunityStatus::Won => "won",
            OpportunityStatus::Lost => "lost",
            OpportunityStatus::Archived => "archived",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }

    pub fn is_open(&self) -> bool {
        matches!(
            self,
            OpportunityStatus::Active | OpportunityStatus::Overdue | OpportunityStatus::OnHold
        )
    }
}

/// A job opportunity sitting in one stage of a pipeline board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub id: RecordId,
    pub board_id: RecordId,
    pub stage_id: RecordId,
    pub title: String,
    pub company: String,
    pub status: OpportunityStatus,
    pub score: Option<f64>,
    #[serde(default)]
    pub at_risk: bool,
    #[serde(default, deserialize_with = "crate::serde::deserialize_optional_timestamp")]
    pub stage_entered_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::serde::deserialize_optional_timestamp")]
    pub due_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Interview workspace kanban columns, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Blocked,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::Blocked,
        TaskStatus::Done,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Blocked => "blocked",
            TaskStatus::Done => "done",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }
}

/// A preparation task in an opportunity's interview workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewTask {
    pub id: RecordId,
    pub opportunity_id: RecordId,
    pub title: String,
    pub status: TaskStatus,
    #[serde(default, deserialize_with = "crate::serde::deserialize_optional_timestamp")]
    pub due_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::serde::deserialize_optional_timestamp")]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl InterviewTask {
    pub fn is_open(&self) -> bool {
        self.status != TaskStatus::Done && self.completed_at.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    Draft,
    Extended,
    Negotiating,
    Accepted,
    Declined,
    Expired,
}

impl OfferStatus {
    pub const ALL: [OfferStatus; 6] = [
        OfferStatus::Draft,
        OfferStatus::Extended,
        OfferStatus::Negotiating,
        OfferStatus::Accepted,
        OfferStatus::Declined,
        OfferStatus::Expired,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OfferStatus::Draft => "draft",
            OfferStatus::Extended => "extended",
            OfferStatus::Negotiating => "negotiating",
            OfferStatus::Accepted => "accepted",
            OfferStatus::Declined => "declined",
            OfferStatus::Expired => "expired",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }

    /// Offers the user still has to decide on.
    pub fn awaits_decision(&self) -> bool {
        matches!(self, OfferStatus::Extended | OfferStatus::Negotiating)
    }

    /// Offers counted towards the pipeline's total value.
    pub fn is_live(&self) -> bool {
        matches!(
            self,
            OfferStatus::Extended | OfferStatus::Negotiating | OfferStatus::Accepted
        )
    }
}

/// Compensation package attached to an opportunity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferPackage {
    pub id: RecordId,
    pub opportunity_id: RecordId,
    pub status: OfferStatus,
    pub base_salary: f64,
    #[serde(default)]
    pub signing_bonus: f64,
    #[serde(default)]
    pub equity_value: f64,
    pub currency: String,
    #[serde(default, deserialize_with = "crate::serde::deserialize_optional_timestamp")]
    pub decision_deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub documents_required: u32,
    #[serde(default)]
    pub documents_received: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A rule that submits applications on the user's behalf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoApplyRule {
    pub id: RecordId,
    pub user_id: RecordId,
    pub name: String,
    pub enabled: bool,
    pub daily_limit: u32,
    #[serde(default)]
    pub applied_today: u32,
    #[serde(default, deserialize_with = "crate::serde::deserialize_optional_timestamp")]
    pub last_run_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opportunity_status_open() {
        assert!(OpportunityStatus::Active.is_open());
        assert!(OpportunityStatus::Overdue.is_open());
        assert!(OpportunityStatus::OnHold.is_open());
        assert!(!OpportunityStatus::Won.is_open());
        assert!(!OpportunityStatus::Archived.is_open());
    }

    #[test]
    fn test_status_slugs_parse_back() {
        for status in TaskStatus::ALL {
            assert_eq!(TaskStatus::parse(status.as_str()), Some(status));
        }
        for status in OfferStatus::ALL {
            assert_eq!(OfferStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(OpportunityStatus::parse("on_hold"), Some(OpportunityStatus::OnHold));
    }

    #[test]
    fn test_offer_status_groups() {
        assert!(OfferStatus::Extended.awaits_decision());
        assert!(!OfferStatus::Accepted.awaits_decision());
        assert!(OfferStatus::Accepted.is_live());
        assert!(!OfferStatus::Declined.is_live());
    }

    #[test]
    fn test_task_done_or_completed_is_closed() {
        let json = r#"{
            "id": 1,
            "opportunityId": 2,
            "title": "Prepare system design",
            "status": "in_progress",
            "completedAt": "2024-04-01T12:00:00Z",
            "createdAt": "2024-03-28T12:00:00Z"
        }"#;
        let task: InterviewTask = serde_json::from_str(json).unwrap();

        assert!(!task.is_open());
        assert_eq!(task.due_at, None);
    }
}
