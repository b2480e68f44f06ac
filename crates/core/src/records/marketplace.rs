use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RecordId;

/// A marketplace user. The container record of the user dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub id: RecordId,
    pub display_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lifecycle of a gig application. Declaration order is the bucket order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Draft,
    Submitted,
    Shortlisted,
    Interviewing,
    Offered,
    Hired,
    Rejected,
    Withdrawn,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 8] = [
        ApplicationStatus::Draft,
        ApplicationStatus::Submitted,
        ApplicationStatus::Shortlisted,
        ApplicationStatus::Interviewing,
        ApplicationStatus::Offered,
        ApplicationStatus::Hired,
        ApplicationStatus::Rejected,
        ApplicationStatus::Withdrawn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Draft => "draft",
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::Interviewing => "interviewing",
            ApplicationStatus::Offered => "offered",
            ApplicationStatus::Hired => "hired",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Withdrawn => "withdrawn",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }

    /// Returns true while the client can still act on the application.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            ApplicationStatus::Submitted
                | ApplicationStatus::Shortlisted
                | ApplicationStatus::Interviewing
                | ApplicationStatus::Offered
        )
    }
}

/// An application the user sent for a gig.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: RecordId,
    pub user_id: RecordId,
    pub gig_title: String,
    pub client_name: String,
    pub status: ApplicationStatus,
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "crate::serde::deserialize_optional_timestamp")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::serde::deserialize_optional_timestamp")]
    pub follow_up_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: RecordId,
    pub user_id: RecordId,
    pub kind: String,
    pub title: String,
    #[serde(default, deserialize_with = "crate::serde::deserialize_optional_timestamp")]
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn is_unread(&self) -> bool {
        self.read_at.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    InProgress,
    Delivered,
    Overdue,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::InProgress,
        OrderStatus::Delivered,
        OrderStatus::Overdue,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::InProgress => "in_progress",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Overdue => "overdue",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }

    /// Returns true until the order is completed or cancelled.
    pub fn is_open(&self) -> bool {
        !matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }
}

/// A gig order the user is delivering as seller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GigOrder {
    pub id: RecordId,
    pub seller_id: RecordId,
    pub buyer_name: String,
    pub title: String,
    pub status: OrderStatus,
    pub amount: f64,
    pub currency: String,
    #[serde(default, deserialize_with = "crate::serde::deserialize_optional_timestamp")]
    pub due_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::serde::deserialize_optional_timestamp")]
    pub delivered_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub at_risk: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A payable slice of a gig order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderMilestone {
    pub id: RecordId,
    pub order_id: RecordId,
    pub title: String,
    pub amount: f64,
    #[serde(default, deserialize_with = "crate::serde::deserialize_optional_timestamp")]
    pub due_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::serde::deserialize_optional_timestamp")]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl OrderMilestone {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}
